use std::time::Duration;

use engine::{Vec2, WorldBounds};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::entities::{ApplePool, Banana, Troop};
use super::events::{EventBus, GameEvent};
use super::interaction::{self, Tally};
use super::ledger::{CarryOver, Ledger, Stats};
use super::player::{ControlInput, Player};
use super::progression::{LevelTunables, ProgressionPolicy};
use super::round::{
    evaluate_round_end, RoundOutcomeInput, RoundPhase, WinAcknowledgements, WinReason,
};
use super::rules::RulesPolicy;
use super::scheduler;
use super::timers::{TimerAction, TimerRegistry};
use super::upgrade::{Purchase, UpgradeKind, UpgradeSet};
use super::GameError;

pub(crate) const WORLD_WIDTH: f32 = 576.0;
pub(crate) const WORLD_HEIGHT: f32 = 832.0;
/// Top of the orchard floor; bodies rest on it.
pub(crate) const GROUND_Y: f32 = 736.0;
const WORLD_GRAVITY_Y: f32 = 300.0;

/// Tunables and clock of the level being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RoundState {
    pub(crate) level: u32,
    pub(crate) apples_needed: u32,
    pub(crate) apple_spawn_interval_ms: u64,
    pub(crate) apple_gravity_y: u32,
    pub(crate) monkey_spawn_interval_ms: u64,
    /// Whole seconds left on the countdown.
    pub(crate) time_remaining: u32,
    pub(crate) paused: bool,
}

impl RoundState {
    fn from_tunables(tunables: &LevelTunables, time_limit_seconds: u32) -> Self {
        Self {
            level: tunables.level,
            apples_needed: tunables.apples_needed,
            apple_spawn_interval_ms: tunables.apple_spawn_interval_ms,
            apple_gravity_y: tunables.apple_gravity_y,
            monkey_spawn_interval_ms: tunables.monkey_spawn_interval_ms,
            time_remaining: time_limit_seconds,
            paused: false,
        }
    }
}

/// Everything one game owns, from the first level to a terminal screen.
#[derive(Debug)]
pub(crate) struct GameSession {
    progression: ProgressionPolicy,
    rules: RulesPolicy,
    rng: StdRng,
    phase: RoundPhase,
    round: RoundState,
    ledger: Ledger,
    stats: Stats,
    upgrades: UpgradeSet,
    acks: WinAcknowledgements,
    timers: TimerRegistry,
    player: Player,
    apples: ApplePool,
    bananas: Vec<Banana>,
    troop: Troop,
    events: EventBus,
    floor_bounds: WorldBounds,
    world_rect: WorldBounds,
}

impl GameSession {
    /// Starts a new game at level 1. Without a seed the RNG is seeded from
    /// the OS.
    pub(crate) fn new(
        progression: ProgressionPolicy,
        rules: RulesPolicy,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let tunables = progression.tunables_for(1);
        let mut session = Self {
            progression,
            rules,
            rng,
            phase: RoundPhase::Playing,
            round: RoundState::from_tunables(&tunables, progression.time_limit_seconds),
            ledger: Ledger::default(),
            stats: Stats::default(),
            upgrades: UpgradeSet::new(rules.price_growth),
            acks: WinAcknowledgements::default(),
            timers: TimerRegistry::default(),
            player: Player::new(0, 0),
            apples: ApplePool::default(),
            bananas: Vec::new(),
            troop: Troop::default(),
            events: EventBus::default(),
            floor_bounds: WorldBounds::new(Vec2::ZERO, Vec2::new(WORLD_WIDTH, GROUND_Y)),
            world_rect: WorldBounds::new(Vec2::ZERO, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)),
        };
        session.start_level(1);
        session
    }

    fn start_level(&mut self, level: u32) {
        let tunables = self.progression.tunables_for(level);
        self.round = RoundState::from_tunables(&tunables, self.progression.time_limit_seconds);
        let token = self.timers.begin_round();
        scheduler::arm_round(
            &mut self.timers,
            Duration::from_millis(self.round.apple_spawn_interval_ms),
            Duration::from_millis(self.round.monkey_spawn_interval_ms),
        );

        self.apples.clear();
        self.bananas.clear();
        self.troop.hide_all();
        let basket_degree = self.upgrades.get(UpgradeKind::Basket).degree();
        let deflect_charges = if basket_degree >= 2 {
            self.rules.deflect_charges
        } else {
            0
        };
        self.player = Player::new(basket_degree, deflect_charges);
        self.phase = RoundPhase::Playing;

        info!(
            level,
            apples_needed = self.round.apples_needed,
            starting_score = self.ledger.score(),
            round_token = token.get(),
            "round_started"
        );
        self.events.emit(GameEvent::RoundStarted { level });
    }

    /// Advances the round by one fixed step. Does nothing outside active
    /// play.
    pub(crate) fn tick(&mut self, dt: Duration, controls: ControlInput) {
        if self.phase != RoundPhase::Playing || self.round.paused {
            return;
        }

        let deadline = self.timers.now() + dt;
        while self.round.time_remaining > 0 {
            let Some(action) = self.timers.pop_due(deadline) else {
                break;
            };
            self.run_timer_action(action);
        }
        self.timers.settle_at(deadline);

        if self.round.time_remaining == 0 {
            self.end_round();
            return;
        }

        let walk_speed = self.upgrades.get(UpgradeKind::Speed).effect() as f32
            * interaction::speed_factor(&self.player, &self.apples, &self.rules);
        self.player.apply_controls(controls, walk_speed);

        let dt_seconds = dt.as_secs_f32();
        self.player
            .body
            .integrate(dt_seconds, WORLD_GRAVITY_Y, &self.floor_bounds);
        for apple in self.apples.iter_live_mut() {
            apple.body.integrate(dt_seconds, WORLD_GRAVITY_Y, &self.floor_bounds);
        }
        for banana in &mut self.bananas {
            banana.body.integrate(dt_seconds, WORLD_GRAVITY_Y, &self.world_rect);
        }

        let mut tally = Tally {
            ledger: &mut self.ledger,
            stats: &mut self.stats,
            events: &mut self.events,
        };
        interaction::resolve_catches(&self.player, &mut self.apples, &self.rules, &mut tally);
        interaction::mush_fallen_apples(&mut self.apples, &self.rules, tally.events);
        interaction::resolve_banana_strikes(
            &mut self.player,
            &mut self.bananas,
            &mut self.apples,
            self.round.apple_gravity_y,
            &self.rules,
            &mut self.rng,
            &mut tally,
        );
        interaction::cull_bananas(&mut self.bananas, &self.world_rect);
    }

    fn run_timer_action(&mut self, action: TimerAction) {
        match action {
            TimerAction::CountdownTick => {
                self.round.time_remaining = self.round.time_remaining.saturating_sub(1);
                self.events.emit(GameEvent::CountdownTick {
                    time_remaining: self.round.time_remaining,
                });
            }
            TimerAction::SpawnApple => {
                scheduler::spawn_apple(
                    &mut self.rng,
                    &mut self.apples,
                    self.upgrades.get(UpgradeKind::Luck).effect(),
                    self.round.apple_gravity_y,
                    &self.rules,
                );
            }
            TimerAction::ActivateMonkey => {
                let activated =
                    scheduler::activate_monkey(&mut self.rng, &mut self.troop, &mut self.timers);
                if let Some(side) = activated {
                    debug!(side = side.as_token(), "monkey_appeared");
                    self.events.emit(GameEvent::MonkeyAppeared { side });
                }
            }
            TimerAction::MonkeyThrow(side) => {
                if self.troop.is_visible(side) {
                    self.bananas
                        .push(scheduler::throw_banana(side, self.player.body.position));
                    self.events.emit(GameEvent::BananaThrown { side });
                }
            }
            TimerAction::MonkeyTaunt(side) => self.events.emit(GameEvent::MonkeyTaunted { side }),
            TimerAction::MonkeyHide(side) => {
                self.troop.hide(side);
                self.events.emit(GameEvent::MonkeyHidden { side });
            }
        }
    }

    fn end_round(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.bananas.clear();
        self.troop.hide_all();

        let excess = self.ledger.settle_round(self.round.apples_needed);
        self.phase = evaluate_round_end(
            RoundOutcomeInput {
                level: self.round.level,
                score: self.ledger.score(),
                apples_needed: self.round.apples_needed,
                upgrades_purchased: self.stats.upgrades_purchased,
            },
            self.acks,
            &self.rules,
        );

        info!(
            level = self.round.level,
            score = self.ledger.score(),
            apples_needed = self.round.apples_needed,
            excess,
            cancelled_tasks = cancelled,
            outcome = %self.phase,
            "level_ended"
        );
        self.events.emit(GameEvent::LevelEnded {
            level: self.round.level,
            score: self.ledger.score(),
            apples_needed: self.round.apples_needed,
            excess,
        });
        match self.phase {
            RoundPhase::GameOver => self.events.emit(GameEvent::GameOver),
            RoundPhase::GameWin(reason) => self.events.emit(GameEvent::GameWon { reason }),
            RoundPhase::Playing | RoundPhase::LevelComplete => {}
        }
    }

    fn refuse(&self, action: &'static str) -> GameError {
        GameError::InvalidTransition {
            phase: self.phase,
            action,
        }
    }

    pub(crate) fn pause(&mut self) -> Result<(), GameError> {
        if self.phase != RoundPhase::Playing || self.round.paused {
            return Err(self.refuse("pause"));
        }
        self.round.paused = true;
        self.timers.set_suspended(true);
        self.events.emit(GameEvent::Paused);
        debug!(
            level = self.round.level,
            time_remaining = self.round.time_remaining,
            "round_paused"
        );
        Ok(())
    }

    pub(crate) fn resume(&mut self) -> Result<(), GameError> {
        if self.phase != RoundPhase::Playing || !self.round.paused {
            return Err(self.refuse("resume"));
        }
        self.round.paused = false;
        self.timers.set_suspended(false);
        self.events.emit(GameEvent::Resumed);
        debug!(
            level = self.round.level,
            time_remaining = self.round.time_remaining,
            "round_resumed"
        );
        Ok(())
    }

    /// Buys one degree of an upgrade with excess apples. Only in the shop.
    pub(crate) fn purchase(&mut self, kind: UpgradeKind) -> Result<Purchase, GameError> {
        if self.phase != RoundPhase::LevelComplete {
            return Err(self.refuse("purchase"));
        }
        let purchase = self
            .upgrades
            .get_mut(kind)
            .purchase(&mut self.ledger, &mut self.stats)?;
        info!(
            upgrade = %purchase.kind,
            price_paid = purchase.price_paid,
            degree = purchase.new_degree,
            next_price = purchase.next_price,
            excess_left = self.ledger.excess_apples(),
            upgrades_owned = self.upgrades.total_degree(),
            "upgrade_purchased"
        );
        self.events.emit(GameEvent::UpgradePurchased {
            kind,
            degree: purchase.new_degree,
        });
        Ok(purchase)
    }

    pub(crate) fn continue_to_next_level(&mut self) -> Result<(), GameError> {
        if self.phase != RoundPhase::LevelComplete {
            return Err(self.refuse("continue"));
        }
        self.ledger.carry_into_next_level(CarryOver::Excess);
        self.start_level(self.round.level + 1);
        Ok(())
    }

    /// Keeps playing past a win. That win cannot trigger again this game,
    /// and playing past an upgrade win starts the next level from zero.
    pub(crate) fn continue_after_win(&mut self) -> Result<(), GameError> {
        let RoundPhase::GameWin(reason) = self.phase else {
            return Err(self.refuse("continue after a win"));
        };
        self.acks.acknowledge(reason);
        let carry = match reason {
            WinReason::Level => CarryOver::Excess,
            WinReason::Upgrades => CarryOver::Reset,
        };
        self.ledger.carry_into_next_level(carry);
        self.start_level(self.round.level + 1);
        Ok(())
    }

    /// Fresh game from a terminal screen.
    pub(crate) fn restart(&mut self) -> Result<(), GameError> {
        if !self.phase.is_terminal() {
            return Err(self.refuse("restart"));
        }
        self.ledger = Ledger::default();
        self.stats = Stats::default();
        self.upgrades = UpgradeSet::new(self.rules.price_growth);
        self.acks = WinAcknowledgements::default();
        self.start_level(1);
        Ok(())
    }

    /// Stops all pending work so the caller can drop the session.
    pub(crate) fn quit_to_menu(&mut self) -> Result<(), GameError> {
        if !self.round.paused && !self.phase.is_terminal() {
            return Err(self.refuse("quit to the menu"));
        }
        let cancelled = self.timers.cancel_all();
        info!(level = self.round.level, cancelled_tasks = cancelled, "quit_to_menu");
        Ok(())
    }

    pub(crate) fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub(crate) fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub(crate) fn round(&self) -> &RoundState {
        &self.round
    }

    /// What the shop's "next level" line advertises.
    pub(crate) fn next_level_tunables(&self) -> LevelTunables {
        self.progression.tunables_for(self.round.level + 1)
    }

    pub(crate) fn score(&self) -> u32 {
        self.ledger.score()
    }

    pub(crate) fn excess_apples(&self) -> u32 {
        self.ledger.excess_apples()
    }

    pub(crate) fn stats(&self) -> &Stats {
        &self.stats
    }

    pub(crate) fn upgrades(&self) -> &UpgradeSet {
        &self.upgrades
    }

    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    pub(crate) fn apples(&self) -> &ApplePool {
        &self.apples
    }

    pub(crate) fn bananas(&self) -> &[Banana] {
        &self.bananas
    }

    pub(crate) fn troop(&self) -> &Troop {
        &self.troop
    }

    #[cfg(test)]
    pub(crate) fn pending_timer_count(&self) -> usize {
        self.timers.pending_count()
    }

    /// Ends the current round now, as if the countdown had run out.
    #[cfg(test)]
    pub(crate) fn finish_round(&mut self) {
        assert_eq!(self.phase, RoundPhase::Playing, "only a running round can finish");
        self.round.time_remaining = 0;
        self.end_round();
    }

    #[cfg(test)]
    pub(crate) fn spawn_apple_at(
        &mut self,
        kind: super::entities::AppleKind,
        position: Vec2,
        velocity: Vec2,
    ) -> super::entities::AppleId {
        let body = engine::Body::new(position, scheduler::APPLE_HALF_EXTENTS)
            .with_velocity(velocity)
            .with_world_bounds(true);
        self.apples.spawn(kind, body)
    }

    #[cfg(test)]
    pub(crate) fn throw_banana_from(&mut self, side: super::entities::Side) {
        self.bananas
            .push(scheduler::throw_banana(side, self.player.body.position));
    }

    #[cfg(test)]
    pub(crate) fn add_score(&mut self, points: u32) {
        self.ledger.add_score(points);
    }
}
