//! Per-tick contact rules between the player and everything that moves.
//! Every live entity is checked every tick.

use engine::{Body, Vec2, WorldBounds};
use rand::Rng;
use tracing::debug;

use super::entities::{AppleKind, ApplePool, Banana};
use super::events::{EventBus, GameEvent};
use super::ledger::{Ledger, Stats};
use super::player::Player;
use super::rules::RulesPolicy;
use super::scheduler::APPLE_HALF_EXTENTS;

const LOST_APPLE_SPEED: f32 = 500.0;

/// The bookkeeping a contact can change.
pub(crate) struct Tally<'a> {
    pub(crate) ledger: &'a mut Ledger,
    pub(crate) stats: &'a mut Stats,
    pub(crate) events: &'a mut EventBus,
}

/// Walking speed multiplier: slowed while standing in mush.
pub(crate) fn speed_factor(player: &Player, apples: &ApplePool, rules: &RulesPolicy) -> f32 {
    let player_box = player.body.aabb();
    let in_mush = apples
        .iter_live()
        .any(|(_, apple)| !apple.kind.is_collectable() && apple.body.aabb().overlaps(&player_box));
    if in_mush {
        rules.mush_speed_factor
    } else {
        1.0
    }
}

fn is_catch(player: &Body, apple: &Body, rules: &RulesPolicy) -> bool {
    if !apple.aabb().overlaps(&player.aabb()) || apple.position.y >= player.position.y {
        return false;
    }
    !rules.catch_requires_descent || apple.velocity.y - player.velocity.y > 0.0
}

pub(crate) fn resolve_catches(
    player: &Player,
    apples: &mut ApplePool,
    rules: &RulesPolicy,
    tally: &mut Tally<'_>,
) {
    for id in apples.live_ids() {
        let Some(apple) = apples.get(id) else {
            continue;
        };
        if !apple.kind.is_collectable() || !is_catch(&player.body, &apple.body, rules) {
            continue;
        }
        let kind = apple.kind;
        let points = match kind {
            AppleKind::Golden => {
                tally.stats.golden_apples += 1;
                1 + rules.golden_bonus
            }
            _ => 1,
        };
        tally.ledger.add_score(points);
        tally.stats.total_apples += 1;
        apples.release(id);
        debug!(kind = kind.as_token(), points, score = tally.ledger.score(), "apple_caught");
        tally.events.emit(GameEvent::AppleCaught { kind, points });
    }
}

/// Turns uncaught apples that fell past the threshold into mush, once.
pub(crate) fn mush_fallen_apples(
    apples: &mut ApplePool,
    rules: &RulesPolicy,
    events: &mut EventBus,
) {
    for apple in apples.iter_live_mut() {
        if apple.kind.is_collectable() && apple.body.position.y > rules.mush_threshold_y {
            apple.kind = apple.kind.to_mush();
            events.emit(GameEvent::AppleMushed);
        }
    }
}

/// Bananas that reach the player are either deflected by an armoured
/// basket or knock the player back, costing one apple when there is one
/// to spare.
pub(crate) fn resolve_banana_strikes(
    player: &mut Player,
    bananas: &mut Vec<Banana>,
    apples: &mut ApplePool,
    apple_gravity_y: u32,
    rules: &RulesPolicy,
    rng: &mut impl Rng,
    tally: &mut Tally<'_>,
) {
    bananas.retain_mut(|banana| {
        if banana.deflected || !is_strike(&player.body, &banana.body, rules) {
            return true;
        }

        if player.try_consume_deflect() {
            let velocity = banana.body.velocity;
            banana.body.velocity =
                Vec2::new(-velocity.x * rules.deflect_speed_multiplier, -velocity.y);
            banana.deflected = true;
            tally.events.emit(GameEvent::BananaDeflected {
                charges_left: player.deflect_charges(),
            });
            return true;
        }

        debug!(thrown_from = banana.thrown_from.as_token(), "banana_strike");
        player.knock_back(rules.stun_ticks);
        tally.stats.banana_hits += 1;
        let apple_lost = tally.ledger.forfeit_one();
        if apple_lost {
            let velocity = Vec2::new(
                rng.gen_range(-LOST_APPLE_SPEED..=LOST_APPLE_SPEED),
                -LOST_APPLE_SPEED,
            );
            let body = Body::new(player.body.position, APPLE_HALF_EXTENTS)
                .with_velocity(velocity)
                .with_gravity_y(apple_gravity_y as f32)
                .with_world_bounds(true);
            apples.spawn(AppleKind::Mush { from_golden: false }, body);
        }
        tally.events.emit(GameEvent::PlayerHit { apple_lost });
        false
    });
}

fn is_strike(player: &Body, banana: &Body, rules: &RulesPolicy) -> bool {
    banana.aabb().overlaps(&player.aabb())
        && (banana.position.x - player.position.x).abs() < rules.strike_band_half_width
}

/// Drops bananas that have left the world.
pub(crate) fn cull_bananas(bananas: &mut Vec<Banana>, world: &WorldBounds) {
    bananas.retain(|banana| world.intersects(&banana.body.aabb()));
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::gameplay::entities::Side;

    struct Fixture {
        ledger: Ledger,
        stats: Stats,
        events: EventBus,
    }

    impl Fixture {
        fn with_score(score: u32) -> Self {
            Self {
                ledger: Ledger::with_balances(score, 0),
                stats: Stats::default(),
                events: EventBus::default(),
            }
        }

        fn tally(&mut self) -> Tally<'_> {
            Tally {
                ledger: &mut self.ledger,
                stats: &mut self.stats,
                events: &mut self.events,
            }
        }
    }

    fn grounded_player(degree: u32, charges: u32) -> Player {
        let mut player = Player::new(degree, charges);
        player.body.position = Vec2::new(288.0, 672.0);
        player
    }

    fn falling_apple(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), APPLE_HALF_EXTENTS).with_velocity(Vec2::new(0.0, 120.0))
    }

    fn banana_at(x: f32, y: f32) -> Banana {
        Banana {
            body: Body::new(Vec2::new(x, y), Vec2::new(12.0, 12.0))
                .with_velocity(Vec2::new(-40.0, 300.0)),
            thrown_from: Side::Left,
            deflected: false,
        }
    }

    #[test]
    fn normal_catch_scores_one_and_recycles_the_slot() {
        let rules = RulesPolicy::default();
        let player = grounded_player(0, 0);
        let mut apples = ApplePool::default();
        apples.spawn(AppleKind::Normal, falling_apple(290.0, 620.0));
        let mut fixture = Fixture::with_score(0);

        resolve_catches(&player, &mut apples, &rules, &mut fixture.tally());

        assert_eq!(fixture.ledger.score(), 1);
        assert_eq!(fixture.stats.total_apples, 1);
        assert_eq!(fixture.stats.golden_apples, 0);
        assert_eq!(apples.recycled_count(), 1);
        assert_eq!(
            fixture.events.drain(),
            vec![GameEvent::AppleCaught {
                kind: AppleKind::Normal,
                points: 1
            }]
        );
    }

    #[test]
    fn golden_catch_adds_the_bonus() {
        let rules = RulesPolicy::default();
        let player = grounded_player(0, 0);
        let mut apples = ApplePool::default();
        apples.spawn(AppleKind::Golden, falling_apple(280.0, 620.0));
        let mut fixture = Fixture::with_score(4);

        resolve_catches(&player, &mut apples, &rules, &mut fixture.tally());

        assert_eq!(fixture.ledger.score(), 7);
        assert_eq!(fixture.stats.total_apples, 1);
        assert_eq!(fixture.stats.golden_apples, 1);
        assert_eq!(apples.recycled_count(), 0);
        assert_eq!(apples.live_count(), 0);
    }

    #[test]
    fn apple_rising_into_the_basket_is_not_caught() {
        let rules = RulesPolicy::default();
        let player = grounded_player(0, 0);
        let mut apples = ApplePool::default();
        let rising = falling_apple(290.0, 620.0).with_velocity(Vec2::new(0.0, -80.0));
        apples.spawn(AppleKind::Normal, rising);
        let mut fixture = Fixture::with_score(0);

        resolve_catches(&player, &mut apples, &rules, &mut fixture.tally());
        assert_eq!(fixture.ledger.score(), 0);

        let lenient = RulesPolicy {
            catch_requires_descent: false,
            ..RulesPolicy::default()
        };
        resolve_catches(&player, &mut apples, &lenient, &mut fixture.tally());
        assert_eq!(fixture.ledger.score(), 1);
    }

    #[test]
    fn apple_below_the_player_centre_is_not_caught() {
        let rules = RulesPolicy::default();
        let player = grounded_player(0, 0);
        let mut apples = ApplePool::default();
        apples.spawn(AppleKind::Normal, falling_apple(290.0, 700.0));
        let mut fixture = Fixture::with_score(0);

        resolve_catches(&player, &mut apples, &rules, &mut fixture.tally());
        assert_eq!(fixture.ledger.score(), 0);
        assert_eq!(apples.live_count(), 1);
    }

    #[test]
    fn mush_transition_happens_once_and_blocks_catching() {
        let rules = RulesPolicy::default();
        let mut apples = ApplePool::default();
        let id = apples.spawn(AppleKind::Golden, falling_apple(100.0, 700.0));
        let mut events = EventBus::default();

        mush_fallen_apples(&mut apples, &rules, &mut events);
        mush_fallen_apples(&mut apples, &rules, &mut events);

        assert_eq!(events.drain(), vec![GameEvent::AppleMushed]);
        let apple = apples.get(id).expect("mush stays in the world");
        assert_eq!(apple.kind, AppleKind::Mush { from_golden: true });

        let mut player = grounded_player(0, 0);
        player.body.position = Vec2::new(100.0, 750.0);
        let mut fixture = Fixture::with_score(0);
        resolve_catches(&player, &mut apples, &rules, &mut fixture.tally());
        assert_eq!(fixture.ledger.score(), 0);
    }

    #[test]
    fn standing_in_mush_slows_the_player() {
        let rules = RulesPolicy::default();
        let player = grounded_player(0, 0);
        let mut apples = ApplePool::default();
        assert_eq!(speed_factor(&player, &apples, &rules), 1.0);

        apples.spawn(AppleKind::Normal, falling_apple(290.0, 700.0));
        assert_eq!(speed_factor(&player, &apples, &rules), 1.0);

        apples.spawn(AppleKind::Mush { from_golden: false }, falling_apple(300.0, 724.0));
        assert_eq!(speed_factor(&player, &apples, &rules), 0.7);
    }

    #[test]
    fn strike_without_charge_knocks_back_and_costs_an_apple() {
        let rules = RulesPolicy::default();
        let mut player = grounded_player(0, 0);
        player.body.velocity = Vec2::new(200.0, 0.0);
        let mut bananas = vec![banana_at(300.0, 640.0)];
        let mut apples = ApplePool::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut fixture = Fixture::with_score(5);

        resolve_banana_strikes(
            &mut player,
            &mut bananas,
            &mut apples,
            5,
            &rules,
            &mut rng,
            &mut fixture.tally(),
        );

        assert!(bananas.is_empty());
        assert_eq!(player.body.velocity.x, -200.0);
        assert_eq!(player.stun_ticks_left(), 35);
        assert_eq!(fixture.stats.banana_hits, 1);
        assert_eq!(fixture.ledger.score(), 4);
        assert_eq!(apples.live_count(), 1);
        let (_, lost) = apples.iter_live().next().expect("lost apple spawned");
        assert_eq!(lost.kind, AppleKind::Mush { from_golden: false });
        assert_eq!(lost.body.velocity.y, -500.0);
        assert_eq!(fixture.events.drain(), vec![GameEvent::PlayerHit { apple_lost: true }]);
    }

    #[test]
    fn strike_keeps_the_last_apple() {
        let rules = RulesPolicy::default();
        let mut player = grounded_player(0, 0);
        let mut bananas = vec![banana_at(300.0, 640.0)];
        let mut apples = ApplePool::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut fixture = Fixture::with_score(1);

        resolve_banana_strikes(
            &mut player,
            &mut bananas,
            &mut apples,
            0,
            &rules,
            &mut rng,
            &mut fixture.tally(),
        );

        assert_eq!(fixture.ledger.score(), 1);
        assert_eq!(fixture.stats.banana_hits, 1);
        assert_eq!(apples.live_count(), 0);
    }

    #[test]
    fn deflect_consumes_a_charge_instead_of_stunning() {
        let rules = RulesPolicy::default();
        let mut player = grounded_player(2, 2);
        let mut bananas = vec![banana_at(300.0, 640.0)];
        let mut apples = ApplePool::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut fixture = Fixture::with_score(5);

        resolve_banana_strikes(
            &mut player,
            &mut bananas,
            &mut apples,
            0,
            &rules,
            &mut rng,
            &mut fixture.tally(),
        );

        assert_eq!(player.deflect_charges(), 1);
        assert!(!player.is_stunned());
        assert_eq!(fixture.ledger.score(), 5);
        assert_eq!(fixture.stats.banana_hits, 0);
        assert_eq!(bananas.len(), 1);
        assert!(bananas[0].deflected);
        assert_eq!(bananas[0].body.velocity, Vec2::new(200.0, -300.0));
        assert_eq!(
            fixture.events.drain(),
            vec![GameEvent::BananaDeflected { charges_left: 1 }]
        );

        resolve_banana_strikes(
            &mut player,
            &mut bananas,
            &mut apples,
            0,
            &rules,
            &mut rng,
            &mut fixture.tally(),
        );
        assert_eq!(player.deflect_charges(), 1);
    }

    #[test]
    fn banana_outside_the_strike_band_is_ignored() {
        let rules = RulesPolicy::default();
        let mut player = grounded_player(2, 0);
        let mut bananas = vec![banana_at(360.0, 640.0)];
        let mut apples = ApplePool::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut fixture = Fixture::with_score(5);

        resolve_banana_strikes(
            &mut player,
            &mut bananas,
            &mut apples,
            0,
            &rules,
            &mut rng,
            &mut fixture.tally(),
        );

        assert_eq!(bananas.len(), 1);
        assert_eq!(fixture.stats.banana_hits, 0);
    }

    #[test]
    fn bananas_leaving_the_world_are_culled() {
        let world = WorldBounds::new(Vec2::ZERO, Vec2::new(576.0, 832.0));
        let mut bananas = vec![
            banana_at(300.0, 400.0),
            banana_at(-40.0, 400.0),
            banana_at(300.0, 900.0),
        ];
        cull_bananas(&mut bananas, &world);
        assert_eq!(bananas.len(), 1);
    }
}
