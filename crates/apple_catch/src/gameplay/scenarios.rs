//! Whole-session runs driven tick by tick, the way the scene drives them.

use std::time::Duration;

use engine::Vec2;

use super::entities::{AppleKind, Side};
use super::events::GameEvent;
use super::player::{ControlInput, PlayerLook};
use super::progression::{OpeningTunables, ProgressionPolicy};
use super::round::{RoundPhase, WinReason};
use super::rules::RulesPolicy;
use super::session::GameSession;
use super::upgrade::{Affordability, UpgradeKind};
use super::GameError;

const TICK: Duration = Duration::from_nanos(16_666_667);
const MAX_ROUND_TICKS: usize = 40 * 60;

/// Level 1 with nothing spawning on its own, so only the apples a test
/// drops can be caught.
fn quiet_opening() -> ProgressionPolicy {
    ProgressionPolicy {
        opening: OpeningTunables {
            apple_spawn_interval_ms: 60_000,
            monkey_spawn_interval_ms: 60_000,
            ..OpeningTunables::default()
        },
        ..ProgressionPolicy::default()
    }
}

fn quiet_session() -> GameSession {
    let mut session = GameSession::new(quiet_opening(), RulesPolicy::default(), Some(42));
    let _ = session.drain_events();
    session
}

fn idle(session: &mut GameSession, ticks: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        session.tick(TICK, ControlInput::default());
        events.extend(session.drain_events());
    }
    events
}

/// Lets the player drop from the spawn point and come to rest.
fn settle_player(session: &mut GameSession) {
    idle(session, 90);
    assert!(session.player().body.blocked.down);
}

fn drop_into_basket(session: &mut GameSession, kind: AppleKind) {
    let above_basket = session.player().body.position - Vec2::new(0.0, 50.0);
    session.spawn_apple_at(kind, above_basket, Vec2::new(0.0, 200.0));
    session.tick(TICK, ControlInput::default());
}

fn run_until_round_ends(session: &mut GameSession) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..MAX_ROUND_TICKS {
        if session.phase() != RoundPhase::Playing {
            return events;
        }
        session.tick(TICK, ControlInput::default());
        events.extend(session.drain_events());
    }
    panic!("round did not end within {MAX_ROUND_TICKS} ticks");
}

fn tick_until(session: &mut GameSession, wanted: GameEvent) -> bool {
    for _ in 0..180 {
        session.tick(TICK, ControlInput::default());
        if session.drain_events().contains(&wanted) {
            return true;
        }
    }
    false
}

#[test]
fn nine_catches_on_level_one_open_the_shop_with_one_excess() {
    let mut session = quiet_session();
    assert_eq!(session.round().level, 1);
    assert_eq!(session.round().apples_needed, 8);
    assert_eq!(session.score(), 0);

    settle_player(&mut session);
    for _ in 0..9 {
        drop_into_basket(&mut session, AppleKind::Normal);
    }
    assert_eq!(session.score(), 9);
    assert_eq!(session.stats().total_apples, 9);

    let events = run_until_round_ends(&mut session);
    assert_eq!(session.phase(), RoundPhase::LevelComplete);
    assert_eq!(session.score(), 9);
    assert_eq!(session.excess_apples(), 1);
    assert!(events.contains(&GameEvent::LevelEnded {
        level: 1,
        score: 9,
        apples_needed: 8,
        excess: 1,
    }));
    assert_eq!(session.pending_timer_count(), 0);

    session.continue_to_next_level().expect("shop can continue");
    assert_eq!(session.round().level, 2);
    assert_eq!(session.round().apples_needed, 10);
    assert_eq!(session.score(), 1);
    assert_eq!(session.excess_apples(), 0);
    assert_eq!(session.round().time_remaining, 30);
}

#[test]
fn empty_basket_at_the_buzzer_is_game_over() {
    let mut session = quiet_session();
    let events = run_until_round_ends(&mut session);

    assert_eq!(session.phase(), RoundPhase::GameOver);
    assert!(events.contains(&GameEvent::GameOver));
    assert_eq!(session.round().time_remaining, 0);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, GameEvent::CountdownTick { .. }))
            .count(),
        30
    );
}

#[test]
fn golden_catch_counts_bonus_points() {
    let mut session = quiet_session();
    settle_player(&mut session);
    drop_into_basket(&mut session, AppleKind::Golden);

    assert_eq!(session.score(), 3);
    assert_eq!(session.stats().golden_apples, 1);
    assert_eq!(session.stats().total_apples, 1);
}

#[test]
fn pausing_freezes_the_whole_round() {
    let mut session =
        GameSession::new(ProgressionPolicy::default(), RulesPolicy::default(), Some(9));
    idle(&mut session, 150);
    session.spawn_apple_at(AppleKind::Normal, Vec2::new(140.0, 200.0), Vec2::new(0.0, -40.0));

    let snapshot = |session: &GameSession| {
        let apples: Vec<_> = session
            .apples()
            .iter_live()
            .map(|(id, apple)| (id, apple.kind, apple.body))
            .collect();
        (
            session.round().time_remaining,
            session.score(),
            session.player().body,
            apples,
        )
    };
    let before = snapshot(&session);

    let _ = session.drain_events();
    session.pause().expect("playing round can pause");
    assert_eq!(session.drain_events(), vec![GameEvent::Paused]);
    assert!(idle(&mut session, 600).is_empty());
    assert_eq!(snapshot(&session), before);

    session.resume().expect("paused round can resume");
    assert_eq!(snapshot(&session), before);
    assert_eq!(session.drain_events(), vec![GameEvent::Resumed]);

    session.tick(TICK, ControlInput::default());
    assert_ne!(snapshot(&session).3, before.3);
    assert_eq!(session.round().time_remaining, before.0);
}

#[test]
fn unarmoured_strike_stuns_and_costs_an_apple() {
    let mut session = quiet_session();
    settle_player(&mut session);
    session.add_score(5);

    session.throw_banana_from(Side::Right);
    assert!(tick_until(&mut session, GameEvent::PlayerHit { apple_lost: true }));

    assert_eq!(session.player().stun_ticks_left(), 35);
    assert_eq!(session.stats().banana_hits, 1);
    assert_eq!(session.score(), 4);
    assert!(session.bananas().is_empty());
}

#[test]
fn armoured_basket_deflects_instead_of_stunning() {
    let mut session = quiet_session();
    settle_player(&mut session);
    for _ in 0..38 {
        drop_into_basket(&mut session, AppleKind::Normal);
    }
    run_until_round_ends(&mut session);
    assert_eq!(session.excess_apples(), 30);

    assert_eq!(session.purchase(UpgradeKind::Basket).map(|p| p.price_paid), Ok(12));
    assert_eq!(session.purchase(UpgradeKind::Basket).map(|p| p.price_paid), Ok(18));
    assert_eq!(
        session.purchase(UpgradeKind::Basket),
        Err(GameError::MaxDegreeReached {
            kind: UpgradeKind::Basket,
            max: 2
        })
    );
    assert_eq!(session.stats().upgrades_purchased, 2);

    session.continue_to_next_level().expect("shop can continue");
    assert_eq!(session.player().deflect_charges(), 2);
    assert_eq!(session.player().look(), PlayerLook::ArmoredBasket { charges: 2 });

    settle_player(&mut session);
    session.throw_banana_from(Side::Left);
    assert!(tick_until(&mut session, GameEvent::BananaDeflected { charges_left: 1 }));

    assert_eq!(session.player().deflect_charges(), 1);
    assert!(!session.player().is_stunned());
    assert_eq!(session.stats().banana_hits, 0);
    assert_eq!(session.player().look(), PlayerLook::ArmoredBasket { charges: 1 });
}

#[test]
fn choreography_from_an_ended_round_never_reaches_the_next() {
    let progression = ProgressionPolicy {
        opening: OpeningTunables {
            apple_spawn_interval_ms: 60_000,
            monkey_spawn_interval_ms: 29_500,
            ..OpeningTunables::default()
        },
        ..ProgressionPolicy::default()
    };
    let mut session = GameSession::new(progression, RulesPolicy::default(), Some(3));
    settle_player(&mut session);
    for _ in 0..8 {
        drop_into_basket(&mut session, AppleKind::Normal);
    }

    let events = run_until_round_ends(&mut session);
    assert!(events
        .iter()
        .any(|event| matches!(event, GameEvent::MonkeyAppeared { .. })));
    assert_eq!(session.phase(), RoundPhase::LevelComplete);
    assert_eq!(session.pending_timer_count(), 0);
    assert!(session.troop().iter().all(|monkey| !monkey.visible));

    session.continue_to_next_level().expect("shop can continue");
    let events = idle(&mut session, 5 * 60);
    assert!(!events.iter().any(|event| matches!(
        event,
        GameEvent::BananaThrown { .. }
            | GameEvent::MonkeyTaunted { .. }
            | GameEvent::MonkeyHidden { .. }
    )));
    assert!(session.bananas().is_empty());
}

#[test]
fn refused_actions_leave_the_session_untouched() {
    let mut session = quiet_session();
    assert_eq!(
        session.purchase(UpgradeKind::Speed),
        Err(GameError::InvalidTransition {
            phase: RoundPhase::Playing,
            action: "purchase"
        })
    );
    assert!(session.continue_to_next_level().is_err());
    assert!(session.continue_after_win().is_err());
    assert!(session.restart().is_err());
    assert!(session.quit_to_menu().is_err());
    assert!(session.resume().is_err());

    session.pause().expect("playing round can pause");
    assert!(session.pause().is_err());
    session.quit_to_menu().expect("paused round can quit");
    assert_eq!(session.pending_timer_count(), 0);
}

#[test]
fn shop_refuses_unaffordable_upgrades() {
    let mut session = quiet_session();
    settle_player(&mut session);
    for _ in 0..9 {
        drop_into_basket(&mut session, AppleKind::Normal);
    }
    run_until_round_ends(&mut session);

    assert_eq!(
        session.purchase(UpgradeKind::Speed),
        Err(GameError::InsufficientFunds {
            price: 5,
            available: 1
        })
    );
    assert_eq!(session.excess_apples(), 1);
    assert_eq!(session.upgrades().get(UpgradeKind::Speed).degree(), 0);
    assert_eq!(session.stats().upgrades_purchased, 0);
}

#[test]
fn restart_after_game_over_begins_a_fresh_game() {
    let mut session = quiet_session();
    settle_player(&mut session);
    drop_into_basket(&mut session, AppleKind::Golden);
    run_until_round_ends(&mut session);
    assert_eq!(session.phase(), RoundPhase::GameOver);
    assert!(session.pause().is_err());

    session.restart().expect("game over can restart");
    assert_eq!(session.phase(), RoundPhase::Playing);
    assert_eq!(session.round().level, 1);
    assert_eq!(session.score(), 0);
    assert_eq!(session.stats().total_apples, 0);
    assert_eq!(session.stats().golden_apples, 0);
    assert!(session.pending_timer_count() > 0);
}

#[test]
fn playing_past_an_upgrade_win_starts_the_next_level_from_zero() {
    let mut session = quiet_session();
    session.add_score(200);
    session.finish_round();
    assert_eq!(session.phase(), RoundPhase::LevelComplete);

    for kind in UpgradeKind::ALL {
        while session.upgrades().get(kind).affordability(session.excess_apples())
            == Affordability::Affordable
        {
            session.purchase(kind).expect("affordable upgrade");
        }
        assert_eq!(
            session.upgrades().get(kind).affordability(session.excess_apples()),
            Affordability::Maxed
        );
    }
    assert_eq!(session.stats().upgrades_purchased, 11);
    let left_over = session.excess_apples();

    session.continue_to_next_level().expect("shop can continue");
    assert_eq!(session.round().level, 2);
    assert_eq!(session.score(), left_over);

    session.add_score(20);
    session.finish_round();
    assert_eq!(session.phase(), RoundPhase::GameWin(WinReason::Upgrades));
    assert_eq!(session.score(), left_over + 20);
    assert_eq!(session.excess_apples(), left_over + 10);
    assert!(session.drain_events().contains(&GameEvent::GameWon {
        reason: WinReason::Upgrades
    }));

    session.continue_after_win().expect("win can continue");
    assert_eq!(session.phase(), RoundPhase::Playing);
    assert_eq!(session.round().level, 3);
    assert_eq!(session.score(), 0);
    assert_eq!(session.excess_apples(), 0);

    session.add_score(40);
    session.finish_round();
    assert_eq!(session.phase(), RoundPhase::LevelComplete);
    assert!(!session
        .drain_events()
        .iter()
        .any(|event| matches!(event, GameEvent::GameWon { .. })));
}

#[test]
fn playing_past_a_level_win_keeps_the_excess() {
    let rules = RulesPolicy {
        final_level: 2,
        ..RulesPolicy::default()
    };
    let mut session = GameSession::new(quiet_opening(), rules, Some(42));
    session.add_score(15);
    session.finish_round();
    assert_eq!(session.phase(), RoundPhase::LevelComplete);
    assert_eq!(session.excess_apples(), 7);

    session.continue_to_next_level().expect("shop can continue");
    assert_eq!(session.score(), 7);
    session.add_score(8);
    session.finish_round();
    assert_eq!(session.phase(), RoundPhase::GameWin(WinReason::Level));
    assert_eq!(session.excess_apples(), 5);
    assert!(session.purchase(UpgradeKind::Speed).is_err());

    session.continue_after_win().expect("win can continue");
    assert_eq!(session.round().level, 3);
    assert_eq!(session.score(), 5);

    session.add_score(20);
    session.finish_round();
    assert_eq!(session.phase(), RoundPhase::LevelComplete);
}
