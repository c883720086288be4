//! Apple spawning and monkey choreography. Everything deferred goes through
//! the timer registry under the current round token.

use std::time::Duration;

use engine::{Body, Vec2};
use rand::Rng;

use super::entities::{AppleId, AppleKind, ApplePool, Banana, Side, Troop};
use super::rules::RulesPolicy;
use super::timers::{TimerAction, TimerRegistry};

const SPAWN_X: (i32, i32) = (125, 475);
const SPAWN_Y: (i32, i32) = (100, 400);
const THROW_DELAY_MS: (u64, u64) = (1_000, 4_000);
const TAUNT_AFTER_THROW: Duration = Duration::from_millis(1_000);
const HIDE_AFTER_THROW: Duration = Duration::from_millis(2_500);
const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

pub(crate) const APPLE_HALF_EXTENTS: Vec2 = Vec2::new(12.0, 12.0);
pub(crate) const BANANA_HALF_EXTENTS: Vec2 = Vec2::new(12.0, 12.0);
const APPLE_BOUNCE: f32 = 0.1;
const BANANA_RELEASE_OFFSET: Vec2 = Vec2::new(40.0, -100.0);
/// Bananas are aimed slightly above the player's centre.
const BANANA_AIM_LIFT: f32 = 50.0;

/// Registers the periodic tasks of a fresh round.
pub(crate) fn arm_round(
    timers: &mut TimerRegistry,
    apple_spawn_interval: Duration,
    monkey_spawn_interval: Duration,
) {
    timers.schedule_every(COUNTDOWN_PERIOD, TimerAction::CountdownTick);
    timers.schedule_every(apple_spawn_interval, TimerAction::SpawnApple);
    timers.schedule_every(monkey_spawn_interval, TimerAction::ActivateMonkey);
}

pub(crate) fn roll_apple_kind(
    rng: &mut impl Rng,
    luck_effect: i32,
    rules: &RulesPolicy,
) -> AppleKind {
    let roll = rng.gen_range(0..=100_i64);
    let odds = i64::from(rules.golden_odds_per_luck) * i64::from(luck_effect);
    if roll < odds {
        AppleKind::Golden
    } else {
        AppleKind::Normal
    }
}

pub(crate) fn spawn_apple(
    rng: &mut impl Rng,
    apples: &mut ApplePool,
    luck_effect: i32,
    apple_gravity_y: u32,
    rules: &RulesPolicy,
) -> AppleId {
    let x = rng.gen_range(SPAWN_X.0..=SPAWN_X.1) as f32;
    let y = rng.gen_range(SPAWN_Y.0..=SPAWN_Y.1) as f32;
    let kind = roll_apple_kind(rng, luck_effect, rules);
    let velocity_y = rng.gen_range(-50_i32..=0) as f32;
    let body = Body::new(Vec2::new(x, y), APPLE_HALF_EXTENTS)
        .with_velocity(Vec2::new(0.0, velocity_y))
        .with_gravity_y(apple_gravity_y as f32)
        .with_bounce(APPLE_BOUNCE)
        .with_world_bounds(true);
    apples.spawn(kind, body)
}

/// Brings a monkey out on a free perch and queues its throw, taunt and exit.
pub(crate) fn activate_monkey(
    rng: &mut impl Rng,
    troop: &mut Troop,
    timers: &mut TimerRegistry,
) -> Option<Side> {
    let side = troop.choose_inactive_side(rng)?;
    troop.show(side);
    let throw_delay = Duration::from_millis(rng.gen_range(THROW_DELAY_MS.0..=THROW_DELAY_MS.1));
    timers.schedule_once(throw_delay, TimerAction::MonkeyThrow(side));
    timers.schedule_once(throw_delay + TAUNT_AFTER_THROW, TimerAction::MonkeyTaunt(side));
    timers.schedule_once(throw_delay + HIDE_AFTER_THROW, TimerAction::MonkeyHide(side));
    Some(side)
}

pub(crate) fn throw_banana(side: Side, target: Vec2) -> Banana {
    let release = side.perch() + BANANA_RELEASE_OFFSET;
    let velocity = Vec2::new(target.x - release.x, target.y - release.y - BANANA_AIM_LIFT);
    Banana {
        body: Body::new(release, BANANA_HALF_EXTENTS).with_velocity(velocity),
        thrown_from: side,
        deflected: false,
    }
}
