//! Rules of the game, independent of the window and renderer: the economy,
//! upgrades, level tuning, the timer registry, spawning, collision outcomes,
//! and the round state machine that ties them together.

mod entities;
mod events;
mod interaction;
mod ledger;
mod player;
mod progression;
mod round;
mod rules;
mod scheduler;
mod session;
mod timers;
mod upgrade;

#[cfg(test)]
mod scenarios;

use thiserror::Error;

pub(crate) use entities::AppleKind;
pub(crate) use events::GameEvent;
pub(crate) use player::ControlInput;
pub(crate) use progression::ProgressionPolicy;
pub(crate) use round::{RoundPhase, WinReason};
pub(crate) use rules::RulesPolicy;
pub(crate) use session::{GameSession, GROUND_Y, WORLD_HEIGHT, WORLD_WIDTH};
pub(crate) use upgrade::{Affordability, UpgradeKind};

#[cfg(test)]
pub(crate) use progression::{ApplesNeededCurve, OpeningTunables};
#[cfg(test)]
pub(crate) use upgrade::PriceGrowth;

/// Refused player actions. None of these is fatal; the session is left
/// exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum GameError {
    #[error("not enough excess apples: price {price}, available {available}")]
    InsufficientFunds { price: u32, available: u32 },
    #[error("{kind} upgrade is already at its maximum degree {max}")]
    MaxDegreeReached { kind: UpgradeKind, max: u32 },
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        phase: RoundPhase,
        action: &'static str,
    },
}
