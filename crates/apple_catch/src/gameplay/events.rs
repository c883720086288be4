use super::entities::{AppleKind, Side};
use super::round::WinReason;
use super::upgrade::UpgradeKind;

/// Things that happened during a tick, for the presentation layer to turn
/// into sounds and screen changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameEvent {
    RoundStarted { level: u32 },
    CountdownTick { time_remaining: u32 },
    AppleCaught { kind: AppleKind, points: u32 },
    AppleMushed,
    BananaThrown { side: Side },
    PlayerHit { apple_lost: bool },
    BananaDeflected { charges_left: u32 },
    MonkeyAppeared { side: Side },
    MonkeyTaunted { side: Side },
    MonkeyHidden { side: Side },
    LevelEnded {
        level: u32,
        score: u32,
        apples_needed: u32,
        excess: u32,
    },
    GameOver,
    GameWon { reason: WinReason },
    UpgradePurchased { kind: UpgradeKind, degree: u32 },
    Paused,
    Resumed,
}

#[derive(Debug, Default)]
pub(crate) struct EventBus {
    pending: Vec<GameEvent>,
}

impl EventBus {
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }
}
