use std::fmt;

use super::rules::RulesPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WinReason {
    /// Reached the final level.
    Level,
    /// Bought enough upgrades.
    Upgrades,
}

impl WinReason {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            WinReason::Level => "level",
            WinReason::Upgrades => "upgrades",
        }
    }
}

/// Where the game is between and during rounds. Pausing is an overlay on
/// `Playing`, tracked on the round state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoundPhase {
    Playing,
    LevelComplete,
    GameOver,
    GameWin(WinReason),
}

impl RoundPhase {
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, RoundPhase::GameOver | RoundPhase::GameWin(_))
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPhase::Playing => f.write_str("playing"),
            RoundPhase::LevelComplete => f.write_str("in the shop"),
            RoundPhase::GameOver => f.write_str("game over"),
            RoundPhase::GameWin(reason) => write!(f, "won ({})", reason.as_token()),
        }
    }
}

/// Wins the player already chose to play past. Each can only trigger once
/// per game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WinAcknowledgements {
    pub(crate) level: bool,
    pub(crate) upgrades: bool,
}

impl WinAcknowledgements {
    pub(crate) fn acknowledge(&mut self, reason: WinReason) {
        match reason {
            WinReason::Level => self.level = true,
            WinReason::Upgrades => self.upgrades = true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RoundOutcomeInput {
    pub(crate) level: u32,
    pub(crate) score: u32,
    pub(crate) apples_needed: u32,
    pub(crate) upgrades_purchased: u32,
}

/// Phase entered when the countdown reaches zero.
pub(crate) fn evaluate_round_end(
    round: RoundOutcomeInput,
    acks: WinAcknowledgements,
    rules: &RulesPolicy,
) -> RoundPhase {
    if round.score < round.apples_needed {
        RoundPhase::GameOver
    } else if round.level >= rules.final_level && !acks.level {
        RoundPhase::GameWin(WinReason::Level)
    } else if round.upgrades_purchased >= rules.upgrade_win_threshold && !acks.upgrades {
        RoundPhase::GameWin(WinReason::Upgrades)
    } else {
        RoundPhase::LevelComplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(level: u32, score: u32, needed: u32, upgrades: u32) -> RoundOutcomeInput {
        RoundOutcomeInput {
            level,
            score,
            apples_needed: needed,
            upgrades_purchased: upgrades,
        }
    }

    #[test]
    fn short_score_loses_even_at_the_final_level() {
        let rules = RulesPolicy::default();
        let acks = WinAcknowledgements::default();
        let phase = evaluate_round_end(outcome(30, 10, 78, 20), acks, &rules);
        assert_eq!(phase, RoundPhase::GameOver);
    }

    #[test]
    fn final_level_win_takes_priority_over_upgrade_win() {
        let rules = RulesPolicy::default();
        let acks = WinAcknowledgements::default();
        let phase = evaluate_round_end(outcome(30, 80, 78, 11), acks, &rules);
        assert_eq!(phase, RoundPhase::GameWin(WinReason::Level));
    }

    #[test]
    fn acknowledged_wins_do_not_trigger_again() {
        let rules = RulesPolicy::default();
        let mut acks = WinAcknowledgements::default();
        assert_eq!(
            evaluate_round_end(outcome(4, 20, 14, 11), acks, &rules),
            RoundPhase::GameWin(WinReason::Upgrades)
        );

        acks.acknowledge(WinReason::Upgrades);
        assert_eq!(
            evaluate_round_end(outcome(5, 20, 18, 12), acks, &rules),
            RoundPhase::LevelComplete
        );
    }

    #[test]
    fn exact_requirement_completes_the_level() {
        let rules = RulesPolicy::default();
        let acks = WinAcknowledgements::default();
        let phase = evaluate_round_end(outcome(1, 8, 8, 0), acks, &rules);
        assert_eq!(phase, RoundPhase::LevelComplete);
    }
}
