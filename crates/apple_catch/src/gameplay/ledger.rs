use super::GameError;

/// Lifetime counters shown on the terminal screens. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Stats {
    /// Every caught apple, golden included.
    pub(crate) total_apples: u32,
    pub(crate) golden_apples: u32,
    pub(crate) upgrades_purchased: u32,
    pub(crate) banana_hits: u32,
}

/// How the next level's score is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CarryOver {
    Excess,
    Reset,
}

/// Score for the running round and the excess apples that fund upgrades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Ledger {
    score: u32,
    excess_apples: u32,
}

impl Ledger {
    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn excess_apples(&self) -> u32 {
        self.excess_apples
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Drops one caught apple after a banana hit. Never takes the last one.
    pub(crate) fn forfeit_one(&mut self) -> bool {
        if self.score > 1 {
            self.score -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn settle_round(&mut self, apples_needed: u32) -> u32 {
        self.excess_apples = self.score.saturating_sub(apples_needed);
        self.excess_apples
    }

    pub(crate) fn spend(&mut self, price: u32) -> Result<(), GameError> {
        if self.excess_apples < price {
            return Err(GameError::InsufficientFunds {
                price,
                available: self.excess_apples,
            });
        }
        self.excess_apples -= price;
        Ok(())
    }

    pub(crate) fn carry_into_next_level(&mut self, carry: CarryOver) {
        self.score = match carry {
            CarryOver::Excess => self.excess_apples,
            CarryOver::Reset => 0,
        };
        self.excess_apples = 0;
    }

    #[cfg(test)]
    pub(crate) fn with_balances(score: u32, excess_apples: u32) -> Self {
        Self {
            score,
            excess_apples,
        }
    }
}
