use serde::{Deserialize, Serialize};

use super::upgrade::PriceGrowth;

/// Scoring, hazard and win-condition constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RulesPolicy {
    /// Extra points on top of the base point for a golden apple.
    pub(crate) golden_bonus: u32,
    /// Golden odds, in percent, granted per point of luck.
    pub(crate) golden_odds_per_luck: u32,
    pub(crate) stun_ticks: u32,
    pub(crate) mush_threshold_y: f32,
    /// Bananas only strike while this close to the player's centre line.
    pub(crate) strike_band_half_width: f32,
    pub(crate) mush_speed_factor: f32,
    pub(crate) deflect_charges: u32,
    pub(crate) deflect_speed_multiplier: f32,
    pub(crate) price_growth: PriceGrowth,
    pub(crate) final_level: u32,
    pub(crate) upgrade_win_threshold: u32,
    /// Only count catches where the apple closes in from above.
    pub(crate) catch_requires_descent: bool,
}

impl Default for RulesPolicy {
    fn default() -> Self {
        Self {
            golden_bonus: 2,
            golden_odds_per_luck: 3,
            stun_ticks: 35,
            mush_threshold_y: 675.0,
            strike_band_half_width: 60.0,
            mush_speed_factor: 0.7,
            deflect_charges: 2,
            deflect_speed_multiplier: 5.0,
            price_growth: PriceGrowth::HalfAgain,
            final_level: 30,
            upgrade_win_threshold: 11,
            catch_requires_descent: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_rules_keep_defaults_for_missing_fields() {
        let json = r#"{ "golden_bonus": 4, "price_growth": { "rule": "fixed_step", "step": 3 } }"#;
        let rules: RulesPolicy = serde_json::from_str(json).expect("rules should parse");

        assert_eq!(rules.golden_bonus, 4);
        assert_eq!(rules.price_growth, PriceGrowth::FixedStep { step: 3 });
        assert_eq!(rules.stun_ticks, 35);
        assert_eq!(rules.final_level, 30);
    }
}
