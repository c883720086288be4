use serde::{Deserialize, Serialize};

/// Shape of the apples-needed curve across levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub(crate) enum ApplesNeededCurve {
    /// `2(L-1) + 2*floor(L/5) + 8`
    #[default]
    Linear,
    /// `floor(0.4L^2 + ln L + 14)`, optionally divided by `L/10` past level 10.
    QuadraticLog {
        #[serde(default)]
        late_game_damping: bool,
    },
}

/// Hand-tuned first level; the formulas take over from level 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct OpeningTunables {
    pub(crate) apples_needed: u32,
    pub(crate) apple_spawn_interval_ms: u64,
    pub(crate) apple_gravity_y: u32,
    pub(crate) monkey_spawn_interval_ms: u64,
}

impl Default for OpeningTunables {
    fn default() -> Self {
        Self {
            apples_needed: 8,
            apple_spawn_interval_ms: 2_000,
            apple_gravity_y: 0,
            // Longer than the round: no monkey on level 1.
            monkey_spawn_interval_ms: 31_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelTunables {
    pub(crate) level: u32,
    pub(crate) apples_needed: u32,
    pub(crate) apples_to_spawn: u32,
    pub(crate) apple_spawn_interval_ms: u64,
    pub(crate) apple_gravity_y: u32,
    pub(crate) monkeys_to_spawn: u32,
    pub(crate) monkey_spawn_interval_ms: u64,
}

/// Difficulty scaling as pure functions of the level number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProgressionPolicy {
    pub(crate) time_limit_seconds: u32,
    pub(crate) apples_needed_curve: ApplesNeededCurve,
    pub(crate) monkey_level_divisor: u32,
    pub(crate) opening: OpeningTunables,
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            time_limit_seconds: 30,
            apples_needed_curve: ApplesNeededCurve::Linear,
            monkey_level_divisor: 3,
            opening: OpeningTunables::default(),
        }
    }
}

impl ProgressionPolicy {
    pub(crate) fn apples_needed(&self, level: u32) -> u32 {
        let level = level.max(1);
        match self.apples_needed_curve {
            ApplesNeededCurve::Linear => 2 * (level - 1) + 2 * (level / 5) + 8,
            ApplesNeededCurve::QuadraticLog { late_game_damping } => {
                let l = f64::from(level);
                let base = 0.4 * l * l + l.ln() + 14.0;
                let value = if late_game_damping && level > 10 {
                    base / (l / 10.0)
                } else {
                    base
                };
                value.floor() as u32
            }
        }
    }

    pub(crate) fn apples_to_spawn(&self, level: u32) -> u32 {
        let level = level.max(1);
        (self.apples_needed(level) + 6).saturating_sub(level / 5)
    }

    pub(crate) fn apple_spawn_interval_ms(&self, level: u32) -> u64 {
        self.even_spacing_ms(self.apples_to_spawn(level))
    }

    pub(crate) fn apple_gravity_y(&self, level: u32) -> u32 {
        5 * (level.max(1) - 1)
    }

    pub(crate) fn monkeys_to_spawn(&self, level: u32) -> u32 {
        match level.max(1) {
            2 => 1,
            level => level / self.monkey_level_divisor.max(1),
        }
    }

    pub(crate) fn monkey_spawn_interval_ms(&self, level: u32) -> u64 {
        self.even_spacing_ms(self.monkeys_to_spawn(level) + 1)
    }

    pub(crate) fn tunables_for(&self, level: u32) -> LevelTunables {
        let level = level.max(1);
        let mut tunables = LevelTunables {
            level,
            apples_needed: self.apples_needed(level),
            apples_to_spawn: self.apples_to_spawn(level),
            apple_spawn_interval_ms: self.apple_spawn_interval_ms(level),
            apple_gravity_y: self.apple_gravity_y(level),
            monkeys_to_spawn: self.monkeys_to_spawn(level),
            monkey_spawn_interval_ms: self.monkey_spawn_interval_ms(level),
        };
        if level == 1 {
            tunables.apples_needed = self.opening.apples_needed;
            tunables.apple_spawn_interval_ms = self.opening.apple_spawn_interval_ms;
            tunables.apple_gravity_y = self.opening.apple_gravity_y;
            tunables.monkey_spawn_interval_ms = self.opening.monkey_spawn_interval_ms;
        }
        tunables
    }

    /// Milliseconds between `count` evenly spaced events in one round,
    /// rounded to hundredths of a second.
    fn even_spacing_ms(&self, count: u32) -> u64 {
        let seconds = f64::from(self.time_limit_seconds) / f64::from(count.max(1));
        let hundredths = (seconds * 100.0).round();
        (hundredths * 10.0).round() as u64
    }
}
