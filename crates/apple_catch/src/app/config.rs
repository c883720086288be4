use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gameplay::{ProgressionPolicy, RulesPolicy, GROUND_Y};

pub(crate) const CONFIG_ENV_VAR: &str = "APPLE_CATCH_CONFIG";
pub(crate) const SEED_ENV_VAR: &str = "APPLE_CATCH_SEED";

/// Tuning file contents. Every field is optional; missing ones keep the
/// shipped defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) progression: ProgressionPolicy,
    pub(crate) rules: RulesPolicy,
    /// Fixed RNG seed for reproducible runs.
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("read config '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("parse config '{}'{}: {source}", .path.display(), field_suffix(.field))]
    Parse {
        path: PathBuf,
        field: String,
        source: serde_json::Error,
    },
    #[error("APPLE_CATCH_SEED must be an unsigned integer, got '{value}': {source}")]
    InvalidSeed { value: String, source: ParseIntError },
    #[error("validation failed at {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

fn field_suffix(field: &str) -> String {
    if field.is_empty() || field == "." {
        String::new()
    } else {
        format!(" at {field}")
    }
}

/// Reads the file named by `APPLE_CATCH_CONFIG` (defaults when unset) and
/// applies the `APPLE_CATCH_SEED` override.
pub(crate) fn load_config_from_env() -> Result<GameConfig, ConfigError> {
    let config_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    let seed_override = std::env::var(SEED_ENV_VAR).ok();
    resolve_config(config_path.as_deref(), seed_override.as_deref())
}

fn resolve_config(
    config_path: Option<&Path>,
    seed_override: Option<&str>,
) -> Result<GameConfig, ConfigError> {
    let mut config = match config_path {
        Some(path) => load_config_from_path(path)?,
        None => GameConfig::default(),
    };
    if let Some(raw) = seed_override.map(str::trim).filter(|raw| !raw.is_empty()) {
        let seed = raw.parse::<u64>().map_err(|source| ConfigError::InvalidSeed {
            value: raw.to_string(),
            source,
        })?;
        config.seed = Some(seed);
    }
    Ok(config)
}

pub(crate) fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_json(&raw, path)?;
    validate_config(&config)?;
    Ok(config)
}

fn parse_config_json(raw: &str, path: &Path) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

fn validate_config(config: &GameConfig) -> Result<(), ConfigError> {
    let progression = &config.progression;
    let rules = &config.rules;
    if progression.time_limit_seconds == 0 {
        return Err(invalid("progression.time_limit_seconds", "must be at least 1"));
    }
    if progression.monkey_level_divisor == 0 {
        return Err(invalid("progression.monkey_level_divisor", "must be at least 1"));
    }
    if progression.opening.apple_spawn_interval_ms == 0 {
        return Err(invalid("progression.opening.apple_spawn_interval_ms", "must be positive"));
    }
    if rules.final_level == 0 {
        return Err(invalid("rules.final_level", "must be at least 1"));
    }
    if !(rules.mush_speed_factor > 0.0 && rules.mush_speed_factor <= 1.0) {
        return Err(invalid(
            "rules.mush_speed_factor",
            format!("expected a value in (0, 1], got {}", rules.mush_speed_factor),
        ));
    }
    if !(rules.mush_threshold_y > 0.0 && rules.mush_threshold_y < GROUND_Y) {
        return Err(invalid(
            "rules.mush_threshold_y",
            format!(
                "expected a value above the ground line {GROUND_Y}, got {}",
                rules.mush_threshold_y
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::gameplay::{ApplesNeededCurve, PriceGrowth};

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn missing_config_uses_defaults() {
        let config = resolve_config(None, None).expect("defaults");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.progression.time_limit_seconds, 30);
        assert_eq!(config.rules.golden_bonus, 2);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let file = write_config(
            r#"{
                "progression": {
                    "apples_needed_curve": { "curve": "quadratic_log", "late_game_damping": true }
                },
                "rules": { "price_growth": { "rule": "fixed_step", "step": 4 } },
                "seed": 77
            }"#,
        );
        let config = load_config_from_path(file.path()).expect("config parses");

        assert_eq!(
            config.progression.apples_needed_curve,
            ApplesNeededCurve::QuadraticLog {
                late_game_damping: true
            }
        );
        assert_eq!(config.rules.price_growth, PriceGrowth::FixedStep { step: 4 });
        assert_eq!(config.seed, Some(77));
        assert_eq!(config.progression.monkey_level_divisor, 3);
    }

    #[test]
    fn parse_error_names_the_offending_field() {
        let file = write_config(r#"{ "rules": { "stun_ticks": "long" } }"#);
        let error = load_config_from_path(file.path()).expect_err("wrong type");

        let ConfigError::Parse { field, .. } = &error else {
            panic!("expected parse error, got {error:?}");
        };
        assert_eq!(field, "rules.stun_ticks");
        assert!(error.to_string().contains("at rules.stun_ticks"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let file = write_config(r#"{ "progression": { "time_limit": 20 } }"#);
        let error = load_config_from_path(file.path()).expect_err("unknown field");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_time_limit_fails_validation() {
        let file = write_config(r#"{ "progression": { "time_limit_seconds": 0 } }"#);
        let error = load_config_from_path(file.path()).expect_err("invalid");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "progression.time_limit_seconds",
                ..
            }
        ));
    }

    #[test]
    fn unreadable_path_reports_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        let error = load_config_from_path(&missing).expect_err("missing file");
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn seed_override_replaces_file_seed() {
        let file = write_config(r#"{ "seed": 5 }"#);
        let config = resolve_config(Some(file.path()), Some(" 12 ")).expect("config");
        assert_eq!(config.seed, Some(12));

        let error = resolve_config(None, Some("twelve")).expect_err("not a number");
        assert!(matches!(error, ConfigError::InvalidSeed { .. }));
    }
}
