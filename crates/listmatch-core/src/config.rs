//! Matcher configuration
//!
//! Layers, lowest precedence first: [`MatcherConfig::default`], a JSON file,
//! environment overrides, then whatever the caller adds. The final layer is
//! validated once; the matcher never mutates it afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Environment override for [`MatcherConfig::length_ratio_threshold`]
pub const ENV_LENGTH_RATIO: &str = "LISTMATCH_LENGTH_RATIO";

/// Environment override for [`MatcherConfig::common_text_ratio_threshold`]
pub const ENV_COMMON_TEXT_RATIO: &str = "LISTMATCH_COMMON_TEXT_RATIO";

/// Tunable ratios for [`crate::ListItemMatchStrategy`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum shorter-fragment to longer-fragment length ratio for a
    /// fragment fully explained by its common prefix and suffix
    pub length_ratio_threshold: f64,
    /// Minimum share of the shorter fragment covered by the common prefix
    /// and suffix for a proportional-overlap match
    pub common_text_ratio_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            length_ratio_threshold: 0.1,
            common_text_ratio_threshold: 0.6,
        }
    }
}

impl MatcherConfig {
    pub fn new(length_ratio_threshold: f64, common_text_ratio_threshold: f64) -> Self {
        Self {
            length_ratio_threshold,
            common_text_ratio_threshold,
        }
    }

    /// Check both ratios are finite and within `[0.0, 1.0]`.
    pub fn validate(&self) -> ConfigResult<()> {
        check_ratio("length_ratio_threshold", self.length_ratio_threshold)?;
        check_ratio(
            "common_text_ratio_threshold",
            self.common_text_ratio_threshold,
        )?;
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(?config, "Loaded matcher config");
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config = Self::load_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file without range checks.
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        debug!(?config, path = %path.display(), "Loaded matcher config file");
        Ok(config)
    }

    /// Apply `LISTMATCH_*` environment overrides and validate.
    pub fn apply_env(self) -> ConfigResult<Self> {
        let config = self.overlay_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LISTMATCH_*` environment overrides without range checks, for
    /// callers layering further overrides on top.
    pub fn overlay_env(self) -> ConfigResult<Self> {
        self.overlay_vars(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, keyed by the `LISTMATCH_*` names. Only
    /// parse failures are reported; call [`validate`](Self::validate) on the
    /// final layer.
    pub fn overlay_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        if let Some(value) = lookup(ENV_LENGTH_RATIO) {
            self.length_ratio_threshold = parse_var(ENV_LENGTH_RATIO, value)?;
        }
        if let Some(value) = lookup(ENV_COMMON_TEXT_RATIO) {
            self.common_text_ratio_threshold = parse_var(ENV_COMMON_TEXT_RATIO, value)?;
        }
        Ok(self)
    }
}

fn check_ratio(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}

fn parse_var(var: &'static str, value: String) -> ConfigResult<f64> {
    match value.trim().parse() {
        Ok(parsed) => {
            debug!(var, value = parsed, "Applying environment override");
            Ok(parsed)
        }
        Err(_) => Err(ConfigError::InvalidEnv { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MatcherConfig::default();
        assert_eq!(config.length_ratio_threshold, 0.1);
        assert_eq!(config.common_text_ratio_threshold, 0.6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = MatcherConfig::new(1.5, 0.6).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "length_ratio_threshold",
                ..
            }
        ));

        let err = MatcherConfig::new(0.1, f64::NAN).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "common_text_ratio_threshold",
                ..
            }
        ));

        assert!(MatcherConfig::new(-0.1, 0.6).validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MatcherConfig::from_json_str(r#"{"common_text_ratio_threshold": 0.75}"#)
            .unwrap();
        assert_eq!(config, MatcherConfig::new(0.1, 0.75));
    }

    #[test]
    fn test_json_validation_and_parse_errors() {
        assert!(matches!(
            MatcherConfig::from_json_str(r#"{"length_ratio_threshold": 2.0}"#),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            MatcherConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = MatcherConfig::from_file("/nonexistent/listmatch.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/listmatch.json"));
    }

    #[test]
    fn test_env_overrides() {
        let config = MatcherConfig::default()
            .overlay_vars(vars(&[
                (ENV_LENGTH_RATIO, "0.25"),
                (ENV_COMMON_TEXT_RATIO, " 0.5 "),
            ]))
            .unwrap();
        assert_eq!(config, MatcherConfig::new(0.25, 0.5));
    }

    #[test]
    fn test_env_without_overrides() {
        let config = MatcherConfig::default().overlay_vars(vars(&[])).unwrap();
        assert_eq!(config, MatcherConfig::default());
    }

    #[test]
    fn test_env_invalid_values() {
        let err = MatcherConfig::default()
            .overlay_vars(vars(&[(ENV_LENGTH_RATIO, "ten percent")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_LENGTH_RATIO,
                ..
            }
        ));
    }

    #[test]
    fn test_env_overlay_defers_range_checks() {
        // An out-of-range layer may still be replaced by a later one
        let mut config = MatcherConfig::default()
            .overlay_vars(vars(&[(ENV_COMMON_TEXT_RATIO, "3")]))
            .unwrap();
        assert_eq!(config.common_text_ratio_threshold, 3.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));

        config.common_text_ratio_threshold = 0.7;
        assert!(config.validate().is_ok());
    }
}
