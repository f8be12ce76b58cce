//! Trackaro configuration
//!
//! The analysis policy (window length, assumed return, savings percentages)
//! is a set of named constants that can be overridden from a TOML file.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path (CLI `--config`) or `TRACKARO_CONFIG`
//! 2. Data dir override (~/.local/share/trackaro/config.toml)
//! 3. Built-in defaults
//!
//! ```toml
//! [analysis]
//! window_days = 30
//! annual_return_rate = 0.12
//! reduction_percents = [5, 10, 15]
//! horizon_years = [5, 10]
//! goal_savings_rate_percent = 10
//! achievable_within_months = 60
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "TRACKARO_CONFIG";

/// Length of the trailing window, treated as exactly one month
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Longest window any query may look back over (about a century)
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Assumed annual return for SIP projections
pub const DEFAULT_ANNUAL_RETURN_RATE: f64 = 0.12;

/// Spending reductions offered as savings scenarios
pub const DEFAULT_REDUCTION_PERCENTS: [u32; 3] = [5, 10, 15];

/// SIP projection horizons
pub const DEFAULT_HORIZON_YEARS: [u32; 2] = [5, 10];

/// Share of monthly spending assumed saved when sizing goals
pub const DEFAULT_GOAL_SAVINGS_RATE_PERCENT: f64 = 10.0;

/// Goals reachable within this many months are flagged achievable
pub const DEFAULT_ACHIEVABLE_WITHIN_MONTHS: u32 = 60;

/// Policy constants for the spending analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub window_days: u32,
    pub annual_return_rate: f64,
    pub reduction_percents: Vec<u32>,
    pub horizon_years: Vec<u32>,
    pub goal_savings_rate_percent: f64,
    pub achievable_within_months: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            annual_return_rate: DEFAULT_ANNUAL_RETURN_RATE,
            reduction_percents: DEFAULT_REDUCTION_PERCENTS.to_vec(),
            horizon_years: DEFAULT_HORIZON_YEARS.to_vec(),
            goal_savings_rate_percent: DEFAULT_GOAL_SAVINGS_RATE_PERCENT,
            achievable_within_months: DEFAULT_ACHIEVABLE_WITHIN_MONTHS,
        }
    }
}

impl AnalysisConfig {
    /// Check values that would make the formulas meaningless
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(Error::Config("window_days must be greater than 0".into()));
        }
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(Error::Config(format!(
                "window_days must be at most {}, got {}",
                MAX_WINDOW_DAYS, self.window_days
            )));
        }
        if !self.annual_return_rate.is_finite() || self.annual_return_rate <= -1.0 {
            return Err(Error::Config(format!(
                "annual_return_rate must be a number greater than -1, got {}",
                self.annual_return_rate
            )));
        }
        if self.reduction_percents.is_empty() {
            return Err(Error::Config("reduction_percents must not be empty".into()));
        }
        if self.horizon_years.is_empty() {
            return Err(Error::Config("horizon_years must not be empty".into()));
        }
        if !self.goal_savings_rate_percent.is_finite() || self.goal_savings_rate_percent < 0.0 {
            return Err(Error::Config(format!(
                "goal_savings_rate_percent must be a non-negative number, got {}",
                self.goal_savings_rate_percent
            )));
        }
        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackaroConfig {
    pub analysis: AnalysisConfig,
}

impl TrackaroConfig {
    /// Load configuration using the standard resolution order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .or_else(default_config_path);

        match path {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) if explicit.is_some() => Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            ))),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse TOML content; missing fields keep their defaults
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.analysis.validate()?;
        Ok(config)
    }
}

/// Default override location for the config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("trackaro").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.window_days, 30);
        assert_eq!(config.annual_return_rate, 0.12);
        assert_eq!(config.reduction_percents, vec![5, 10, 15]);
        assert_eq!(config.horizon_years, vec![5, 10]);
        assert_eq!(config.goal_savings_rate_percent, 10.0);
        assert_eq!(config.achievable_within_months, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_override() {
        let config = TrackaroConfig::parse(
            r#"
            [analysis]
            annual_return_rate = 0.08
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.annual_return_rate, 0.08);
        assert_eq!(config.analysis.window_days, 30);
        assert_eq!(config.analysis.reduction_percents, vec![5, 10, 15]);
    }

    #[test]
    fn test_parse_empty_is_default() {
        let config = TrackaroConfig::parse("").unwrap();
        assert_eq!(config, TrackaroConfig::default());
    }

    #[test]
    fn test_parse_rejects_zero_window() {
        let err = TrackaroConfig::parse("[analysis]\nwindow_days = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_rejects_oversized_window() {
        let err = TrackaroConfig::parse("[analysis]\nwindow_days = 4294967295\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let config = TrackaroConfig::parse("[analysis]\nwindow_days = 36500\n").unwrap();
        assert_eq!(config.analysis.window_days, MAX_WINDOW_DAYS);
    }

    #[test]
    fn test_parse_rejects_empty_horizons() {
        let err = TrackaroConfig::parse("[analysis]\nhorizon_years = []\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = TrackaroConfig::parse("[analysis\nwindow_days = 3").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nreduction_percents = [20]").unwrap();

        let config = TrackaroConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.analysis.reduction_percents, vec![20]);
    }

    #[test]
    fn test_load_missing_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(TrackaroConfig::load(Some(&missing)).is_err());
    }
}
