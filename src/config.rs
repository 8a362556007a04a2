use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "STUDENT_DASHBOARD_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Tunables that used to be demo constants, plus display options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Series shown when a student has fewer than two grade points.
    #[serde(default = "default_fallback_gpa")]
    pub fallback_gpa: Vec<f64>,
    #[serde(default = "default_fallback_periods")]
    pub fallback_periods: Vec<String>,
    /// Cohort mean used for a semester whose column is absent.
    #[serde(default = "default_cohort_gpa")]
    pub default_cohort_gpa: f64,
    /// Valid grade-point range; projections are clamped to it.
    #[serde(default = "default_gpa_range")]
    pub gpa_range: [f64; 2],
    /// Level of the "good" reference line on the trend chart.
    #[serde(default = "default_gpa_reference")]
    pub gpa_reference: f64,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_compare_with_cohort")]
    pub compare_with_cohort: bool,
    /// Font with CJK coverage; well-known system fonts are tried when unset.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_fallback_gpa() -> Vec<f64> {
    vec![3.2, 3.5, 3.1]
}

fn default_fallback_periods() -> Vec<String> {
    vec!["第一学期".into(), "第二学期".into(), "第三学期".into()]
}

fn default_cohort_gpa() -> f64 {
    3.0
}

fn default_gpa_range() -> [f64; 2] {
    [0.0, 4.0]
}

fn default_gpa_reference() -> f64 {
    3.0
}

fn default_histogram_bins() -> usize {
    20
}

fn default_compare_with_cohort() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            fallback_gpa: default_fallback_gpa(),
            fallback_periods: default_fallback_periods(),
            default_cohort_gpa: default_cohort_gpa(),
            gpa_range: default_gpa_range(),
            gpa_reference: default_gpa_reference(),
            histogram_bins: default_histogram_bins(),
            compare_with_cohort: default_compare_with_cohort(),
            font_path: None,
        }
    }
}

impl DashboardConfig {
    /// Read a config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `$STUDENT_DASHBOARD_CONFIG` or `./dashboard.json`, falling
    /// back to defaults when the file is absent or invalid.
    pub fn load_or_default() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_gpa.len() != self.fallback_periods.len() {
            return Err(ConfigError::Invalid(format!(
                "fallback_gpa has {} values but fallback_periods has {}",
                self.fallback_gpa.len(),
                self.fallback_periods.len()
            )));
        }
        if self.fallback_gpa.len() < 2 {
            return Err(ConfigError::Invalid(
                "fallback_gpa needs at least two values".into(),
            ));
        }
        let [lo, hi] = self.gpa_range;
        if !(lo < hi) {
            return Err(ConfigError::Invalid(format!("gpa_range [{lo}, {hi}] is empty")));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "histogram_bins": 10, "default_cohort_gpa": 2.8 }"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.default_cohort_gpa, 2.8);
        assert_eq!(config.fallback_gpa, vec![3.2, 3.5, 3.1]);
        assert!(config.compare_with_cohort);
    }

    #[test]
    fn mismatched_fallback_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "fallback_gpa": [3.0, 3.1] }"#).unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            DashboardConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
