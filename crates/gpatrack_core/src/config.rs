//! Runtime configuration for tracker hosts.
//!
//! # Responsibility
//! - Collect storage path, undo window, grade scale and logging settings.
//! - Resolve overrides from `GPATRACK_*` environment variables.
//!
//! # Invariants
//! - Invalid override values never abort startup; defaults are kept and a
//!   warning is logged.

use crate::logging::{default_log_level, init_logging};
use crate::model::grade::GradeScale;
use crate::undo::DEFAULT_UNDO_WINDOW;
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "GPATRACK_DB_PATH";
pub const ENV_UNDO_WINDOW_MS: &str = "GPATRACK_UNDO_WINDOW_MS";
pub const ENV_GRADE_SCALE: &str = "GPATRACK_GRADE_SCALE";
pub const ENV_LOG_LEVEL: &str = "GPATRACK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GPATRACK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "gpatrack.sqlite3";

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub db_path: PathBuf,
    pub undo_window: Duration,
    pub grade_scale: GradeScale,
    pub log_level: String,
    /// Rolling log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            undo_window: DEFAULT_UNDO_WINDOW,
            grade_scale: GradeScale::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Builds a config from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = read(ENV_UNDO_WINDOW_MS) {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => config.undo_window = Duration::from_millis(ms),
                _ => warn!(
                    "event=config_load module=config status=fallback key={ENV_UNDO_WINDOW_MS}"
                ),
            }
        }

        if let Some(raw) = read(ENV_GRADE_SCALE) {
            match GradeScale::parse(&raw) {
                Some(scale) => config.grade_scale = scale,
                None => {
                    warn!("event=config_load module=config status=fallback key={ENV_GRADE_SCALE}")
                }
            }
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);

        config
    }

    /// Starts file logging when `log_dir` is set.
    ///
    /// Returns `Ok(false)` without touching the logger when no directory is
    /// configured.
    ///
    /// # Errors
    /// - Same as [`init_logging`]: bad level, bad directory, or conflicting
    ///   earlier initialization.
    pub fn start_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", log_dir.display()))?;
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        TrackerConfig, ENV_DB_PATH, ENV_GRADE_SCALE, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_UNDO_WINDOW_MS,
    };
    use crate::model::grade::GradeScale;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config_from(pairs: &[(&str, &str)]) -> TrackerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        TrackerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.undo_window, Duration::from_secs(5));
        assert_eq!(config.grade_scale, GradeScale::Campus);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            (ENV_DB_PATH, "/tmp/gpa.db"),
            (ENV_UNDO_WINDOW_MS, "1500"),
            (ENV_GRADE_SCALE, "Standard"),
            (ENV_LOG_DIR, "/tmp/gpa-logs"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/tmp/gpa.db"));
        assert_eq!(config.undo_window, Duration::from_millis(1500));
        assert_eq!(config.grade_scale, GradeScale::Standard);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/gpa-logs")));
    }

    #[test]
    fn start_logging_is_skipped_without_log_dir() {
        assert_eq!(TrackerConfig::default().start_logging(), Ok(false));
    }

    #[test]
    fn start_logging_reports_bad_settings() {
        let relative = config_from(&[(ENV_LOG_DIR, "logs/dev")]);
        let error = relative.start_logging().expect_err("relative dir must fail");
        assert!(error.contains("absolute"));

        let bad_level = config_from(&[(ENV_LOG_DIR, "/tmp/gpa-logs"), (ENV_LOG_LEVEL, "loud")]);
        let error = bad_level.start_logging().expect_err("unknown level must fail");
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = config_from(&[
            (ENV_UNDO_WINDOW_MS, "0"),
            (ENV_GRADE_SCALE, "percent"),
            (ENV_DB_PATH, "   "),
        ]);
        assert_eq!(config, TrackerConfig::default());
    }
}
