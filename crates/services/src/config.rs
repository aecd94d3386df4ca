use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable naming the JSON state file.
pub const DATA_PATH_VAR: &str = "TRACKER_DATA_PATH";
/// Environment variable holding the default log filter.
pub const LOG_VAR: &str = "TRACKER_LOG";

const DEFAULT_DATA_PATH: &str = "tracker-data.json";
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration for the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub data_path: PathBuf,
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Read configuration from the process environment, after loading `.env`
    /// if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable is set but blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable is set but blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_path = match lookup(DATA_PATH_VAR) {
            Some(raw) => PathBuf::from(non_blank(DATA_PATH_VAR, raw)?),
            None => defaults.data_path,
        };
        let log_filter = match lookup(LOG_VAR) {
            Some(raw) => non_blank(LOG_VAR, raw)?,
            None => defaults.log_filter,
        };

        Ok(Self {
            data_path,
            log_filter,
        })
    }

    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }
}

fn non_blank(name: &'static str, raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid {
            name,
            reason: "value is empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = TrackerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.data_path, PathBuf::from("tracker-data.json"));
    }

    #[test]
    fn variables_override_defaults() {
        let config = TrackerConfig::from_lookup(lookup(&[
            (DATA_PATH_VAR, " /tmp/tracker.json "),
            (LOG_VAR, "debug"),
        ]))
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/tracker.json"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn blank_values_are_rejected() {
        let err = TrackerConfig::from_lookup(lookup(&[(DATA_PATH_VAR, "  ")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: DATA_PATH_VAR,
                ..
            }
        ));
    }

    #[test]
    fn data_path_override() {
        let config = TrackerConfig::default().with_data_path("elsewhere.json");
        assert_eq!(config.data_path, PathBuf::from("elsewhere.json"));
    }
}
