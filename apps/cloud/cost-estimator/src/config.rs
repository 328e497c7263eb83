//! Configuration for the cost estimator

use std::env;
use std::path::PathBuf;

use core_config::{env_required, ConfigError, FromEnv};

/// Override for the state file location
const STATE_FILE_VAR: &str = "COST_ESTIMATOR_STATE_FILE";

/// State file location relative to the home directory
const STATE_FILE: &str = ".cost-estimator/state.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// File holding persisted calculator sessions
    pub state_file: PathBuf,
}

impl FromEnv for Config {
    /// Load configuration from environment variables
    ///
    /// `COST_ESTIMATOR_STATE_FILE` overrides the default location under the
    /// home directory; without the override, `HOME` must be set.
    fn from_env() -> Result<Self, ConfigError> {
        let state_file = match env::var(STATE_FILE_VAR) {
            Ok(path) => path,
            Err(_) => format!("{}/{STATE_FILE}", env_required("HOME")?),
        };
        if state_file.is_empty() {
            return Err(ConfigError::ParseError {
                key: STATE_FILE_VAR.to_string(),
                details: "path is empty".to_string(),
            });
        }

        Ok(Config {
            state_file: PathBuf::from(state_file),
        })
    }
}
