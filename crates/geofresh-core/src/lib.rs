mod app_config;
mod config;
pub mod location;
pub mod processes;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use location::{Location, LocationSpec};
pub use processes::{FlowDirection, ProcessId, KNOWN_PROCESSES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    #[error("invalid process id: {0}")]
    InvalidProcessId(String),
}
