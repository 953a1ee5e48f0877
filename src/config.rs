//! Environment-driven configuration for the remote APIs.
//!
//! Base URLs, the access token, and the workspace identifier are supplied
//! out-of-band through the environment; nothing in the reconciliation core
//! reads the environment directly.

use std::env;

use thiserror::Error;

pub const API_BASE_PATH_VAR: &str = "API_BASE_PATH";
pub const METRICS_API_BASE_PATH_VAR: &str = "METRICS_API_BASE_PATH";
pub const TOKEN_VAR: &str = "TOKEN";
pub const WORKSPACE_VAR: &str = "WORKSPACE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the inventory API.
    pub api_base_path: String,

    /// Base URL of the metrics API.
    pub metrics_base_path: String,

    /// Access token sent as a bearer header to both APIs.
    pub token: String,

    /// Workspace identifier stamped onto every metric point.
    pub workspace: String,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Ok(Config {
            api_base_path: required_var(API_BASE_PATH_VAR)?,
            metrics_base_path: required_var(METRICS_API_BASE_PATH_VAR)?,
            token: required_var(TOKEN_VAR)?,
            workspace: required_var(WORKSPACE_VAR)?,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}
