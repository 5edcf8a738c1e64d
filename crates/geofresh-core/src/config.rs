use crate::app_config::AppConfig;
use crate::ConfigError;

pub(crate) const DEFAULT_SERVICE_URL: &str = "https://aqua.igb-berlin.de/pygeoapi";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let service_url = parse_service_url(&or_default("GEOFRESH_SERVICE_URL", DEFAULT_SERVICE_URL))?;
    let log_level = or_default("GEOFRESH_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("GEOFRESH_REQUEST_TIMEOUT_SECS", "120")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEOFRESH_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "request timeout must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("GEOFRESH_USER_AGENT", "geofresh-client/0.1");

    let poll_interval_ms = parse_u64("GEOFRESH_POLL_INTERVAL_MS", "2000")?;
    if poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEOFRESH_POLL_INTERVAL_MS".to_string(),
            reason: "poll interval must be greater than zero".to_string(),
        });
    }
    let poll_max_wait_secs = parse_u64("GEOFRESH_POLL_MAX_WAIT_SECS", "1800")?;
    let poll_max_retries = parse_u32("GEOFRESH_POLL_MAX_RETRIES", "3")?;

    Ok(AppConfig {
        service_url,
        log_level,
        request_timeout_secs,
        user_agent,
        poll_interval_ms,
        poll_max_wait_secs,
        poll_max_retries,
    })
}

/// Checks the scheme and strips trailing slashes so callers can append paths.
fn parse_service_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());

    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEOFRESH_SERVICE_URL".to_string(),
            reason: format!("'{raw}' is not an http(s) URL"),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
