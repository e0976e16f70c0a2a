use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.dataforseo.com";
const DEFAULT_USER_AGENT: &str = "rankgrid/0.1 (local-visibility)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests can
/// drive this with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let provider_login = require("RANKGRID_PROVIDER_LOGIN")?;
    let provider_password = require("RANKGRID_PROVIDER_PASSWORD")?;

    let log_level = or_default("RANKGRID_LOG_LEVEL", "info");
    let provider_base_url = or_default("RANKGRID_PROVIDER_BASE_URL", DEFAULT_PROVIDER_BASE_URL);
    let user_agent = or_default("RANKGRID_USER_AGENT", DEFAULT_USER_AGENT);

    let provider_timeout_secs: u64 = parse_var(
        "RANKGRID_PROVIDER_TIMEOUT_SECS",
        &or_default("RANKGRID_PROVIDER_TIMEOUT_SECS", "30"),
    )?;
    if provider_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RANKGRID_PROVIDER_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    let provider_max_retries: u32 = parse_var(
        "RANKGRID_PROVIDER_MAX_RETRIES",
        &or_default("RANKGRID_PROVIDER_MAX_RETRIES", "2"),
    )?;
    let provider_backoff_base_ms: u64 = parse_var(
        "RANKGRID_PROVIDER_BACKOFF_BASE_MS",
        &or_default("RANKGRID_PROVIDER_BACKOFF_BASE_MS", "500"),
    )?;
    let scan_concurrency: usize = parse_var(
        "RANKGRID_SCAN_CONCURRENCY",
        &or_default("RANKGRID_SCAN_CONCURRENCY", "3"),
    )?;
    let scan_delay_ms: u64 = parse_var(
        "RANKGRID_SCAN_DELAY_MS",
        &or_default("RANKGRID_SCAN_DELAY_MS", "100"),
    )?;
    let scan_depth: u32 = parse_var(
        "RANKGRID_SCAN_DEPTH",
        &or_default("RANKGRID_SCAN_DEPTH", "20"),
    )?;

    let unit_cost: Decimal =
        parse_var("RANKGRID_UNIT_COST", &or_default("RANKGRID_UNIT_COST", "0.002"))?;
    if unit_cost.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar {
            var: "RANKGRID_UNIT_COST".to_string(),
            reason: "unit cost cannot be negative".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        provider_login,
        provider_password,
        provider_base_url,
        provider_timeout_secs,
        provider_max_retries,
        provider_backoff_base_ms,
        user_agent,
        scan_concurrency,
        scan_delay_ms,
        scan_depth,
        unit_cost,
    })
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
