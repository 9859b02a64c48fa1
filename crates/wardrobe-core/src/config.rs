use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let search_api_key = require("PERPLEXITY_API_KEY")?;

    let env = parse_environment(&or_default("WARDROBE_ENV", "development"))?;

    let search_base_url = or_default("WARDROBE_SEARCH_BASE_URL", "https://api.perplexity.ai");
    if env == Environment::Production && !search_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "WARDROBE_SEARCH_BASE_URL".to_string(),
            reason: "must use https in production".to_string(),
        });
    }
    let search_model = or_default("WARDROBE_SEARCH_MODEL", "sonar");
    let search_request_timeout_secs = parse_u64("WARDROBE_SEARCH_REQUEST_TIMEOUT_SECS", "30")?;
    let search_branch_timeout_secs = parse_u64("WARDROBE_SEARCH_BRANCH_TIMEOUT_SECS", "20")?;
    let search_max_retries = parse_u32("WARDROBE_SEARCH_MAX_RETRIES", "0")?;
    let search_retry_backoff_base_secs =
        parse_u64("WARDROBE_SEARCH_RETRY_BACKOFF_BASE_SECS", "2")?;
    let search_user_agent = or_default(
        "WARDROBE_SEARCH_USER_AGENT",
        "wardrobe/0.1 (shopping-curation)",
    );

    let max_results = parse_usize("WARDROBE_MAX_RESULTS", "10")?;
    if max_results == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "WARDROBE_MAX_RESULTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let stores_path = lookup("WARDROBE_STORES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        search_api_key,
        search_base_url,
        search_model,
        search_request_timeout_secs,
        search_branch_timeout_secs,
        search_max_retries,
        search_retry_backoff_base_secs,
        search_user_agent,
        max_results,
        stores_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "WARDROBE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
