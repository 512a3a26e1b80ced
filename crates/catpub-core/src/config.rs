use crate::app_config::{AppConfig, ExistenceMode, MediaFields};
use crate::ConfigError;

const DEFAULT_SITE_ROOT: &str = "https://www.lily-bearing.com/";

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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let cms_base_url = require("CATPUB_CMS_BASE_URL")?
        .trim_end_matches('/')
        .to_string();
    let cms_user = require("CATPUB_CMS_USER")?;
    let cms_app_password = require("CATPUB_CMS_APP_PASSWORD")?;

    let site_root = or_default("CATPUB_SITE_ROOT", DEFAULT_SITE_ROOT);
    let log_level = or_default("CATPUB_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("CATPUB_REQUEST_TIMEOUT_SECS", "30")?;
    let image_timeout_secs = parse_u64("CATPUB_IMAGE_TIMEOUT_SECS", "45")?;
    let product_delay_ms = parse_u64("CATPUB_PRODUCT_DELAY_MS", "1000")?;
    let failure_pause_ms = parse_u64("CATPUB_FAILURE_PAUSE_MS", "10000")?;
    let root_category_id = parse_u64("CATPUB_ROOT_CATEGORY_ID", "0")?;
    let author_id = parse_u64("CATPUB_AUTHOR_ID", "1")?;

    let existence_mode = parse_existence_mode(&or_default("CATPUB_EXISTENCE_MODE", "reconciling"))?;
    let media_fields = parse_media_fields(&or_default("CATPUB_MEDIA_FIELDS", "full"))?;
    let post_status = or_default("CATPUB_POST_STATUS", "publish");

    Ok(AppConfig {
        cms_base_url,
        cms_user,
        cms_app_password,
        site_root,
        log_level,
        request_timeout_secs,
        image_timeout_secs,
        product_delay_ms,
        failure_pause_ms,
        root_category_id,
        existence_mode,
        media_fields,
        author_id,
        post_status,
    })
}

fn parse_existence_mode(s: &str) -> Result<ExistenceMode, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "bare" => Ok(ExistenceMode::Bare),
        "reconciling" => Ok(ExistenceMode::Reconciling),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CATPUB_EXISTENCE_MODE".to_string(),
            reason: format!("expected 'bare' or 'reconciling', got '{other}'"),
        }),
    }
}

fn parse_media_fields(s: &str) -> Result<MediaFields, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "full" => Ok(MediaFields::Full),
        "legacy" => Ok(MediaFields::Legacy),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CATPUB_MEDIA_FIELDS".to_string(),
            reason: format!("expected 'full' or 'legacy', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
