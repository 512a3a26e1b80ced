use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("CATPUB_CMS_BASE_URL", "https://products.com/");
    m.insert("CATPUB_CMS_USER", "publisher");
    m.insert("CATPUB_CMS_APP_PASSWORD", "abcd efgh ijkl");
    m
}

#[test]
fn build_app_config_fails_without_base_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "CATPUB_CMS_BASE_URL"),
        "expected MissingEnvVar(CATPUB_CMS_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_password_as_missing() {
    let mut map = full_env();
    map.insert("CATPUB_CMS_APP_PASSWORD", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "CATPUB_CMS_APP_PASSWORD"),
        "expected MissingEnvVar(CATPUB_CMS_APP_PASSWORD), got: {result:?}"
    );
}

#[test]
fn build_app_config_applies_defaults() {
    let map = full_env();
    let config = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(config.cms_base_url, "https://products.com");
    assert_eq!(config.site_root, "https://www.lily-bearing.com/");
    assert_eq!(config.log_level, "info");
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.image_timeout_secs, 45);
    assert_eq!(config.product_delay_ms, 1000);
    assert_eq!(config.failure_pause_ms, 10_000);
    assert_eq!(config.root_category_id, 0);
    assert_eq!(config.existence_mode, ExistenceMode::Reconciling);
    assert_eq!(config.media_fields, MediaFields::Full);
    assert_eq!(config.author_id, 1);
    assert_eq!(config.post_status, "publish");
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("CATPUB_EXISTENCE_MODE", "Bare");
    map.insert("CATPUB_MEDIA_FIELDS", "legacy");
    map.insert("CATPUB_ROOT_CATEGORY_ID", "42");
    map.insert("CATPUB_PRODUCT_DELAY_MS", "0");
    let config = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(config.existence_mode, ExistenceMode::Bare);
    assert_eq!(config.media_fields, MediaFields::Legacy);
    assert_eq!(config.root_category_id, 42);
    assert_eq!(config.product_delay_ms, 0);
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = full_env();
    map.insert("CATPUB_REQUEST_TIMEOUT_SECS", "thirty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATPUB_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar, got: {result:?}"
    );
}

#[test]
fn parse_existence_mode_unknown_fails() {
    let err = parse_existence_mode("sometimes").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CATPUB_EXISTENCE_MODE"));
}

#[test]
fn debug_output_redacts_password() {
    let map = full_env();
    let config = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("abcd efgh ijkl"));
    assert!(rendered.contains("[redacted]"));
}
