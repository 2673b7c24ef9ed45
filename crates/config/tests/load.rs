use std::collections::HashMap;
use std::time::Duration;

use app_config::{AppConfig, ConfigEnvironment};

fn env(vars: &[(&str, &str)]) -> ConfigEnvironment {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigEnvironment::default().source(Some(map))
}

#[test]
fn test_load_default_config() {
    let cfg = AppConfig::from_env(env(&[])).unwrap();
    assert_eq!(cfg.db_host, "localhost");
    assert_eq!(cfg.db_port, 5432);
    assert_eq!(cfg.http_port, 9090);
    assert_eq!(cfg.otp_ttl, Duration::from_secs(120));
    assert_eq!(cfg.default_page_limit, 10);
    assert_eq!(cfg.redis_key_prefix, "otp:");
}

#[test]
fn test_env_overrides_defaults() {
    let cfg = AppConfig::from_env(env(&[
        ("DB_HOST", "postgres"),
        ("HTTP_PORT", "8081"),
        ("OTP_TTL", "90s"),
        ("REDIS_URL", ""),
    ]))
    .unwrap();
    assert_eq!(cfg.db_host, "postgres");
    assert_eq!(cfg.http_port, 8081);
    assert_eq!(cfg.otp_ttl, Duration::from_secs(90));
    assert!(cfg.redis_url.is_empty());
}

#[test]
fn test_invalid_duration_is_rejected() {
    let err = AppConfig::from_env(env(&[("SHUTDOWN_TIMEOUT", "soon")])).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid duration"));
}

#[test]
fn test_default_limit_above_max_is_rejected() {
    let result = AppConfig::from_env(env(&[
        ("DEFAULT_PAGE_LIMIT", "50"),
        ("MAX_PAGE_LIMIT", "20"),
    ]));
    assert!(result.is_err());
}

#[test]
fn test_database_dsn() {
    let cfg = AppConfig::from_env(env(&[("DB_NAME", "orders")])).unwrap();
    assert!(cfg.database_dsn().contains("dbname=orders"));
    assert!(cfg.database_dsn().starts_with("host=localhost port=5432"));
}
