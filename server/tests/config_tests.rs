use booking_server::config::{AppConfig, StoreBackend};
use serial_test::serial;
use std::time::Duration;

const SAMPLE_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/server.toml");

const ENV_KEYS: &[&str] = &[
    "SERVER_HOST",
    "PORT",
    "SERVER_PORT",
    "STORE_BACKEND",
    "MONGODB_URI",
    "DB_USER",
    "DB_PASS",
    "DB_HOST",
    "DATABASE_NAME",
    "ACCESS_TOKEN_SECRET",
    "TOKEN_TTL_SECS",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
fn test_load_sample_config() {
    let config = AppConfig::load_from_file(SAMPLE_CONFIG).expect("Failed to load config");

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.database.backend, StoreBackend::Mongodb);
    assert_eq!(config.database.name, "carDoctor");
    assert_eq!(config.token_ttl(), Duration::from_secs(3600));
    assert!(config.auth.token_secret.is_none());
}

#[test]
fn test_invalid_config_path() {
    let result = AppConfig::load_from_file("nonexistent/config.toml");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_load_without_file_uses_environment() {
    clear_env();
    std::env::set_var("PORT", "5050");
    std::env::set_var("STORE_BACKEND", "memory");
    std::env::set_var("ACCESS_TOKEN_SECRET", "0123456789abcdef0123456789abcdef");

    let config = AppConfig::load("nonexistent/server.toml").expect("Failed to load config");
    clear_env();

    assert_eq!(config.server.port, 5050);
    assert_eq!(config.database.backend, StoreBackend::Memory);
    assert_eq!(config.database.name, "carDoctor");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    std::env::set_var("DATABASE_NAME", "garage");
    std::env::set_var("MONGODB_URI", "mongodb://db.internal:27017");
    std::env::set_var("TOKEN_TTL_SECS", "900");

    let config = AppConfig::load(SAMPLE_CONFIG).expect("Failed to load config");
    clear_env();

    assert_eq!(config.database.name, "garage");
    assert_eq!(config.mongodb_uri().unwrap(), "mongodb://db.internal:27017");
    assert_eq!(config.token_ttl(), Duration::from_secs(900));
    // Still no secret
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn test_unknown_backend_is_rejected() {
    clear_env();
    std::env::set_var("STORE_BACKEND", "postgres");

    let result = AppConfig::load("nonexistent/server.toml");
    clear_env();

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_oversized_token_ttl_is_rejected() {
    clear_env();
    std::env::set_var("STORE_BACKEND", "memory");
    std::env::set_var("ACCESS_TOKEN_SECRET", "0123456789abcdef0123456789abcdef");
    std::env::set_var("TOKEN_TTL_SECS", u64::MAX.to_string());

    let config = AppConfig::load("nonexistent/server.toml").expect("Failed to load config");
    clear_env();

    assert!(config.validate().is_err());
}
