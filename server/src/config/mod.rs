use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::auth_token::{DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL, MIN_SECRET_LEN};
use crate::error::{BookingServerError, Result};

const LOCAL_MONGODB_URI: &str = "mongodb://localhost:27017";
const ATLAS_QUERY: &str = "retryWrites=true&w=majority";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongodb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = BookingServerError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(BookingServerError::Config(format!(
                "unknown store backend '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Mongodb,
            uri: None,
            user: None,
            password: None,
            host: None,
            name: "carDoctor".to_string(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("uri", &self.uri.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token_secret: Option<String>,
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL.as_secs(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BookingServerError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            BookingServerError::Config(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// File values (when the file exists) overridden by the process environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            log::info!("No config file at '{}', using defaults", path.display());
            Self::default()
        };

        config.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT").or_else(|| lookup("SERVER_PORT")) {
            self.server.port = v
                .parse()
                .map_err(|_| BookingServerError::Config(format!("invalid port '{v}'")))?;
        }

        if let Some(v) = lookup("STORE_BACKEND") {
            self.database.backend = v.parse()?;
        }
        if let Some(v) = lookup("MONGODB_URI") {
            self.database.uri = Some(v);
        }
        if let Some(v) = lookup("DB_USER") {
            self.database.user = Some(v);
        }
        if let Some(v) = lookup("DB_PASS") {
            self.database.password = Some(v);
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = Some(v);
        }
        if let Some(v) = lookup("DATABASE_NAME") {
            self.database.name = v;
        }

        if let Some(v) = lookup("ACCESS_TOKEN_SECRET") {
            self.auth.token_secret = Some(v);
        }
        if let Some(v) = lookup("TOKEN_TTL_SECS") {
            self.auth.token_ttl_secs = v.parse().map_err(|_| {
                BookingServerError::Config(format!("invalid TOKEN_TTL_SECS '{v}'"))
            })?;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.token_secret()?;

        if self.auth.token_ttl_secs == 0 || self.auth.token_ttl_secs > MAX_TOKEN_TTL.as_secs() {
            return Err(BookingServerError::Config(format!(
                "token ttl must be between 1 and {} seconds",
                MAX_TOKEN_TTL.as_secs()
            )));
        }

        if self.database.backend == StoreBackend::Mongodb {
            self.mongodb_uri()?;
            if self.database.name.trim().is_empty() {
                return Err(BookingServerError::Config(
                    "database name must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn token_secret(&self) -> Result<&str> {
        match self.auth.token_secret.as_deref() {
            None | Some("") => Err(BookingServerError::Config(
                "ACCESS_TOKEN_SECRET is not set".to_string(),
            )),
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                Err(BookingServerError::Config(format!(
                    "ACCESS_TOKEN_SECRET must be at least {MIN_SECRET_LEN} bytes"
                )))
            }
            Some(secret) => Ok(secret),
        }
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_secs)
    }

    /// An explicit URI wins; otherwise credentials plus host build an Atlas
    /// SRV URI; with neither we fall back to a local server.
    pub fn mongodb_uri(&self) -> Result<String> {
        let db = &self.database;
        if let Some(uri) = db.uri.as_deref().filter(|uri| !uri.is_empty()) {
            return Ok(uri.to_string());
        }

        match (db.user.as_deref(), db.password.as_deref()) {
            (None, None) => Ok(LOCAL_MONGODB_URI.to_string()),
            (Some(user), Some(password)) => {
                let host = db.host.as_deref().ok_or_else(|| {
                    BookingServerError::Config(
                        "DB_HOST is required when DB_USER and DB_PASS are set".to_string(),
                    )
                })?;
                build_srv_uri(user, password, host)
            }
            _ => Err(BookingServerError::Config(
                "DB_USER and DB_PASS must be set together".to_string(),
            )),
        }
    }
}

fn build_srv_uri(user: &str, password: &str, host: &str) -> Result<String> {
    let invalid = |what: &str| BookingServerError::Config(format!("invalid database {what}"));

    let mut url =
        Url::parse(&format!("mongodb+srv://{host}/")).map_err(|_| invalid("host"))?;
    url.set_username(user).map_err(|_| invalid("user"))?;
    url.set_password(Some(password))
        .map_err(|_| invalid("password"))?;
    url.set_query(Some(ATLAS_QUERY));

    Ok(url.to_string())
}
