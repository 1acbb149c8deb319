/*
 * Responsibility
 * - Read process configuration from the environment (.env is honoured)
 * - Validate values up front so a misconfigured service fails at startup
 * - Hand out the narrower configs the token codec / permission client need
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::services::auth::jwt::{DEFAULT_VALIDITY_MINUTES, MAX_VALIDITY_MINUTES, TokenConfig};
use crate::services::permission::remote::{DEFAULT_VALIDATE_BY, RemotePermissionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub http_timeout_seconds: u64,

    jwt_secret: String,
    pub token_validity_minutes: i64,
    pub token_leeway_seconds: i64,

    pub permission_endpoint_url: Option<Url>,
    pub permission_timeout_seconds: u64,
    pub permission_validate_by: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // jwt_secret intentionally omitted
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .field("token_validity_minutes", &self.token_validity_minutes)
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("permission_endpoint_url", &self.permission_endpoint_url)
            .field("permission_timeout_seconds", &self.permission_timeout_seconds)
            .field("permission_validate_by", &self.permission_validate_by)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env, map in tests, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let http_timeout_seconds = parse_or(&lookup, "HTTP_TIMEOUT_SECONDS", 30u64)?;

        let jwt_secret = lookup("AUTH_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("AUTH_JWT_SECRET"))?;

        let token_validity_minutes =
            parse_or(&lookup, "AUTH_TOKEN_VALIDITY_MINUTES", DEFAULT_VALIDITY_MINUTES)?;
        if !(1..=MAX_VALIDITY_MINUTES).contains(&token_validity_minutes) {
            return Err(ConfigError::Invalid("AUTH_TOKEN_VALIDITY_MINUTES"));
        }

        let token_leeway_seconds = parse_or(&lookup, "AUTH_TOKEN_LEEWAY_SECONDS", 0i64)?;
        if token_leeway_seconds < 0 {
            return Err(ConfigError::Invalid("AUTH_TOKEN_LEEWAY_SECONDS"));
        }

        let permission_endpoint_url = lookup("PERMISSION_ENDPOINT_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| Url::parse(&s).map_err(|_| ConfigError::Invalid("PERMISSION_ENDPOINT_URL")))
            .transpose()?;

        let permission_timeout_seconds = parse_or(&lookup, "PERMISSION_TIMEOUT_SECONDS", 10u64)?;
        if permission_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("PERMISSION_TIMEOUT_SECONDS"));
        }

        let permission_validate_by = lookup("PERMISSION_VALIDATE_BY")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VALIDATE_BY.to_string());

        Ok(Self {
            addr,
            app_env,
            http_timeout_seconds,
            jwt_secret,
            token_validity_minutes,
            token_leeway_seconds,
            permission_endpoint_url,
            permission_timeout_seconds,
            permission_validate_by,
        })
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.jwt_secret.as_bytes(), self.token_validity_minutes)
            .with_leeway_seconds(self.token_leeway_seconds)
    }

    /// `None` when no remote authorization endpoint is configured.
    pub fn remote_permission_config(&self) -> Option<RemotePermissionConfig> {
        self.permission_endpoint_url
            .clone()
            .map(|endpoint| RemotePermissionConfig {
                endpoint,
                timeout: Duration::from_secs(self.permission_timeout_seconds),
                validate_by: self.permission_validate_by.clone(),
            })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
