/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, token 検証鍵, tenant cache の調整値など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
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

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Key material used to verify access tokens.
#[derive(Clone)]
pub enum TokenKey {
    /// Ed25519 public key (PEM); tokens are signed with EdDSA.
    EdPublicPem(String),
    /// Shared secret; tokens are signed with HS256.
    Secret(String),
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            TokenKey::EdPublicPem(_) => f.write_str("TokenKey::EdPublicPem(..)"),
            TokenKey::Secret(_) => f.write_str("TokenKey::Secret(..)"),
        }
    }
}

/// Where the tenant extractor looks for a tenant identifier.
#[derive(Debug, Clone)]
pub struct TenantSourceConfig {
    pub header: String,
    pub query_param: String,
    /// The query parameter is a debugging aid; production turns it off by default.
    pub query_fallback: bool,
}

impl Default for TenantSourceConfig {
    fn default() -> Self {
        Self {
            header: "x-tenant-id".to_string(),
            query_param: "tenant_id".to_string(),
            query_fallback: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_leeway_seconds: u64,
    pub token_key: TokenKey,

    pub tenant_cache_ttl: Duration,
    pub tenant_cache_sweep_interval: Duration,
    pub tenant_sources: TenantSourceConfig,

    /// Deadline applied to every collaborator call made by a guard.
    pub external_call_timeout: Duration,
    /// Whole-request deadline enforced by the HTTP layer.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10u32)?;

        let auth_issuer =
            std::env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;

        let auth_audience =
            std::env::var("AUTH_AUDIENCE").map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;

        let access_token_leeway_seconds = parse_or("ACCESS_TOKEN_LEEWAY_SECONDS", 60u64)?;

        let token_key = match (
            std::env::var("ACCESS_JWT_PUBLIC_KEY_PEM").ok(),
            std::env::var("ACCESS_JWT_SECRET").ok(),
        ) {
            (Some(pem), _) if !pem.trim().is_empty() => {
                TokenKey::EdPublicPem(pem.replace("\\n", "\n"))
            }
            (_, Some(secret)) if !secret.is_empty() => TokenKey::Secret(secret),
            _ => return Err(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")),
        };

        let ttl_seconds = parse_or("TENANT_CACHE_TTL_SECONDS", 300u64)?;
        let sweep_seconds = parse_or("TENANT_CACHE_SWEEP_SECONDS", 60u64)?;
        if ttl_seconds == 0 {
            return Err(ConfigError::Invalid("TENANT_CACHE_TTL_SECONDS"));
        }
        if sweep_seconds == 0 {
            return Err(ConfigError::Invalid("TENANT_CACHE_SWEEP_SECONDS"));
        }

        let defaults = TenantSourceConfig::default();
        let tenant_sources = TenantSourceConfig {
            header: std::env::var("TENANT_HEADER")
                .map(|h| h.trim().to_ascii_lowercase())
                .unwrap_or(defaults.header),
            query_param: std::env::var("TENANT_QUERY_PARAM").unwrap_or(defaults.query_param),
            query_fallback: parse_bool_or("TENANT_QUERY_FALLBACK", !app_env.is_production())?,
        };
        if axum::http::HeaderName::from_str(&tenant_sources.header).is_err() {
            return Err(ConfigError::Invalid("TENANT_HEADER"));
        }

        let external_call_timeout =
            Duration::from_millis(parse_or("EXTERNAL_CALL_TIMEOUT_MS", 3000u64)?);

        let request_timeout_seconds = parse_or("REQUEST_TIMEOUT_SECONDS", 30u64)?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            token_key,
            tenant_cache_ttl: Duration::from_secs(ttl_seconds),
            tenant_cache_sweep_interval: Duration::from_secs(sweep_seconds),
            tenant_sources,
            external_call_timeout,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}

// 未設定 → default、設定ありで parse 不可 → 起動失敗
fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

fn parse_bool_or(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid(key)),
        },
        Err(_) => Ok(default),
    }
}
