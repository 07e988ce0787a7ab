//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: MOTTU_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/mottu-api/config.toml
//! 4. System directory: /etc/mottu-api/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Shortest HMAC secret accepted for signing tokens
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Largest page any list endpoint serves, whatever the configuration says
pub const MAX_PAGE_SIZE: u64 = 100;

const ENV_PREFIX: &str = "MOTTU_";
const APP_DIR: &str = "mottu-api";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Token signing and validation
    pub jwt: JwtConfig,

    /// Password hashing parameters
    #[serde(default)]
    pub password: PasswordConfig,

    /// Page size policy for collection listings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Database configuration (optional)
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// JWT configuration
///
/// Tokens are signed with an HMAC secret shared by the issuer and the
/// validating middleware.
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC signing secret
    #[serde(default)]
    pub secret: String,

    /// JWT algorithm (HS256, HS384, HS512)
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,

    /// Issuer written to and required on tokens
    #[serde(default = "default_jwt_issuer")]
    pub issuer: String,

    /// Audience written to and required on tokens
    #[serde(default = "default_jwt_audience")]
    pub audience: String,

    /// Token lifetime in seconds
    #[serde(default = "default_jwt_lifetime")]
    pub lifetime_secs: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            algorithm: default_jwt_algorithm(),
            issuer: default_jwt_issuer(),
            audience: default_jwt_audience(),
            lifetime_secs: default_jwt_lifetime(),
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    #[serde(default = "default_memory_cost")]
    pub memory_cost_kib: u32,

    /// Number of iterations
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,

    /// Degree of parallelism
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,

    /// Minimum password length in characters
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Maximum password length in characters
    #[serde(default = "default_max_password_length")]
    pub max_password_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: default_memory_cost(),
            time_cost: default_time_cost(),
            parallelism: default_parallelism(),
            min_password_length: default_min_password_length(),
            max_password_length: default_max_password_length(),
        }
    }
}

/// Page size policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request does not name one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Upper bound requested page sizes are clamped to, at most [`MAX_PAGE_SIZE`]
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum idle connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Maximum retry attempts for establishing database connection
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retry attempts in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS configuration (permissive, restrictive, disabled)
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
            compression: true,
            cors_mode: default_cors_mode(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_jwt_issuer() -> String {
    "MottuApi".to_string()
}

fn default_jwt_audience() -> String {
    "MottuMobile".to_string()
}

fn default_jwt_lifetime() -> i64 {
    8 * 60 * 60
}

// OWASP baseline for Argon2id
fn default_memory_cost() -> u32 {
    19456
}

fn default_time_cost() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

fn default_min_password_length() -> usize {
    6
}

fn default_max_password_length() -> usize {
    60
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    2
}

fn default_true() -> bool {
    true
}

fn default_body_limit_mb() -> usize {
    10
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Config files are merged lowest priority first:
    /// `/etc/mottu-api/config.toml`, then the XDG config file, then
    /// `./config.toml`. Environment variables (`MOTTU_` prefix) override
    /// all file-based configs, e.g. `MOTTU_JWT__SECRET`.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the search path and loads directly from the given path.
    /// Environment variables still take precedence.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Config file locations in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR);
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc").join(APP_DIR).join("config.toml"));
        paths
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(config_error(format!(
                "jwt.secret must be at least {} bytes (set MOTTU_JWT__SECRET)",
                MIN_JWT_SECRET_BYTES
            )));
        }

        if self.jwt.lifetime_secs <= 0 {
            return Err(config_error("jwt.lifetime_secs must be positive"));
        }

        let pagination = &self.pagination;
        if pagination.max_page_size == 0 || pagination.max_page_size > MAX_PAGE_SIZE {
            return Err(config_error(format!(
                "pagination.max_page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if pagination.default_page_size == 0
            || pagination.default_page_size > pagination.max_page_size
        {
            return Err(config_error(format!(
                "pagination.default_page_size must be between 1 and {}",
                pagination.max_page_size
            )));
        }

        if self.password.min_password_length > self.password.max_password_length {
            return Err(config_error(
                "password.min_password_length exceeds password.max_password_length",
            ));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config(Box::new(figment::Error::from(message.into())))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_DIR.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            jwt: JwtConfig::default(),
            password: PasswordConfig::default(),
            pagination: PaginationConfig::default(),
            middleware: MiddlewareConfig::default(),
            database: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.jwt.issuer, "MottuApi");
        assert_eq!(config.jwt.audience, "MottuMobile");
        assert_eq!(config.jwt.lifetime_secs, 28800);
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.pagination.max_page_size, 100);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_default_config_requires_secret() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_pagination_bounds() {
        let mut config = Config::default();
        config.jwt.secret = SECRET.to_string();
        assert!(config.validate().is_ok());

        config.pagination.default_page_size = 150;
        assert!(config.validate().is_err());

        config.pagination.default_page_size = 10;
        config.pagination.max_page_size = 0;
        assert!(config.validate().is_err());

        config.pagination.max_page_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_page_cap_above_limit() {
        let mut config = Config::default();
        config.jwt.secret = SECRET.to_string();
        config.pagination.max_page_size = 500;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_page_size"), "{}", err);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "mottu-test"
port = 9090

[jwt]
secret = "{SECRET}"
lifetime_secs = 600

[pagination]
default_page_size = 25
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "mottu-test");
        assert_eq!(config.service.port, 9090);
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.jwt.lifetime_secs, 600);
        assert_eq!(config.jwt.issuer, "MottuApi");
        assert_eq!(config.pagination.default_page_size, 25);
        assert_eq!(config.pagination.max_page_size, 100);
    }

    #[test]
    fn test_load_from_rejects_short_secret() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[jwt]\nsecret = \"too-short\"").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_debug_masks_secret() {
        let jwt = JwtConfig {
            secret: SECRET.to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", jwt);
        assert!(!rendered.contains(SECRET));
    }
}
