//! Centralized configuration for the notify bridge.
//!
//! Configuration is loaded from environment variables once at startup and is
//! immutable afterwards. Missing secrets do not fail startup; the operation
//! that needs them fails with a configuration error instead.

use crate::error::BridgeError;
use bridge_common::{HttpConfig, LogFormat, TracingConfig};
use secrecy::SecretString;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default remote platform API root.
pub const DEFAULT_PLATFORM_URL: &str = "https://api.courier.com";

/// Symmetric JWT signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
}

impl SigningAlgorithm {
    /// Get algorithm name for JWT header.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }

    /// The matching `jsonwebtoken` algorithm.
    #[must_use]
    pub const fn to_jwt(self) -> jsonwebtoken::Algorithm {
        match self {
            Self::HS256 => jsonwebtoken::Algorithm::HS256,
            Self::HS384 => jsonwebtoken::Algorithm::HS384,
            Self::HS512 => jsonwebtoken::Algorithm::HS512,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            _ => Err(BridgeError::configuration(format!(
                "Invalid JWT algorithm: {s}"
            ))),
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Local signing settings (Strategy A).
#[derive(Debug, Clone)]
pub struct SigningConfig {
    /// Symmetric signing secret
    pub secret: Option<SecretString>,
    /// Signing algorithm
    pub algorithm: Option<SigningAlgorithm>,
    /// Lifetime of locally signed credentials
    pub expiration: Duration,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            secret: None,
            algorithm: Some(SigningAlgorithm::HS256),
            expiration: Duration::from_secs(24 * 3600),
        }
    }
}

impl SigningConfig {
    /// Set the signing secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Set or clear the algorithm.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: Option<SigningAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the credential lifetime.
    #[must_use]
    pub const fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }
}

/// Remote notification platform settings (Strategy B and the platform client).
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Platform API key
    pub api_key: Option<SecretString>,
    /// Platform tenant id
    pub tenant_id: Option<String>,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLATFORM_URL.to_string(),
            api_key: None,
            tenant_id: None,
            http: HttpConfig::default(),
        }
    }
}

impl PlatformConfig {
    /// Set the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the tenant id.
    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

/// Notify bridge configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Inbound server
    pub server: ServerConfig,
    /// Local signing
    pub signing: SigningConfig,
    /// Remote platform
    pub platform: PlatformConfig,
    /// Logging
    pub tracing: TracingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid.
    pub fn from_env() -> Result<Self, BridgeError> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORT", 8000)?,
        };

        let algorithm = match env::var("JWT_ALGORITHM") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value.trim().parse()?),
            Err(_) => Some(SigningAlgorithm::HS256),
        };
        let signing = SigningConfig {
            secret: non_empty_env("JWT_SECRET_KEY").map(SecretString::from),
            algorithm,
            expiration: expiration_from_hours(parse_env("JWT_EXPIRATION_HOURS", 24)?)?,
        };

        let base_url =
            env::var("COURIER_BASE_URL").unwrap_or_else(|_| DEFAULT_PLATFORM_URL.to_string());
        Url::parse(&base_url)
            .map_err(|e| BridgeError::configuration(format!("Invalid COURIER_BASE_URL: {e}")))?;

        let platform = PlatformConfig {
            api_key: non_empty_env("COURIER_API_KEY").map(SecretString::from),
            tenant_id: non_empty_env("COURIER_TENANT_ID"),
            http: HttpConfig::default()
                .with_timeout(Duration::from_secs(parse_env("HTTP_TIMEOUT_SECS", 30)?)),
            ..PlatformConfig::default()
        }
        .with_base_url(base_url);

        let format = env::var("LOG_FORMAT")
            .map_or(Ok(LogFormat::Text), |f| f.parse())
            .map_err(|e| BridgeError::configuration(format!("Invalid LOG_FORMAT: {e}")))?;
        let tracing = TracingConfig::new(
            non_empty_env("SERVICE_NAME").unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
        )
        .with_log_level(env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
        .with_format(format);

        Ok(Self {
            server,
            signing,
            platform,
            tracing,
        })
    }

    /// Replace the signing section.
    #[must_use]
    pub fn with_signing(mut self, signing: SigningConfig) -> Self {
        self.signing = signing;
        self
    }

    /// Replace the platform section.
    #[must_use]
    pub fn with_platform(mut self, platform: PlatformConfig) -> Self {
        self.platform = platform;
        self
    }
}

/// Parse environment variable with default value.
fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, BridgeError>
where
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| BridgeError::configuration(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Credential lifetime for `JWT_EXPIRATION_HOURS`.
fn expiration_from_hours(hours: u64) -> Result<Duration, BridgeError> {
    hours
        .checked_mul(3600)
        .map(Duration::from_secs)
        .ok_or_else(|| BridgeError::configuration(format!("Invalid JWT_EXPIRATION_HOURS: {hours}")))
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_algorithm_parsing() {
        assert_eq!(
            "HS256".parse::<SigningAlgorithm>().unwrap(),
            SigningAlgorithm::HS256
        );
        assert_eq!(
            "hs384".parse::<SigningAlgorithm>().unwrap(),
            SigningAlgorithm::HS384
        );
        assert_eq!(
            "HS512".parse::<SigningAlgorithm>().unwrap(),
            SigningAlgorithm::HS512
        );
        assert!("RS256".parse::<SigningAlgorithm>().is_err());
    }

    #[test]
    fn test_signing_algorithm_as_str() {
        assert_eq!(SigningAlgorithm::HS256.as_str(), "HS256");
        assert_eq!(SigningAlgorithm::HS512.to_string(), "HS512");
        assert_eq!(
            SigningAlgorithm::HS384.to_jwt(),
            jsonwebtoken::Algorithm::HS384
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert!(config.signing.secret.is_none());
        assert_eq!(config.signing.algorithm, Some(SigningAlgorithm::HS256));
        assert_eq!(config.signing.expiration, Duration::from_secs(86400));
        assert_eq!(config.platform.base_url, DEFAULT_PLATFORM_URL);
        assert!(config.platform.api_key.is_none());
        assert!(config.platform.tenant_id.is_none());
        assert_eq!(config.tracing.service_name, "notify-bridge");
        assert_eq!(config.tracing.format, LogFormat::Text);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_signing(
                SigningConfig::default()
                    .with_secret("s3cret")
                    .with_expiration(Duration::from_secs(60)),
            )
            .with_platform(
                PlatformConfig::default()
                    .with_base_url("http://localhost:9999/")
                    .with_api_key("pk_test")
                    .with_tenant_id("t1"),
            );

        assert!(config.signing.secret.is_some());
        assert_eq!(config.signing.expiration, Duration::from_secs(60));
        assert_eq!(config.platform.base_url, "http://localhost:9999");
        assert!(config.platform.api_key.is_some());
        assert_eq!(config.platform.tenant_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_expiration_hours() {
        assert_eq!(expiration_from_hours(24).unwrap(), Duration::from_secs(86400));
        assert_eq!(expiration_from_hours(0).unwrap(), Duration::ZERO);
        assert!(matches!(
            expiration_from_hours(u64::MAX),
            Err(BridgeError::Configuration(msg)) if msg.contains("JWT_EXPIRATION_HOURS")
        ));
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let signing = SigningConfig::default().with_secret("super-secret-value");
        assert!(!format!("{signing:?}").contains("super-secret-value"));
    }
}
