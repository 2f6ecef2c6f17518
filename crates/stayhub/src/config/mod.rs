use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
    pub google: GoogleConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let token_secret = match env::var("AUTH_TOKEN_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingTokenSecret);
            }
            // Development fallback so a bare checkout can boot.
            _ => "stayhub-dev-secret".to_string(),
        };

        let session_ttl_hours = env::var("AUTH_SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidSessionTtl)?;

        let google = GoogleConfig {
            client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
            redirect_uri: env::var("GOOGLE_REDIRECT_URI").ok(),
            drive_folder_id: env::var("GOOGLE_DRIVE_FOLDER_ID").ok(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig {
                token_secret,
                session_ttl_hours,
            },
            google,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Session-token issuance settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_secret: String,
    pub session_ttl_hours: u32,
}

/// Google OAuth and Drive credentials. All optional: sign-in with Google
/// and Drive-backed photo storage stay disabled until configured.
#[derive(Debug, Clone, Default)]
pub struct GoogleConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub drive_folder_id: Option<String>,
}

impl GoogleConfig {
    /// OAuth sign-in needs the full credential triple.
    pub fn oauth_credentials(&self) -> Option<(&str, &str, &str)> {
        match (&self.client_id, &self.client_secret, &self.redirect_uri) {
            (Some(id), Some(secret), Some(redirect)) => {
                Some((id.as_str(), secret.as_str(), redirect.as_str()))
            }
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidSessionTtl,
    MissingTokenSecret,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidSessionTtl => {
                write!(f, "AUTH_SESSION_TTL_HOURS must be a whole number of hours")
            }
            ConfigError::MissingTokenSecret => {
                write!(f, "AUTH_TOKEN_SECRET is required in production")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("AUTH_TOKEN_SECRET");
        env::remove_var("AUTH_SESSION_TTL_HOURS");
        env::remove_var("GOOGLE_CLIENT_ID");
        env::remove_var("GOOGLE_CLIENT_SECRET");
        env::remove_var("GOOGLE_REDIRECT_URI");
        env::remove_var("GOOGLE_DRIVE_FOLDER_ID");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.auth.session_ttl_hours, 24);
        assert!(config.google.oauth_credentials().is_none());
    }

    #[test]
    fn production_requires_token_secret() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let err = AppConfig::load().expect_err("missing secret rejected");
        assert!(matches!(err, ConfigError::MissingTokenSecret));
        env::remove_var("APP_ENV");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        env::remove_var("APP_HOST");
    }

    #[test]
    fn oauth_credentials_require_full_triple() {
        let google = GoogleConfig {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            redirect_uri: None,
            drive_folder_id: None,
        };
        assert!(google.oauth_credentials().is_none());
    }
}
