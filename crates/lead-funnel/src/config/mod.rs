use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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
    pub integrations: IntegrationsConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            integrations: IntegrationsConfig::from_env()?,
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

/// Credentials and tuning for the outbound lead collaborators.
///
/// Each collaborator is optional: a missing credential pair degrades that
/// leg of the dispatch to a logged failure rather than refusing to start.
#[derive(Debug, Clone)]
pub struct IntegrationsConfig {
    /// Public origin used when composing results links in outbound email.
    pub base_url: String,
    /// Upper bound applied to every outbound collaborator call.
    pub dispatch_timeout: Duration,
    pub clickup: Option<ClickUpConfig>,
    pub mailing_list: Option<MailingListConfig>,
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Clone)]
pub struct ClickUpConfig {
    pub api_key: String,
    pub list_id: String,
}

#[derive(Debug, Clone)]
pub struct MailingListConfig {
    pub api_key: String,
    pub publication_id: String,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Transactional send endpoint (HTTP API).
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
}

impl IntegrationsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let dispatch_timeout_secs = env::var("DISPATCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let clickup = match (env::var("CLICKUP_API_KEY"), env::var("CLICKUP_LIST_ID")) {
            (Ok(api_key), Ok(list_id)) => Some(ClickUpConfig { api_key, list_id }),
            _ => None,
        };

        let mailing_list = match (
            env::var("MAILING_LIST_API_KEY"),
            env::var("MAILING_LIST_PUBLICATION_ID"),
        ) {
            (Ok(api_key), Ok(publication_id)) => Some(MailingListConfig {
                api_key,
                publication_id,
            }),
            _ => None,
        };

        let email = match (
            env::var("EMAIL_API_URL"),
            env::var("EMAIL_API_KEY"),
            env::var("EMAIL_FROM"),
        ) {
            (Ok(api_url), Ok(api_key), Ok(from_address)) => Some(EmailConfig {
                api_url,
                api_key,
                from_address,
            }),
            _ => None,
        };

        Ok(Self {
            base_url,
            dispatch_timeout: Duration::from_secs(dispatch_timeout_secs),
            clickup,
            mailing_list,
            email,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidTimeout,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "DISPATCH_TIMEOUT_SECS must be a whole number of seconds")
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
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
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
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_BASE_URL",
            "DISPATCH_TIMEOUT_SECS",
            "CLICKUP_API_KEY",
            "CLICKUP_LIST_ID",
            "MAILING_LIST_API_KEY",
            "MAILING_LIST_PUBLICATION_ID",
            "EMAIL_API_URL",
            "EMAIL_API_KEY",
            "EMAIL_FROM",
        ] {
            env::remove_var(key);
        }
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
        assert_eq!(config.integrations.base_url, "http://localhost:3000");
        assert_eq!(config.integrations.dispatch_timeout, Duration::from_secs(10));
        assert!(config.integrations.clickup.is_none());
        assert!(config.integrations.mailing_list.is_none());
        assert!(config.integrations.email.is_none());
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
    fn partial_collaborator_credentials_stay_unconfigured() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CLICKUP_API_KEY", "pk_test");
        // list id missing, so the CRM leg must remain unconfigured
        let config = AppConfig::load().expect("config loads");
        assert!(config.integrations.clickup.is_none());
        env::remove_var("CLICKUP_API_KEY");
    }

    #[test]
    fn reads_full_integration_set() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CLICKUP_API_KEY", "pk_test");
        env::set_var("CLICKUP_LIST_ID", "9001");
        env::set_var("MAILING_LIST_API_KEY", "bh_test");
        env::set_var("MAILING_LIST_PUBLICATION_ID", "pub_123");
        env::set_var("EMAIL_API_URL", "https://mail.example.com/v1/send");
        env::set_var("EMAIL_API_KEY", "em_test");
        env::set_var("EMAIL_FROM", "results@example.com");
        env::set_var("DISPATCH_TIMEOUT_SECS", "3");

        let config = AppConfig::load().expect("config loads");
        let integrations = config.integrations;
        assert_eq!(integrations.dispatch_timeout, Duration::from_secs(3));
        assert_eq!(integrations.clickup.expect("crm").list_id, "9001");
        assert_eq!(
            integrations.mailing_list.expect("list").publication_id,
            "pub_123"
        );
        assert_eq!(
            integrations.email.expect("email").from_address,
            "results@example.com"
        );
        reset_env();
    }
}
