use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use deskward_core::AppError;
use tracing_subscriber::EnvFilter;

/// Destination for assignment-changed signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSinkConfig {
    Console,
    Outbox,
}

impl FromStr for SignalSinkConfig {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "outbox" => Ok(Self::Outbox),
            other => Err(AppError::Validation(format!(
                "ASSIGNMENT_SIGNAL_SINK must be either 'console' or 'outbox', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub signal_sink: SignalSinkConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value.parse::<u32>().map_err(|error| {
                AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
            })?,
            Err(_) => 10,
        };
        if database_max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");
        let signal_sink = env::var("ASSIGNMENT_SIGNAL_SINK")
            .unwrap_or_else(|_| "console".to_owned())
            .parse::<SignalSinkConfig>()?;

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            signal_sink,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use deskward_core::AppError;

    use super::{ApiConfig, SignalSinkConfig};

    #[test]
    fn signal_sink_accepts_known_values() {
        assert_eq!(
            "console".parse::<SignalSinkConfig>().ok(),
            Some(SignalSinkConfig::Console)
        );
        assert_eq!(
            " Outbox ".parse::<SignalSinkConfig>().ok(),
            Some(SignalSinkConfig::Outbox)
        );
        assert!(matches!(
            "kafka".parse::<SignalSinkConfig>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn socket_address_rejects_hostnames() {
        let config = ApiConfig {
            migrate_only: false,
            database_url: "postgres://localhost/deskward".to_owned(),
            database_max_connections: 10,
            frontend_url: "http://localhost:3000".to_owned(),
            api_host: "localhost".to_owned(),
            api_port: 3001,
            cookie_secure: false,
            signal_sink: SignalSinkConfig::Console,
        };

        assert!(config.socket_address().is_err());
        let config = ApiConfig {
            api_host: "0.0.0.0".to_owned(),
            ..config
        };
        assert_eq!(
            config.socket_address().ok().map(|address| address.port()),
            Some(3001)
        );
    }
}
