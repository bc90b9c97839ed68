//! Server configuration from the environment
//!
//! Everything has a default except the model credentials; see
//! [`ModelConfig::from_env`](crate::llm::ModelConfig::from_env) for those.

use std::net::SocketAddr;
use thiserror::Error;

/// Errors reading server settings from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS; `None` allows any origin.
    pub allowed_origin: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origin: None,
        }
    }
}

impl AgentConfig {
    /// Read `HOST`, `PORT`, and `ALLOWED_ORIGIN` from the environment,
    /// falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = match std::env::var("PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => defaults.port,
        };
        let allowed_origin = std::env::var("ALLOWED_ORIGIN").ok();

        Ok(Self {
            host,
            port,
            allowed_origin,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.parse::<u16>()
        .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_loopback() {
        let config = AgentConfig::default();
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:8080");
        assert!(config.allowed_origin.is_none());
    }

    #[test]
    fn unparsable_port_is_a_config_error() {
        assert_eq!(parse_port("8080").unwrap(), 8080);

        for raw in ["not-a-port", "-1", "65536", ""] {
            let err = parse_port(raw).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains(raw)));
        }
    }
}
