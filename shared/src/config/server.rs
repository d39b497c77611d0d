//! Server configuration module

use serde::{Deserialize, Serialize};

use super::lookup_parsed;

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum JSON / URL-encoded payload size in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            max_payload_size: default_max_payload_size(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from `SERVER_HOST`, `SERVER_PORT` and `SERVER_MAX_PAYLOAD_SIZE`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port: lookup_parsed(&lookup, "SERVER_PORT", defaults.port),
            max_payload_size: lookup_parsed(&lookup, "SERVER_MAX_PAYLOAD_SIZE", defaults.max_payload_size),
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration. Every origin is accepted; only preflight caching is tunable.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Max age for preflight cache in seconds
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            max_age: default_cors_max_age(),
        }
    }
}

impl CorsConfig {
    /// Build from `CORS_MAX_AGE`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            max_age: lookup_parsed(&lookup, "CORS_MAX_AGE", default_cors_max_age()),
        }
    }
}

fn default_max_payload_size() -> usize {
    100 * 1024
}

fn default_cors_max_age() -> usize {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.max_payload_size, 102_400);
    }

    #[test]
    fn test_server_config_from_lookup() {
        let config = ServerConfig::from_lookup(|key| match key {
            "SERVER_HOST" => Some("0.0.0.0".to_string()),
            "SERVER_PORT" => Some("9090".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
    }

    #[test]
    fn test_cors_max_age_parsing() {
        let config = CorsConfig::from_lookup(|_| Some("7200".to_string()));
        assert_eq!(config.max_age, 7200);

        let config = CorsConfig::from_lookup(|_| Some("invalid".to_string()));
        assert_eq!(config.max_age, 3600);
    }
}
