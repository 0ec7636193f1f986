use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use orbital_delivery::client::{DEFAULT_BASE_URL, DEFAULT_RELAY_PATH, DEFAULT_TIMEOUT};
use orbital_delivery::{ControlPlaneTarget, DeliveryConfig};

/// Socket the control-plane proxy listens on.
pub const DEFAULT_SOCKET_PATH: &str = "/orbitlab/proxy.sock";

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Relay configuration loaded from environment variables.
///
/// Every field has a default matching the production deployment, so an
/// empty environment yields a working relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `80`).
    pub port: u16,
    /// Inbound request timeout in seconds (default: `30`). Always greater
    /// than the delivery timeout.
    pub request_timeout_secs: u64,
    /// Largest accepted inbound body in bytes (default: 2 MiB).
    pub max_body_bytes: usize,
    /// How the control plane is reached.
    pub control_plane: ControlPlaneTarget,
    /// Outbound delivery settings (base URL, path, timeout).
    pub delivery: DeliveryConfig,
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024,
            control_plane: ControlPlaneTarget::UnixSocket(PathBuf::from(DEFAULT_SOCKET_PATH)),
            delivery: DeliveryConfig::default(),
            log_format: LogFormat::Text,
        }
    }
}

impl RelayConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `80`                    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `MAX_BODY_BYTES`          | `2097152`               |
    /// | `CONTROL_PLANE_TRANSPORT` | `unix` (`unix`, `tcp`)  |
    /// | `CONTROL_PLANE_SOCKET`    | `/orbitlab/proxy.sock`  |
    /// | `CONTROL_PLANE_BASE_URL`  | `http://orbital-relay`  |
    /// | `CONTROL_PLANE_PATH`      | `/orbital-relay`        |
    /// | `DELIVERY_TIMEOUT_SECS`   | `10`                    |
    /// | `LOG_FORMAT`              | `text` (`text`, `json`) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse("PORT", &var("PORT", "80"), "a valid port number")?;
        let request_timeout_secs: u64 = parse(
            "REQUEST_TIMEOUT_SECS",
            &var("REQUEST_TIMEOUT_SECS", "30"),
            "a whole number of seconds",
        )?;
        let max_body_bytes = parse(
            "MAX_BODY_BYTES",
            &var("MAX_BODY_BYTES", "2097152"),
            "a byte count",
        )?;

        let socket = var("CONTROL_PLANE_SOCKET", DEFAULT_SOCKET_PATH);
        let control_plane = match var("CONTROL_PLANE_TRANSPORT", "unix").to_ascii_lowercase().as_str() {
            "unix" => ControlPlaneTarget::UnixSocket(PathBuf::from(socket)),
            "tcp" => ControlPlaneTarget::Tcp,
            other => {
                return Err(ConfigError::Invalid {
                    var: "CONTROL_PLANE_TRANSPORT",
                    expected: "one of `unix`, `tcp`",
                    value: other.to_string(),
                })
            }
        };

        let timeout_secs: u64 = parse(
            "DELIVERY_TIMEOUT_SECS",
            &var("DELIVERY_TIMEOUT_SECS", &DEFAULT_TIMEOUT.as_secs().to_string()),
            "a whole number of seconds",
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "DELIVERY_TIMEOUT_SECS",
                expected: "greater than zero",
                value: "0".to_string(),
            });
        }
        // The inbound deadline must outlast delivery, or a slow control plane
        // is answered by the timeout layer instead of as a relay failure.
        if request_timeout_secs <= timeout_secs {
            return Err(ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                expected: "greater than DELIVERY_TIMEOUT_SECS",
                value: request_timeout_secs.to_string(),
            });
        }
        let delivery = DeliveryConfig {
            base_url: var("CONTROL_PLANE_BASE_URL", DEFAULT_BASE_URL),
            path: var("CONTROL_PLANE_PATH", DEFAULT_RELAY_PATH),
            timeout: Duration::from_secs(timeout_secs),
        };

        let log_format = match var("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    expected: "one of `text`, `json`",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            max_body_bytes,
            control_plane,
            delivery,
            log_format,
        })
    }
}

fn parse<T: FromStr>(var: &'static str, value: &str, expected: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    })
}
