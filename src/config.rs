//! Client configuration
//!
//! Settings consumed by [`ClientHandle::new`](crate::client::ClientHandle::new).
//! All values have defaults; `validate()` range-checks everything up front so
//! the rest of the crate never has to re-check them.

use crate::error::ConfigError;

/// Default client id used when the application does not set one
pub const DEFAULT_CLIENT_ID: &str = "kafkaq";

/// Maximum accepted client id length (matches broker-side limits)
pub const MAX_CLIENT_ID_LEN: usize = 255;

/// Default timeout for synchronous request/reply calls (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Minimum request timeout (milliseconds)
pub const MIN_TIMEOUT_MS: u64 = 1;

/// Maximum request timeout (milliseconds)
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Default ceiling for in-flight ops bound to one client handle
///
/// Crossing the ceiling is diagnostic only (a warning is logged); ops are
/// never refused, since dropping work here would strand a requester.
pub const DEFAULT_MAX_INFLIGHT_OPS: i64 = 100_000;

/// Minimum in-flight op ceiling
pub const MIN_MAX_INFLIGHT_OPS: i64 = 1;

/// Maximum in-flight op ceiling
pub const MAX_MAX_INFLIGHT_OPS: i64 = 10_000_000;

/// Configuration for a client handle
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Client identifier, used in log lines and reported to brokers
    pub client_id: String,
    /// Default timeout for synchronous request/reply calls (milliseconds)
    pub default_timeout_ms: u64,
    /// Diagnostic ceiling for ops bound to this handle
    pub max_inflight_ops: i64,
    /// Emit a trace line for every op enqueue/dequeue (debugging aid)
    pub log_op_flow: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_inflight_ops: DEFAULT_MAX_INFLIGHT_OPS,
            log_op_flow: false,
        }
    }
}

impl ClientConfig {
    /// Create a config with the given client id and defaults for the rest
    pub fn new(client_id: impl Into<String>) -> Self {
        ClientConfig {
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    /// Range-check every setting
    ///
    /// Called by `ClientHandle::new`; applications constructing a config by
    /// hand can call it directly to fail fast.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.is_empty() || self.client_id.len() > MAX_CLIENT_ID_LEN {
            return Err(ConfigError::InvalidClientId(self.client_id.clone()));
        }
        if self.default_timeout_ms < MIN_TIMEOUT_MS || self.default_timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::OutOfRange {
                name: "default_timeout_ms",
                value: self.default_timeout_ms as i64,
                min: MIN_TIMEOUT_MS as i64,
                max: MAX_TIMEOUT_MS as i64,
            });
        }
        if self.max_inflight_ops < MIN_MAX_INFLIGHT_OPS
            || self.max_inflight_ops > MAX_MAX_INFLIGHT_OPS
        {
            return Err(ConfigError::OutOfRange {
                name: "max_inflight_ops",
                value: self.max_inflight_ops,
                min: MIN_MAX_INFLIGHT_OPS,
                max: MAX_MAX_INFLIGHT_OPS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.client_id, DEFAULT_CLIENT_ID);
    }

    #[test]
    fn test_empty_client_id_rejected() {
        let config = ClientConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClientId(_))
        ));
    }

    #[test]
    fn test_oversized_client_id_rejected() {
        let config = ClientConfig::new("x".repeat(MAX_CLIENT_ID_LEN + 1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_range_enforced() {
        let mut config = ClientConfig::default();
        config.default_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.default_timeout_ms = MAX_TIMEOUT_MS + 1;
        assert!(config.validate().is_err());

        config.default_timeout_ms = MAX_TIMEOUT_MS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inflight_ceiling_range_enforced() {
        let mut config = ClientConfig::default();
        config.max_inflight_ops = 0;
        assert!(config.validate().is_err());

        config.max_inflight_ops = 1;
        assert!(config.validate().is_ok());
    }
}
