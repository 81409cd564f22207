//! Client configuration types.

use std::time::Duration;

/// Configuration for the HTTP transport.
///
/// Both limits are off by default: a request runs until the server answers,
/// the connection fails or the caller's context ends.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Overall limit for one exchange, body reads included.
    pub timeout: Option<Duration>,
    /// Limit for establishing the TCP connection.
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub const fn build(self) -> ClientConfig {
        ClientConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_limits() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.connect_timeout, None);
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
    }
}
