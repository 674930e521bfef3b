//! Socket layer configuration
//!
//! Plain data with `Default` impls. A [`SockConfig`] is owned by the
//! [`SockContext`](crate::SockContext) that performs construction calls.

pub mod sctp;
pub mod tls;

pub use sctp::SctpConfig;
pub use tls::{TlsConfig, CREDENTIAL_PATH_ENV, DEFAULT_CREDENTIAL_PATH};

use crate::addr::Family;

/// Backlog used by `listen` when the caller does not supply one.
pub const DEFAULT_LISTEN_BACKLOG: i32 = 32;

/// Top-level configuration for handle construction
#[derive(Debug, Clone)]
pub struct SockConfig {
    /// Pending-connection queue length for `listen`
    pub listen_backlog: i32,
    /// Set `SO_REUSEADDR` before `bind`
    pub reuse_address: bool,
    /// Restrict resolution to one address family; `None` accepts any
    pub family: Option<Family>,
    pub sctp: SctpConfig,
    pub tls: TlsConfig,
}

impl Default for SockConfig {
    fn default() -> Self {
        Self {
            listen_backlog: DEFAULT_LISTEN_BACKLOG,
            reuse_address: true,
            family: None,
            sctp: SctpConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl SockConfig {
    #[must_use]
    pub fn with_listen_backlog(mut self, backlog: i32) -> Self {
        self.listen_backlog = backlog;
        self
    }

    #[must_use]
    pub fn with_reuse_address(mut self, reuse: bool) -> Self {
        self.reuse_address = reuse;
        self
    }

    #[must_use]
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = Some(family);
        self
    }

    #[must_use]
    pub fn with_sctp(mut self, sctp: SctpConfig) -> Self {
        self.sctp = sctp;
        self
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SockConfig::default();
        assert_eq!(config.listen_backlog, DEFAULT_LISTEN_BACKLOG);
        assert!(config.reuse_address);
        assert!(config.family.is_none());
        assert_eq!(config.sctp.out_streams, 10);
    }

    #[test]
    fn test_builder_setters() {
        let config = SockConfig::default()
            .with_listen_backlog(4)
            .with_reuse_address(false);
        assert_eq!(config.listen_backlog, 4);
        assert!(!config.reuse_address);
    }
}
