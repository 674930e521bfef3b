//! Terminal methods
//!
//! `connect`, `bind`, `bind_any` and `listen` consume the builder and
//! construct the handle through the selected context.

use unisock_core::{parse_address, Handle, Result};

use crate::builder::core::SockBuilder;

impl SockBuilder {
    /// Connect to `host`/`service`.
    ///
    /// For local sockets `host` is the socket path and `service` is ignored.
    ///
    /// # Errors
    ///
    /// Resolution, system, TLS or multicast join failure.
    ///
    /// # Examples
    /// ```no_run
    /// use unisock::Sock;
    ///
    /// let handle = Sock::udp().connect("239.255.0.1", "5000")?;
    /// assert!(handle.flags().multicast_joined());
    /// # Ok::<(), unisock::Error>(())
    /// ```
    pub fn connect(self, host: &str, service: &str) -> Result<Handle> {
        if self.debug_enabled {
            tracing::debug!("unisock builder: {} connect {host}:{service}", self.protocol);
        }
        self.resolve_context()
            .connect(host, service, self.protocol, self.flags)
    }

    /// Bind to `host`/`service`, then join the configured multicast group.
    ///
    /// # Errors
    ///
    /// Resolution or system failure, or the group join failure (the bound
    /// handle is closed in that case).
    pub fn bind(self, host: &str, service: &str) -> Result<Handle> {
        self.bind_inner(Some(host), service)
    }

    /// Bind the wildcard address on `service`.
    ///
    /// # Errors
    ///
    /// As for [`bind`](Self::bind).
    pub fn bind_any(self, service: &str) -> Result<Handle> {
        self.bind_inner(None, service)
    }

    /// Bind and start listening with the context's configured backlog.
    ///
    /// # Errors
    ///
    /// As for [`bind`](Self::bind), plus `listen(2)` failure.
    pub fn listen(self, host: &str, service: &str) -> Result<Handle> {
        let context = self.resolve_context();
        let handle = self.bind_inner(Some(host), service)?;
        context.listen(&handle)?;
        Ok(handle)
    }

    fn bind_inner(self, host: Option<&str>, service: &str) -> Result<Handle> {
        if self.debug_enabled {
            tracing::debug!(
                "unisock builder: {} bind {}:{service}",
                self.protocol,
                host.unwrap_or("*")
            );
        }
        let context = self.resolve_context();
        let mut handle = context.bind(host, service, self.protocol, self.flags)?;
        if let Some(join) = &self.group {
            let group = parse_address(&join.group, 0)?;
            handle.join_multicast(&group, &join.interface)?;
            if self.debug_enabled {
                tracing::debug!("unisock builder: joined {} via {}", join.group, join.interface);
            }
        }
        Ok(handle)
    }
}
