//! Construction context
//!
//! Binds the configuration and the resolver and TLS collaborators used by
//! the construction verbs. The crate-level free functions use
//! [`SockContext::global`].

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::SockConfig;
use crate::dns::{Resolver, SystemResolver};
use crate::error::{Error, Result};
use crate::raw;
use crate::sock::{Handle, Protocol, SockFlags};
use crate::tls::{RustlsProvider, TlsProvider};

static GLOBAL: OnceCell<Arc<SockContext>> = OnceCell::new();

pub struct SockContext {
    config: SockConfig,
    resolver: Arc<dyn Resolver>,
    tls: Arc<dyn TlsProvider>,
}

impl fmt::Debug for SockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SockContext")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .field("tls", &self.tls)
            .finish()
    }
}

impl Default for SockContext {
    fn default() -> Self {
        Self::new(SockConfig::default())
    }
}

impl SockContext {
    /// System resolver and rustls provider over `config`.
    #[must_use]
    pub fn new(config: SockConfig) -> Self {
        let tls = Arc::new(RustlsProvider::new(config.tls.clone()));
        Self {
            config,
            resolver: Arc::new(SystemResolver::new()),
            tls,
        }
    }

    #[must_use]
    pub fn builder() -> SockContextBuilder {
        SockContextBuilder::default()
    }

    /// The process-wide context, built with defaults on first use unless
    /// [`set_global`](Self::set_global) ran first.
    pub fn global() -> Arc<SockContext> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(SockContext::default())))
    }

    /// Install the process-wide context.
    ///
    /// # Errors
    ///
    /// Returns the context back when one is already in place.
    pub fn set_global(context: Arc<SockContext>) -> std::result::Result<(), Arc<SockContext>> {
        GLOBAL.set(context)
    }

    #[must_use]
    pub fn config(&self) -> &SockConfig {
        &self.config
    }

    #[must_use]
    pub fn resolver(&self) -> &dyn Resolver {
        &*self.resolver
    }

    #[must_use]
    pub fn tls(&self) -> &dyn TlsProvider {
        &*self.tls
    }

    /// Connect a new handle.
    ///
    /// With TLS requested the client handshake runs before any handle
    /// state exists; its failure closes the descriptor. A multicast remote
    /// address is joined on the default interface.
    ///
    /// # Errors
    ///
    /// `Address`, `System`, `Tls`, or any multicast join error. No handle is
    /// returned on failure.
    pub fn connect(
        &self,
        host: &str,
        service: &str,
        protocol: Protocol,
        flags: SockFlags,
    ) -> Result<Handle> {
        let flags = flags.requested();
        let socket = raw::connect(&*self.resolver, host, service, protocol, self.config.family)?;

        let session = if flags.tls_enabled() {
            match self.tls.client(&socket, host, flags.tls_strict()) {
                Ok(session) => Some(session),
                Err(e) => {
                    sock_error!("TLS client negotiation with {host}:{service}: {e}");
                    return Err(Error::Tls(e));
                }
            }
        } else {
            None
        };

        let mut handle = Handle::new(socket, protocol, flags, session);
        handle.populate_local()?;
        handle.populate_remote(None)?;
        handle.join_if_multicast()?;
        sock_debug!(
            "sock#{}: {protocol} connected to {host}:{service}",
            handle.id()
        );
        Ok(handle)
    }

    /// Connect an existing handle to a new peer, resetting its cached
    /// addresses. A previously joined group is left first; the new remote
    /// is joined when it is multicast.
    ///
    /// # Errors
    ///
    /// `Error::Protocol` for TLS handles; otherwise as for
    /// [`connect`](Self::connect).
    pub fn reconnect(&self, handle: &mut Handle, host: &str, service: &str) -> Result<()> {
        if handle.flags().tls_enabled() {
            return Err(Error::protocol(handle.protocol(), "reconnect with TLS"));
        }
        handle.release_membership();
        raw::connect_existing(
            handle.sock()?,
            &*self.resolver,
            host,
            service,
            handle.protocol(),
        )?;
        handle.populate_local()?;
        handle.populate_remote(None)?;
        handle.join_if_multicast()?;
        sock_debug!("sock#{}: reconnected to {host}:{service}", handle.id());
        Ok(())
    }

    /// Bind a new handle. No TLS negotiation or multicast join happens here;
    /// TLS flags are kept for the handles produced by [`accept`](Self::accept).
    ///
    /// # Errors
    ///
    /// `Address` or `System`.
    pub fn bind(
        &self,
        host: Option<&str>,
        service: &str,
        protocol: Protocol,
        flags: SockFlags,
    ) -> Result<Handle> {
        let socket = raw::bind(&*self.resolver, host, service, protocol, &self.config)?;
        let mut handle = Handle::new(socket, protocol, flags.requested(), None);
        handle.populate_local()?;
        sock_debug!(
            "sock#{}: {protocol} bound to {}:{service}",
            handle.id(),
            handle.local_host().unwrap_or("*")
        );
        Ok(handle)
    }

    /// Start listening with the configured backlog.
    ///
    /// # Errors
    ///
    /// `Error::System` when `listen(2)` fails.
    pub fn listen(&self, handle: &Handle) -> Result<()> {
        raw::listen(handle.sock()?, self.config.listen_backlog)
    }

    /// Accept a connection from a listening handle.
    ///
    /// The new handle inherits protocol and TLS flags; a TLS listener runs
    /// the server handshake before the handle is returned. The listener is
    /// never modified.
    ///
    /// # Errors
    ///
    /// `System` or `Tls`.
    pub fn accept(&self, listener: &Handle) -> Result<Handle> {
        let (socket, peer) = raw::accept(listener.sock()?)?;
        let flags = listener.flags().requested();

        let session = if flags.tls_enabled() {
            match self.tls.server(&socket) {
                Ok(session) => Some(session),
                Err(e) => {
                    sock_error!("sock#{}: TLS server negotiation: {e}", listener.id());
                    return Err(Error::Tls(e));
                }
            }
        } else {
            None
        };

        let mut handle = Handle::new(socket, listener.protocol(), flags, session);
        handle.populate_remote(Some(peer))?;
        handle.populate_local()?;
        sock_debug!(
            "sock#{}: accepted on sock#{} from {}",
            handle.id(),
            listener.id(),
            handle.remote_host().unwrap_or("<unknown>")
        );
        Ok(handle)
    }
}

/// Swaps collaborators into a [`SockContext`].
#[derive(Default)]
pub struct SockContextBuilder {
    config: Option<SockConfig>,
    resolver: Option<Arc<dyn Resolver>>,
    tls: Option<Arc<dyn TlsProvider>>,
}

impl SockContextBuilder {
    #[must_use]
    pub fn config(mut self, config: SockConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn tls_provider(mut self, tls: Arc<dyn TlsProvider>) -> Self {
        self.tls = Some(tls);
        self
    }

    #[must_use]
    pub fn build(self) -> SockContext {
        let config = self.config.unwrap_or_default();
        let tls = self
            .tls
            .unwrap_or_else(|| Arc::new(RustlsProvider::new(config.tls.clone())));
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(SystemResolver::new()));
        SockContext {
            config,
            resolver,
            tls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{AddrInfo, Hints, ResolveError};

    #[derive(Debug)]
    struct NoNames;

    impl Resolver for NoNames {
        fn resolve(
            &self,
            host: Option<&str>,
            _service: Option<&str>,
            _hints: &Hints,
        ) -> std::result::Result<Vec<AddrInfo>, ResolveError> {
            Err(ResolveError::no_name(host.unwrap_or_default()))
        }
    }

    #[test]
    fn test_resolver_failure_is_address_error() {
        let ctx = SockContext::builder().resolver(Arc::new(NoNames)).build();
        let err = ctx
            .connect("nowhere.invalid", "80", Protocol::Tcp, SockFlags::NONE)
            .expect_err("unresolvable");
        assert!(matches!(err, Error::Address(ResolveError::NoName(_))));
    }

    #[test]
    fn test_builder_keeps_config() {
        let ctx = SockContext::builder()
            .config(SockConfig::default().with_listen_backlog(7))
            .build();
        assert_eq!(ctx.config().listen_backlog, 7);
    }
}
