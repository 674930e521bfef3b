//! TLS mode selection

use unisock_core::SockFlags;

use super::SockBuilder;

impl SockBuilder {
    /// Encrypt without verifying the peer certificate.
    #[must_use]
    pub fn tls(mut self) -> Self {
        self.flags = SockFlags::TLS;
        self
    }

    /// Encrypt and verify the peer certificate against the trust store.
    #[must_use]
    pub fn tls_strict(mut self) -> Self {
        self.flags = SockFlags::TLS_STRICT;
        self
    }

    #[must_use]
    pub fn no_tls(mut self) -> Self {
        self.flags = SockFlags::NONE;
        self
    }
}
