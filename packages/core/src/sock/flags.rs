//! Capability set of a handle

/// TLS and multicast capabilities of a handle.
///
/// Strict TLS implies plain TLS. The multicast bit is only ever set by the
/// creation path after a successful group join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SockFlags {
    tls_enabled: bool,
    tls_strict: bool,
    multicast_joined: bool,
}

impl SockFlags {
    /// No TLS requested
    pub const NONE: SockFlags = SockFlags {
        tls_enabled: false,
        tls_strict: false,
        multicast_joined: false,
    };

    /// Encrypted, peer certificate not verified
    pub const TLS: SockFlags = SockFlags {
        tls_enabled: true,
        ..SockFlags::NONE
    };

    /// Encrypted, peer certificate verified against the trust store
    pub const TLS_STRICT: SockFlags = SockFlags {
        tls_enabled: true,
        tls_strict: true,
        ..SockFlags::NONE
    };

    #[must_use]
    pub const fn tls_enabled(self) -> bool {
        self.tls_enabled
    }

    #[must_use]
    pub const fn tls_strict(self) -> bool {
        self.tls_strict
    }

    #[must_use]
    pub const fn multicast_joined(self) -> bool {
        self.multicast_joined
    }

    pub(crate) const fn with_multicast(self) -> Self {
        SockFlags {
            multicast_joined: true,
            ..self
        }
    }

    /// The caller-requestable part (TLS mode) of these flags.
    pub(crate) const fn requested(self) -> Self {
        SockFlags {
            multicast_joined: false,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_implies_plain() {
        assert!(SockFlags::TLS_STRICT.tls_enabled());
        assert!(SockFlags::TLS_STRICT.tls_strict());
        assert!(!SockFlags::TLS.tls_strict());
        assert!(!SockFlags::NONE.tls_enabled());
    }

    #[test]
    fn test_multicast_bit_is_not_requestable() {
        let joined = SockFlags::TLS.with_multicast();
        assert!(joined.multicast_joined());
        assert_eq!(joined.requested(), SockFlags::TLS);
    }
}
