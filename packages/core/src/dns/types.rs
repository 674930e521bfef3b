//! Resolution hints and results

use socket2::{Protocol, SockAddr, Type};

use crate::addr::Family;

/// Constraints passed to a [`Resolver`](super::Resolver).
#[derive(Debug, Clone, Copy, Default)]
pub struct Hints {
    /// Restrict results to one family; `None` accepts IPv4 and IPv6
    pub family: Option<Family>,
    /// Restrict results to one socket type; `None` yields stream and datagram
    pub socktype: Option<Type>,
    /// Transport protocol to annotate results with
    pub protocol: Option<Protocol>,
    /// Wildcard address when no host is given (bind side)
    pub passive: bool,
}

impl Hints {
    #[must_use]
    pub fn active(socktype: Option<Type>, protocol: Option<Protocol>) -> Self {
        Self {
            family: None,
            socktype,
            protocol,
            passive: false,
        }
    }

    #[must_use]
    pub fn passive(socktype: Option<Type>, protocol: Option<Protocol>) -> Self {
        Self {
            passive: true,
            ..Self::active(socktype, protocol)
        }
    }

    #[must_use]
    pub fn with_family(mut self, family: Option<Family>) -> Self {
        self.family = family;
        self
    }
}

/// One resolved candidate.
#[derive(Debug, Clone)]
pub struct AddrInfo {
    pub family: Family,
    pub socktype: Type,
    pub protocol: Option<Protocol>,
    pub address: SockAddr,
}
