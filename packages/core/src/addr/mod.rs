//! Address translation
//!
//! Conversions between `socket2::SockAddr` storage and human-readable
//! host/port text, plus multicast classification.

mod multicast;
mod text;

pub use multicast::{is_multicast, is_multicast_ip};
pub(crate) use text::describe;
pub use text::{address_to_text, ip_to_text, parse_address, port_of, NO_PATHNAME};

use socket2::{Domain, SockAddr};

/// Address families the handle layer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Inet,
    Inet6,
    Local,
}

impl Family {
    /// Family of a raw address; `None` for anything else (link-layer, ...).
    #[must_use]
    pub fn of(addr: &SockAddr) -> Option<Family> {
        Family::from_domain(addr.domain())
    }

    #[must_use]
    pub fn from_domain(domain: Domain) -> Option<Family> {
        if domain == Domain::IPV4 {
            Some(Family::Inet)
        } else if domain == Domain::IPV6 {
            Some(Family::Inet6)
        } else {
            #[cfg(unix)]
            if domain == Domain::UNIX {
                return Some(Family::Local);
            }
            None
        }
    }

    #[must_use]
    pub fn domain(self) -> Option<Domain> {
        match self {
            Family::Inet => Some(Domain::IPV4),
            Family::Inet6 => Some(Domain::IPV6),
            #[cfg(unix)]
            Family::Local => Some(Domain::UNIX),
            #[cfg(not(unix))]
            Family::Local => None,
        }
    }
}
