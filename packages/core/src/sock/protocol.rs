//! Protocol tag carried by every handle

use std::fmt;

use socket2::{Protocol as IpProtocol, Type};

/// Transport a [`Handle`](super::Handle) was created for; fixed for its
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    /// Leave the socket type to the resolver.
    #[default]
    None,
    Tcp,
    Udp,
    Sctp,
    /// Unix-domain stream socket addressed by a filesystem path.
    Local,
}

impl Protocol {
    /// Socket type hint for resolution; `None` accepts whatever the resolver
    /// returns.
    #[must_use]
    pub fn socket_type(self) -> Option<Type> {
        match self {
            Protocol::None => None,
            Protocol::Tcp | Protocol::Sctp | Protocol::Local => Some(Type::STREAM),
            Protocol::Udp => Some(Type::DGRAM),
        }
    }

    #[must_use]
    pub fn ip_protocol(self) -> Option<IpProtocol> {
        match self {
            Protocol::Tcp => Some(IpProtocol::TCP),
            Protocol::Udp => Some(IpProtocol::UDP),
            Protocol::Sctp => Some(crate::sctp::protocol()),
            Protocol::None | Protocol::Local => None,
        }
    }

    /// Upper-case name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::None => "unspecified",
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Sctp => "SCTP",
            Protocol::Local => "local",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_types() {
        assert_eq!(Protocol::Tcp.socket_type(), Some(Type::STREAM));
        assert_eq!(Protocol::Udp.socket_type(), Some(Type::DGRAM));
        assert_eq!(Protocol::Sctp.socket_type(), Some(Type::STREAM));
        assert_eq!(Protocol::None.socket_type(), None);
    }

    #[test]
    fn test_sctp_protocol_number() {
        assert_eq!(
            Protocol::Sctp.ip_protocol(),
            Some(IpProtocol::from(crate::sctp::IPPROTO_SCTP))
        );
        assert_eq!(Protocol::Local.ip_protocol(), None);
    }
}
