//! Multicast classification

use std::net::IpAddr;

use socket2::SockAddr;

/// `Some(true)` for 224.0.0.0/4 and ff00::/8, `Some(false)` for other
/// IPv4/IPv6 addresses, `None` for any other family.
#[must_use]
pub fn is_multicast(addr: &SockAddr) -> Option<bool> {
    addr.as_socket().map(|socket| is_multicast_ip(socket.ip()))
}

#[must_use]
pub fn is_multicast_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.octets()[0] >> 4 == 0xE,
        IpAddr::V6(v6) => v6.octets()[0] == 0xFF,
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};

    use super::*;

    fn sock(text: &str) -> SockAddr {
        SockAddr::from(text.parse::<SocketAddr>().expect("valid socket address"))
    }

    #[test]
    fn test_ipv4_multicast_range() {
        for first in 224u8..=239 {
            let ip = Ipv4Addr::new(first, 1, 2, 3);
            assert!(is_multicast_ip(ip.into()), "{ip} is multicast");
        }
        assert!(!is_multicast_ip(Ipv4Addr::new(223, 255, 255, 255).into()));
        assert!(!is_multicast_ip(Ipv4Addr::new(240, 0, 0, 0).into()));
        assert_eq!(is_multicast(&sock("192.0.2.1:1")), Some(false));
        assert_eq!(is_multicast(&sock("239.255.0.1:5000")), Some(true));
    }

    #[test]
    fn test_ipv6_multicast_prefix() {
        assert_eq!(is_multicast(&sock("[ff02::1]:1")), Some(true));
        assert_eq!(is_multicast(&sock("[ff0e::1:2]:1")), Some(true));
        assert_eq!(is_multicast(&sock("[2001:db8::1]:1")), Some(false));
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_family_is_unknown() {
        let addr = SockAddr::unix("/tmp/unisock-mcast").expect("unix address");
        assert_eq!(is_multicast(&addr), None);
    }
}
