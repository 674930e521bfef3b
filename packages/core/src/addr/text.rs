//! Host/port text rendering and parsing

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use socket2::SockAddr;

use crate::error::{Error, Result};

/// Rendered for a Unix-domain address with no bound path.
pub const NO_PATHNAME: &str = "(no pathname bound)";

/// Render the host part of an address.
///
/// IPv6 forms embedding an IPv4 address (`::ffff:a.b.c.d` and the
/// deprecated `::a.b.c.d`) render as the embedded dotted quad. Unix-domain
/// addresses render as their path, `@name` for the Linux abstract
/// namespace, or [`NO_PATHNAME`]. Other families yield `None`.
#[must_use]
pub fn address_to_text(addr: &SockAddr) -> Option<String> {
    if let Some(socket) = addr.as_socket() {
        return Some(ip_to_text(socket.ip()));
    }
    #[cfg(unix)]
    if addr.domain() == socket2::Domain::UNIX {
        if let Some(path) = addr.as_pathname() {
            return Some(path.display().to_string());
        }
        #[cfg(any(target_os = "linux", target_os = "android"))]
        if let Some(name) = addr.as_abstract_namespace() {
            return Some(format!("@{}", String::from_utf8_lossy(name)));
        }
        return Some(NO_PATHNAME.to_string());
    }
    None
}

#[must_use]
pub fn ip_to_text(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => match embedded_ipv4(&v6) {
            Some(v4) => v4.to_string(),
            None => v6.to_string(),
        },
    }
}

fn embedded_ipv4(v6: &Ipv6Addr) -> Option<Ipv4Addr> {
    if let Some(v4) = v6.to_ipv4_mapped() {
        return Some(v4);
    }
    // IPv4-compatible; `::` and `::1` keep their IPv6 spelling.
    let octets = v6.octets();
    if octets[..12].iter().all(|b| *b == 0) && !v6.is_unspecified() && !v6.is_loopback() {
        return Some(Ipv4Addr::new(octets[12], octets[13], octets[14], octets[15]));
    }
    None
}

/// `host:port` (or the path) for log lines.
pub(crate) fn describe(addr: &SockAddr) -> String {
    let host = address_to_text(addr).unwrap_or_else(|| "<unknown>".to_string());
    match port_of(addr) {
        Some(port) if addr.is_ipv6() && !host.contains('.') => format!("[{host}]:{port}"),
        Some(port) => format!("{host}:{port}"),
        None => host,
    }
}

/// Port of an IPv4/IPv6 address in host byte order; `None` for other families.
#[must_use]
pub fn port_of(addr: &SockAddr) -> Option<u16> {
    addr.as_socket().map(|socket| socket.port())
}

/// Build address storage from host text and a port.
///
/// Accepts IPv4 and IPv6 literals (optionally bracketed) and, on Unix,
/// absolute or `./`-relative paths for local sockets.
///
/// # Errors
///
/// `Error::Family` when the host is neither an IP literal nor a path.
pub fn parse_address(host: &str, port: u16) -> Result<SockAddr> {
    let literal = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if let Ok(ip) = literal.parse::<IpAddr>() {
        return Ok(SockAddr::from(SocketAddr::new(ip, port)));
    }
    #[cfg(unix)]
    if host.starts_with('/') || host.starts_with("./") {
        return SockAddr::unix(host).map_err(|e| Error::system("unix address", e));
    }
    Err(Error::Family)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sock(text: &str) -> SockAddr {
        SockAddr::from(text.parse::<SocketAddr>().expect("valid socket address"))
    }

    #[test]
    fn test_ipv4_text() {
        assert_eq!(address_to_text(&sock("192.0.2.1:80")).as_deref(), Some("192.0.2.1"));
    }

    #[test]
    fn test_ipv6_canonical_text() {
        assert_eq!(
            address_to_text(&sock("[2001:db8:0:0:0:0:0:1]:80")).as_deref(),
            Some("2001:db8::1")
        );
    }

    #[test]
    fn test_ipv4_mapped_renders_as_ipv4() {
        assert_eq!(
            address_to_text(&sock("[::ffff:192.0.2.1]:80")).as_deref(),
            Some("192.0.2.1")
        );
    }

    #[test]
    fn test_ipv4_compatible_renders_as_ipv4() {
        assert_eq!(
            address_to_text(&sock("[::192.0.2.1]:80")).as_deref(),
            Some("192.0.2.1")
        );
        assert_eq!(address_to_text(&sock("[::1]:80")).as_deref(), Some("::1"));
        assert_eq!(address_to_text(&sock("[::]:80")).as_deref(), Some("::"));
    }

    #[test]
    fn test_text_round_trip() {
        for text in ["10.1.2.3", "0.0.0.0", "2001:db8::42", "fe80::1", "ff02::1"] {
            let addr = parse_address(text, 9000).expect("literal parses");
            let rendered = address_to_text(&addr).expect("renders");
            let reparsed = parse_address(&rendered, 9000).expect("reparses");
            assert_eq!(addr.as_socket(), reparsed.as_socket(), "round trip of {text}");
        }
    }

    #[test]
    fn test_bracketed_ipv6_literal() {
        let addr = parse_address("[::1]", 443).expect("bracketed literal");
        assert_eq!(port_of(&addr), Some(443));
    }

    #[test]
    fn test_port_of_ip_addresses() {
        assert_eq!(port_of(&sock("127.0.0.1:8080")), Some(8080));
        assert_eq!(port_of(&sock("[::1]:53")), Some(53));
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_path_text_and_unknown_port() {
        let addr = parse_address("/tmp/unisock.sock", 0).expect("unix path");
        assert_eq!(address_to_text(&addr).as_deref(), Some("/tmp/unisock.sock"));
        assert_eq!(port_of(&addr), None);
    }

    #[test]
    fn test_describe_brackets_ipv6() {
        assert_eq!(describe(&sock("[::1]:53")), "[::1]:53");
        assert_eq!(describe(&sock("[::ffff:192.0.2.1]:7")), "192.0.2.1:7");
        assert_eq!(describe(&sock("10.0.0.1:80")), "10.0.0.1:80");
    }

    #[test]
    fn test_hostname_is_not_a_literal() {
        assert!(matches!(parse_address("example.com", 80), Err(Error::Family)));
    }
}
