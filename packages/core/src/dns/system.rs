//! Resolver backed by the platform name service
//!
//! IP literals take a fast path without any lookup; names go through
//! `ToSocketAddrs`, which delegates to the system `getaddrinfo`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};

use socket2::{Protocol, SockAddr, Type};

use super::{lookup_service, AddrInfo, Hints, ResolveError, Resolver};
use crate::addr::Family;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl SystemResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for SystemResolver {
    fn resolve(
        &self,
        host: Option<&str>,
        service: Option<&str>,
        hints: &Hints,
    ) -> Result<Vec<AddrInfo>, ResolveError> {
        if hints.family == Some(Family::Local) {
            return Err(ResolveError::Family);
        }
        let socktypes = socket_types(hints.socktype)?;
        let port = resolve_port(service, hints.socktype, hints.protocol)?;
        let ips = resolve_host(host, port, hints)?;

        let mut out = Vec::with_capacity(ips.len() * socktypes.len());
        for ip in ips {
            let family = match ip {
                IpAddr::V4(_) => Family::Inet,
                IpAddr::V6(_) => Family::Inet6,
            };
            for &socktype in &socktypes {
                out.push(AddrInfo {
                    family,
                    socktype,
                    protocol: hints.protocol.or_else(|| default_protocol(socktype)),
                    address: SockAddr::from(SocketAddr::new(ip, port)),
                });
            }
        }
        Ok(out)
    }
}

fn socket_types(hint: Option<Type>) -> Result<Vec<Type>, ResolveError> {
    match hint {
        None => Ok(vec![Type::STREAM, Type::DGRAM]),
        Some(t) if t == Type::STREAM || t == Type::DGRAM => Ok(vec![t]),
        #[cfg(not(target_os = "redox"))]
        Some(t) if t == Type::SEQPACKET => Ok(vec![t]),
        Some(_) => Err(ResolveError::SockType),
    }
}

fn default_protocol(socktype: Type) -> Option<Protocol> {
    if socktype == Type::STREAM {
        Some(Protocol::TCP)
    } else if socktype == Type::DGRAM {
        Some(Protocol::UDP)
    } else {
        None
    }
}

fn service_protocol(socktype: Option<Type>, protocol: Option<Protocol>) -> &'static str {
    if protocol == Some(Protocol::UDP) || socktype == Some(Type::DGRAM) {
        "udp"
    } else if protocol.is_some_and(|p| p != Protocol::TCP && p != Protocol::UDP) {
        "sctp"
    } else {
        "tcp"
    }
}

fn resolve_port(
    service: Option<&str>,
    socktype: Option<Type>,
    protocol: Option<Protocol>,
) -> Result<u16, ResolveError> {
    let Some(service) = service.filter(|s| !s.is_empty()) else {
        return Ok(0);
    };
    if let Ok(port) = service.parse::<u16>() {
        return Ok(port);
    }
    let proto = service_protocol(socktype, protocol);
    lookup_service(service, proto)
        .or_else(|| {
            // Most databases only list SCTP services under tcp.
            (proto == "sctp").then(|| lookup_service(service, "tcp")).flatten()
        })
        .ok_or_else(|| ResolveError::no_name(format!("{service}/{proto}")))
}

fn resolve_host(host: Option<&str>, port: u16, hints: &Hints) -> Result<Vec<IpAddr>, ResolveError> {
    let Some(host) = host.filter(|h| !h.is_empty()) else {
        if !hints.passive {
            return Err(ResolveError::no_name("no host given for an active lookup"));
        }
        return Ok(match hints.family {
            Some(Family::Inet) => vec![IpAddr::V4(Ipv4Addr::UNSPECIFIED)],
            Some(Family::Inet6) => vec![IpAddr::V6(Ipv6Addr::UNSPECIFIED)],
            _ => vec![
                IpAddr::V6(Ipv6Addr::UNSPECIFIED),
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ],
        });
    };

    // Fast path for IP addresses - avoid a name service lookup
    let literal = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if let Ok(ip) = literal.parse::<IpAddr>() {
        return if family_matches(ip, hints.family) {
            Ok(vec![ip])
        } else {
            Err(ResolveError::Family)
        };
    }

    let resolved = (host, port).to_socket_addrs().map_err(|e| {
        if e.raw_os_error().is_some() {
            ResolveError::System(e)
        } else {
            ResolveError::no_name(host)
        }
    })?;

    let mut ips: Vec<IpAddr> = Vec::new();
    for socket in resolved {
        let ip = socket.ip();
        if family_matches(ip, hints.family) && !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    if ips.is_empty() {
        return Err(ResolveError::Family);
    }
    Ok(ips)
}

fn family_matches(ip: IpAddr, family: Option<Family>) -> bool {
    match family {
        None => true,
        Some(Family::Inet) => ip.is_ipv4(),
        Some(Family::Inet6) => ip.is_ipv6(),
        Some(Family::Local) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passive_wildcard_for_ipv4_hint() {
        let hints = Hints::passive(Some(Type::STREAM), Some(Protocol::TCP))
            .with_family(Some(Family::Inet));
        let addrs = SystemResolver::new()
            .resolve(None, Some("0"), &hints)
            .expect("passive lookup resolves");
        assert_eq!(addrs.len(), 1);
        assert_eq!(
            addrs[0].address.as_socket(),
            Some(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
        );
    }

    #[test]
    fn test_passive_unspecified_family_prefers_ipv6() {
        let hints = Hints::passive(Some(Type::DGRAM), None);
        let addrs = SystemResolver::new()
            .resolve(None, Some("5004"), &hints)
            .expect("passive lookup resolves");
        assert_eq!(addrs.len(), 2);
        assert_eq!(addrs[0].family, Family::Inet6);
        assert_eq!(addrs[1].family, Family::Inet);
        assert_eq!(addrs[0].protocol, Some(Protocol::UDP));
    }

    #[test]
    fn test_active_lookup_requires_host() {
        let hints = Hints::active(Some(Type::STREAM), None);
        let err = SystemResolver::new()
            .resolve(None, Some("80"), &hints)
            .expect_err("active lookup without host fails");
        assert!(matches!(err, ResolveError::NoName(_)));
    }

    #[test]
    fn test_literal_with_wrong_family() {
        let hints = Hints::active(Some(Type::STREAM), None).with_family(Some(Family::Inet6));
        let err = SystemResolver::new()
            .resolve(Some("127.0.0.1"), Some("80"), &hints)
            .expect_err("family mismatch");
        assert!(matches!(err, ResolveError::Family));
    }

    #[test]
    fn test_unknown_service_name() {
        let hints = Hints::active(Some(Type::STREAM), None);
        let err = SystemResolver::new()
            .resolve(Some("127.0.0.1"), Some("no-such-service-here"), &hints)
            .expect_err("unknown service");
        assert!(matches!(err, ResolveError::NoName(_)));
    }

    #[test]
    fn test_unspecified_socktype_yields_stream_and_datagram() {
        let addrs = SystemResolver::new()
            .resolve(Some("::1"), Some("7"), &Hints::default())
            .expect("literal resolves");
        let types: Vec<Type> = addrs.iter().map(|a| a.socktype).collect();
        assert_eq!(types, vec![Type::STREAM, Type::DGRAM]);
    }

    #[test]
    fn test_raw_socktype_rejected() {
        let hints = Hints::active(Some(Type::RAW), None);
        let err = SystemResolver::new()
            .resolve(Some("127.0.0.1"), None, &hints)
            .expect_err("raw sockets unsupported");
        assert!(matches!(err, ResolveError::SockType));
    }
}
