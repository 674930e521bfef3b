use std::fmt;
use std::net::Ipv4Addr;

use crate::error::Result;

/// Interface selection for a multicast join.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Interface {
    /// Let the kernel pick (any interface).
    #[default]
    Default,
    Name(String),
    Index(u32),
}

impl Interface {
    /// Pick from optional caller inputs: index wins over name, name over
    /// the default.
    #[must_use]
    pub fn select(name: Option<&str>, index: Option<u32>) -> Self {
        match (index, name) {
            (Some(index), _) => Interface::Index(index),
            (None, Some(name)) => Interface::Name(name.to_string()),
            (None, None) => Interface::Default,
        }
    }

    /// Local IPv4 address and index of the interface.
    pub(super) fn ipv4(&self) -> Result<(Ipv4Addr, u32)> {
        match self {
            Interface::Default => Ok((Ipv4Addr::UNSPECIFIED, 0)),
            Interface::Name(name) => {
                let index = sys::index_of(name)?;
                Ok((sys::ipv4_address(name)?, index))
            }
            Interface::Index(index) => {
                let name = sys::name_of(*index)?;
                Ok((sys::ipv4_address(&name)?, *index))
            }
        }
    }

    pub(super) fn ipv6_index(&self) -> Result<u32> {
        match self {
            Interface::Default => Ok(0),
            Interface::Name(name) => sys::index_of(name),
            Interface::Index(index) => {
                // Validate before handing the index to the kernel.
                sys::name_of(*index)?;
                Ok(*index)
            }
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interface::Default => f.write_str("default interface"),
            Interface::Name(name) => write!(f, "interface {name}"),
            Interface::Index(index) => write!(f, "interface #{index}"),
        }
    }
}

#[cfg(unix)]
mod sys {
    use std::io;
    use std::net::{Ipv4Addr, SocketAddrV4};

    use nix::ifaddrs::getifaddrs;
    use nix::net::if_::{if_nameindex, if_nametoindex};

    use crate::error::{Error, Result};

    pub(super) fn index_of(name: &str) -> Result<u32> {
        if_nametoindex(name).map_err(|_| {
            sock_error!("no interface named {name}");
            Error::UnknownInterface(name.to_string())
        })
    }

    pub(super) fn name_of(index: u32) -> Result<String> {
        let interfaces = if_nameindex().map_err(|e| {
            sock_error!("interface enumeration failed: {e}");
            Error::from(e)
        })?;
        interfaces
            .iter()
            .find(|interface| interface.index() == index)
            .map(|interface| interface.name().to_string_lossy().into_owned())
            .ok_or_else(|| {
                sock_error!("no interface with index {index}");
                Error::UnknownInterface(index.to_string())
            })
    }

    /// First IPv4 address configured on the named interface.
    pub(super) fn ipv4_address(name: &str) -> Result<Ipv4Addr> {
        let addresses = getifaddrs().map_err(|e| {
            sock_error!("interface address query failed: {e}");
            Error::from(e)
        })?;
        addresses
            .filter(|entry| entry.interface_name == name)
            .find_map(|entry| {
                entry
                    .address
                    .as_ref()
                    .and_then(|storage| storage.as_sockaddr_in().copied())
                    .map(|sin| *SocketAddrV4::from(sin).ip())
            })
            .ok_or_else(|| {
                sock_error!("interface {name} has no IPv4 address");
                Error::IoControl(io::Error::from(io::ErrorKind::AddrNotAvailable))
            })
    }
}

#[cfg(not(unix))]
mod sys {
    use std::net::Ipv4Addr;

    use crate::error::{Error, Result};

    pub(super) fn index_of(name: &str) -> Result<u32> {
        Err(Error::UnknownInterface(name.to_string()))
    }

    pub(super) fn name_of(index: u32) -> Result<String> {
        Err(Error::UnknownInterface(index.to_string()))
    }

    pub(super) fn ipv4_address(name: &str) -> Result<Ipv4Addr> {
        Err(Error::UnknownInterface(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_priority() {
        assert_eq!(Interface::select(Some("eth0"), Some(2)), Interface::Index(2));
        assert_eq!(
            Interface::select(Some("eth0"), None),
            Interface::Name("eth0".into())
        );
        assert_eq!(Interface::select(None, None), Interface::Default);
    }

    #[test]
    fn test_default_interface_is_any() {
        assert_eq!(
            Interface::Default.ipv4().expect("default"),
            (Ipv4Addr::UNSPECIFIED, 0)
        );
        assert_eq!(Interface::Default.ipv6_index().expect("default"), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_loopback_lookup() {
        let interface = Interface::Name("lo".into());
        let (addr, index) = interface.ipv4().expect("loopback has an address");
        assert!(addr.is_loopback());
        assert!(index > 0);
        assert_eq!(Interface::Index(index).ipv6_index().expect("valid index"), index);
    }
}
