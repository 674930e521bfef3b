//! Multicast group membership
//!
//! [`join`] records what it joined in a [`Membership`] so the handle can
//! leave the group at teardown. [`leave`] always drops the any-interface
//! membership regardless of the interface used to join.

mod interface;

pub use interface::Interface;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use socket2::{SockAddr, Socket};

use crate::error::{Error, Result};

/// A joined group, tagged by address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    V4 {
        group: Ipv4Addr,
        interface_addr: Ipv4Addr,
        interface_index: u32,
    },
    V6 {
        group: Ipv6Addr,
        interface_addr: Ipv6Addr,
        interface_index: u32,
    },
}

impl Membership {
    #[must_use]
    pub fn group(&self) -> IpAddr {
        match *self {
            Membership::V4 { group, .. } => IpAddr::V4(group),
            Membership::V6 { group, .. } => IpAddr::V6(group),
        }
    }

    #[must_use]
    pub fn interface_index(&self) -> u32 {
        match *self {
            Membership::V4 {
                interface_index, ..
            }
            | Membership::V6 {
                interface_index, ..
            } => interface_index,
        }
    }
}

/// Join the group in `group` on the selected interface.
///
/// # Errors
///
/// - `Error::Family` when `group` is not IPv4/IPv6
/// - `Error::UnknownInterface` when the name or index does not exist
/// - `Error::IoControl` when the interface address query fails
/// - `Error::System` when the add-membership option is rejected
pub fn join(socket: &Socket, group: &SockAddr, interface: &Interface) -> Result<Membership> {
    let Some(group) = group.as_socket().map(|addr| addr.ip()) else {
        sock_error!("multicast join: unsupported family");
        return Err(Error::Family);
    };

    let membership = match group {
        IpAddr::V4(group) => {
            let (interface_addr, interface_index) = interface.ipv4()?;
            socket
                .join_multicast_v4(&group, &interface_addr)
                .map_err(|e| report("IP_ADD_MEMBERSHIP", e))?;
            Membership::V4 {
                group,
                interface_addr,
                interface_index,
            }
        }
        IpAddr::V6(group) => {
            let interface_index = interface.ipv6_index()?;
            socket
                .join_multicast_v6(&group, interface_index)
                .map_err(|e| report("IPV6_ADD_MEMBERSHIP", e))?;
            Membership::V6 {
                group,
                interface_addr: Ipv6Addr::UNSPECIFIED,
                interface_index,
            }
        }
    };
    sock_debug!("joined {} via {interface}", membership.group());
    Ok(membership)
}

/// Drop the any-interface membership for `group`.
///
/// # Errors
///
/// `Error::Family` for non-IP addresses, `Error::System` when the
/// drop-membership option is rejected.
pub fn leave(socket: &Socket, group: &SockAddr) -> Result<()> {
    match group.as_socket().map(|addr| addr.ip()) {
        Some(IpAddr::V4(group)) => socket
            .leave_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)
            .map_err(|e| report("IP_DROP_MEMBERSHIP", e)),
        Some(IpAddr::V6(group)) => socket
            .leave_multicast_v6(&group, 0)
            .map_err(|e| report("IPV6_DROP_MEMBERSHIP", e)),
        None => Err(Error::Family),
    }
}

fn report(option: &'static str, source: std::io::Error) -> Error {
    sock_error!("{option}: {source}");
    Error::system(option, source)
}
