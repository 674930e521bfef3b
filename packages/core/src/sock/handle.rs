//! The unified socket handle
//!
//! A [`Handle`] exclusively owns its descriptor, its TLS session and its
//! multicast membership. Teardown always runs in the same order (group
//! leave, TLS shutdown, descriptor close, cache release), either through
//! [`Handle::close`] or, if the handle is simply dropped, through `Drop`.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use socket2::{Domain, SockAddr, Socket, Type};

use super::{Protocol, SockFlags};
use crate::addr::{self, describe, Family};
use crate::error::{Error, Result};
use crate::mcast::{self, Interface, Membership};
use crate::raw;
use crate::tls::TlsSession;

#[cfg(unix)]
pub type RawDescriptor = std::os::fd::RawFd;
#[cfg(windows)]
pub type RawDescriptor = std::os::windows::io::RawSocket;

/// Reported by [`Handle::raw_fd`] once the descriptor has been released.
#[cfg(unix)]
pub const INVALID_DESCRIPTOR: RawDescriptor = -1;
#[cfg(windows)]
pub const INVALID_DESCRIPTOR: RawDescriptor = RawDescriptor::MAX;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A socket of any supported protocol, optionally TLS-wrapped or joined to a
/// multicast group.
///
/// Not `Sync`: a handle is used from one thread at a time.
#[derive(Debug)]
pub struct Handle {
    id: u64,
    pub(super) socket: Option<Socket>,
    pub(super) protocol: Protocol,
    pub(super) flags: SockFlags,
    pub(super) local: Option<SockAddr>,
    pub(super) remote: Option<SockAddr>,
    local_host: OnceCell<Option<String>>,
    remote_host: OnceCell<Option<String>>,
    local_port: OnceCell<Option<u16>>,
    remote_port: OnceCell<Option<u16>>,
    pub(super) tls: Option<Box<dyn TlsSession>>,
    membership: Option<Membership>,
}

impl Handle {
    /// Wrap a descriptor; addresses are populated by the caller.
    pub(crate) fn new(
        socket: Socket,
        protocol: Protocol,
        flags: SockFlags,
        tls: Option<Box<dyn TlsSession>>,
    ) -> Self {
        Handle {
            id: NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            socket: Some(socket),
            protocol,
            flags,
            local: None,
            remote: None,
            local_host: OnceCell::new(),
            remote_host: OnceCell::new(),
            local_port: OnceCell::new(),
            remote_port: OnceCell::new(),
            tls,
            membership: None,
        }
    }

    /// Process-unique identifier used in log records (`sock#N`).
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    #[must_use]
    pub fn flags(&self) -> SockFlags {
        self.flags
    }

    /// The underlying descriptor, for OS-level options such as timeouts.
    ///
    /// `None` only while the handle is being torn down.
    #[must_use]
    pub fn as_socket(&self) -> Option<&Socket> {
        self.socket.as_ref()
    }

    #[cfg(unix)]
    #[must_use]
    pub fn raw_fd(&self) -> RawDescriptor {
        use std::os::fd::AsRawFd;
        self.socket
            .as_ref()
            .map_or(INVALID_DESCRIPTOR, AsRawFd::as_raw_fd)
    }

    #[cfg(windows)]
    #[must_use]
    pub fn raw_fd(&self) -> RawDescriptor {
        use std::os::windows::io::AsRawSocket;
        self.socket
            .as_ref()
            .map_or(INVALID_DESCRIPTOR, AsRawSocket::as_raw_socket)
    }

    #[must_use]
    pub fn local_addr(&self) -> Option<&SockAddr> {
        self.local.as_ref()
    }

    #[must_use]
    pub fn remote_addr(&self) -> Option<&SockAddr> {
        self.remote.as_ref()
    }

    /// Local host text, rendered on first access.
    #[must_use]
    pub fn local_host(&self) -> Option<&str> {
        self.local_host
            .get_or_init(|| self.local.as_ref().and_then(addr::address_to_text))
            .as_deref()
    }

    #[must_use]
    pub fn remote_host(&self) -> Option<&str> {
        self.remote_host
            .get_or_init(|| self.remote.as_ref().and_then(addr::address_to_text))
            .as_deref()
    }

    /// Local port; `None` when unknown or not an IP socket.
    #[must_use]
    pub fn local_port(&self) -> Option<u16> {
        *self
            .local_port
            .get_or_init(|| self.local.as_ref().and_then(addr::port_of))
    }

    #[must_use]
    pub fn remote_port(&self) -> Option<u16> {
        *self
            .remote_port
            .get_or_init(|| self.remote.as_ref().and_then(addr::port_of))
    }

    #[must_use]
    pub fn membership(&self) -> Option<&Membership> {
        self.membership.as_ref()
    }

    /// Order by descriptor identity.
    #[must_use]
    pub fn compare(&self, other: &Handle) -> Ordering {
        self.raw_fd().cmp(&other.raw_fd())
    }

    pub(crate) fn sock(&self) -> Result<&Socket> {
        self.socket.as_ref().ok_or_else(|| {
            Error::system("descriptor", io::Error::from(io::ErrorKind::NotConnected))
        })
    }

    pub(crate) fn populate_local(&mut self) -> Result<()> {
        let local = self.sock()?.local_addr().map_err(|e| {
            sock_error!("sock#{}: getsockname: {e}", self.id);
            Error::system("getsockname", e)
        })?;
        self.local = Some(local);
        self.local_host = OnceCell::new();
        self.local_port = OnceCell::new();
        Ok(())
    }

    pub(crate) fn populate_remote(&mut self, remote: Option<SockAddr>) -> Result<()> {
        let remote = match remote {
            Some(remote) => remote,
            None => self.sock()?.peer_addr().map_err(|e| {
                sock_error!("sock#{}: getpeername: {e}", self.id);
                Error::system("getpeername", e)
            })?,
        };
        self.set_remote(remote);
        Ok(())
    }

    fn set_remote(&mut self, remote: SockAddr) {
        self.remote = Some(remote);
        self.remote_host = OnceCell::new();
        self.remote_port = OnceCell::new();
    }

    /// Join the remote group on the default interface when the connected
    /// address is multicast.
    pub(crate) fn join_if_multicast(&mut self) -> Result<()> {
        let Some(remote) = self.remote.as_ref() else {
            return Ok(());
        };
        if self.flags.multicast_joined() || addr::is_multicast(remote) != Some(true) {
            return Ok(());
        }
        let membership = mcast::join(self.sock()?, remote, &Interface::Default)?;
        self.record_membership(membership);
        Ok(())
    }

    /// Leave the recorded group and clear the Multicast flag. A failed
    /// leave is logged; the membership is dropped either way.
    pub(crate) fn release_membership(&mut self) {
        let Some(membership) = self.membership.take() else {
            return;
        };
        if let Some(socket) = self.socket.as_ref() {
            leave_group(self.id, socket, &membership);
        }
        self.flags = self.flags.requested();
    }

    fn record_membership(&mut self, membership: Membership) {
        sock_debug!("sock#{}: joined {}", self.id, membership.group());
        self.membership = Some(membership);
        self.flags = self.flags.with_multicast();
    }

    /// Join a multicast group on a bound datagram handle (receiver side).
    ///
    /// # Errors
    ///
    /// `Error::Protocol` for non-UDP handles or a second join; otherwise as
    /// for [`mcast::join`].
    pub fn join_multicast(&mut self, group: &SockAddr, interface: &Interface) -> Result<()> {
        if self.protocol != Protocol::Udp {
            return Err(Error::protocol(self.protocol, "join_multicast"));
        }
        if self.flags.multicast_joined() {
            return Err(Error::protocol(self.protocol, "a second multicast join"));
        }
        let membership = mcast::join(self.sock()?, group, interface)?;
        self.record_membership(membership);
        Ok(())
    }

    /// Replace the cached destination of a UDP handle.
    ///
    /// # Errors
    ///
    /// `Error::Protocol` for non-UDP handles (the handle is left untouched),
    /// `Error::Family` for non-IP addresses.
    pub fn set_dest(&mut self, remote: &SockAddr) -> Result<()> {
        if self.protocol != Protocol::Udp {
            return Err(Error::protocol(self.protocol, "set_dest"));
        }
        let Some(socket_addr) = remote.as_socket() else {
            return Err(Error::Family);
        };
        sock_debug!("sock#{}: destination {}", self.id, describe(remote));
        self.set_remote(SockAddr::from(socket_addr));
        Ok(())
    }

    /// Tear the handle down and report the descriptor-close status.
    ///
    /// Every applicable step runs even when an earlier one fails; failures
    /// of the group leave and TLS shutdown are logged.
    ///
    /// # Errors
    ///
    /// `Error::System` when `close(2)` fails.
    pub fn close(mut self) -> Result<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        let Some(socket) = self.socket.take() else {
            return Ok(());
        };
        let id = self.id;

        if self.flags.multicast_joined() {
            if let Some(membership) = self.membership.take() {
                leave_group(id, &socket, &membership);
            }
        }

        if self.flags.tls_enabled() {
            if let Some(mut session) = self.tls.take() {
                sock_debug!("sock#{id}: shutting down TLS session");
                if let Err(e) = session.shutdown(&socket) {
                    sock_warn!("sock#{id}: TLS shutdown: {e}");
                }
            }
        }

        sock_debug!("sock#{id}: closing descriptor");
        let status = raw::close(socket);

        self.local_host.take();
        self.remote_host.take();
        status
    }

    /// Connected pair of Unix-domain datagram handles.
    ///
    /// # Errors
    ///
    /// `Error::System` when the OS call fails.
    pub fn socketpair() -> Result<(Handle, Handle)> {
        #[cfg(unix)]
        {
            let (a, b) = Socket::pair(Domain::UNIX, Type::DGRAM, None).map_err(|e| {
                sock_error!("socketpair: {e}");
                Error::system("socketpair", e)
            })?;
            let a = Handle::new(a, Protocol::Local, SockFlags::NONE, None);
            let b = Handle::new(b, Protocol::Local, SockFlags::NONE, None);
            sock_debug!("sock#{} and sock#{}: socket pair", a.id, b.id);
            Ok((a, b))
        }
        #[cfg(not(unix))]
        {
            Err(Error::Family)
        }
    }

    /// Family of the descriptor, from the local address.
    #[must_use]
    pub fn family(&self) -> Option<Family> {
        self.local.as_ref().and_then(Family::of)
    }

    #[cfg(test)]
    pub(crate) fn with_parts(
        socket: Socket,
        protocol: Protocol,
        flags: SockFlags,
        tls: Option<Box<dyn TlsSession>>,
        membership: Option<Membership>,
    ) -> Self {
        let mut handle = Handle::new(socket, protocol, flags, tls);
        if let Some(membership) = membership {
            handle.record_membership(membership);
        }
        handle
    }
}

fn leave_group(id: u64, socket: &Socket, membership: &Membership) {
    let group = SockAddr::from(SocketAddr::new(membership.group(), 0));
    sock_debug!("sock#{id}: leaving multicast group {}", membership.group());
    if let Err(e) = mcast::leave(socket, &group) {
        sock_warn!("sock#{id}: multicast leave: {e}");
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if self.socket.is_some() {
            if let Err(e) = self.teardown() {
                sock_warn!("sock#{}: close on drop: {e}", self.id);
            }
        }
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Handle {}

impl PartialOrd for Handle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Handle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}
