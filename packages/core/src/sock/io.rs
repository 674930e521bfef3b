//! Data path: `read` and `write`
//!
//! TLS handles go through their session. Everything else dispatches on the
//! protocol tag.

use std::io;
use std::mem::MaybeUninit;

use socket2::Socket;

use super::{Handle, MsgFlags, Protocol, ProtocolData};
use crate::addr::describe;
use crate::error::{Error, Result};

impl Handle {
    /// Receive up to `buf.len()` bytes.
    ///
    /// UDP handles need a `ProtocolData::Datagram` slot, which receives the
    /// sender's address. SCTP handles fill a `ProtocolData::Sctp` header
    /// when one is supplied. Fewer bytes than requested may be returned.
    ///
    /// # Errors
    ///
    /// `Error::Protocol` for an invalid protocol/data combination,
    /// `Error::System` or `Error::Tls` for the underlying failure.
    pub fn read(
        &mut self,
        buf: &mut [u8],
        data: Option<&mut ProtocolData>,
        flags: MsgFlags,
    ) -> Result<usize> {
        let id = self.id();
        if self.flags.tls_enabled() {
            let socket = self.socket.as_ref();
            let (Some(socket), Some(session)) = (socket, self.tls.as_mut()) else {
                return Err(Error::protocol(self.protocol, "read before TLS negotiation"));
            };
            let n = session.read(socket, buf).map_err(|e| {
                sock_error!("sock#{id}: TLS read: {e}");
                Error::Tls(e)
            })?;
            sock_verbose!("sock#{id}: read {n} bytes (TLS)");
            return Ok(n);
        }

        let socket = self.sock()?;
        let n = match self.protocol {
            Protocol::Udp => {
                let Some(ProtocolData::Datagram(slot)) = data else {
                    return Err(Error::protocol(
                        Protocol::Udp,
                        "read without a source address slot",
                    ));
                };
                let (n, from) = socket
                    .recv_from_with_flags(uninit(buf), flags.bits())
                    .map_err(|e| os_failure(id, "recvfrom", e))?;
                sock_verbose!("sock#{id}: read {n} bytes from {}", describe(&from));
                *slot = Some(from);
                n
            }
            Protocol::Tcp | Protocol::Local | Protocol::None => {
                let n = socket
                    .recv_with_flags(uninit(buf), flags.bits())
                    .map_err(|e| os_failure(id, "recv", e))?;
                sock_verbose!("sock#{id}: read {n} bytes");
                n
            }
            Protocol::Sctp => sctp_read(id, socket, buf, data, flags)?,
        };
        Ok(n)
    }

    /// [`read`](Self::read) into a freshly allocated buffer of at most
    /// `max_len` bytes.
    ///
    /// # Errors
    ///
    /// `Error::Allocation` when the buffer cannot be reserved, otherwise as
    /// for `read`.
    pub fn read_vec(
        &mut self,
        max_len: usize,
        data: Option<&mut ProtocolData>,
        flags: MsgFlags,
    ) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if buf.try_reserve_exact(max_len).is_err() {
            sock_fatal!("sock#{}: cannot reserve {max_len} byte read buffer", self.id());
            return Err(Error::Allocation { requested: max_len });
        }
        buf.resize(max_len, 0);
        let n = self.read(&mut buf, data, flags)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Send `buf`, returning the number of bytes accepted by the OS or TLS
    /// session.
    ///
    /// UDP handles send to the address in `ProtocolData::Datagram` when
    /// given, else to the cached remote address. SCTP handles attach the
    /// supplied header or a zeroed default.
    ///
    /// # Errors
    ///
    /// `Error::Protocol` when a UDP handle has no destination,
    /// `Error::System` or `Error::Tls` for the underlying failure.
    pub fn write(
        &mut self,
        buf: &[u8],
        data: Option<&ProtocolData>,
        flags: MsgFlags,
    ) -> Result<usize> {
        let id = self.id();
        if self.flags.tls_enabled() {
            let socket = self.socket.as_ref();
            let (Some(socket), Some(session)) = (socket, self.tls.as_mut()) else {
                return Err(Error::protocol(self.protocol, "write before TLS negotiation"));
            };
            let n = session.write(socket, buf).map_err(|e| {
                sock_error!("sock#{id}: TLS write: {e}");
                Error::Tls(e)
            })?;
            sock_verbose!("sock#{id}: wrote {n} bytes (TLS)");
            return Ok(n);
        }

        let socket = self.sock()?;
        let n = match self.protocol {
            Protocol::Udp => {
                let dest = match data {
                    Some(ProtocolData::Datagram(Some(dest))) => dest,
                    Some(ProtocolData::Sctp(_)) => {
                        return Err(Error::protocol(
                            Protocol::Udp,
                            "write with an SCTP header",
                        ));
                    }
                    Some(ProtocolData::Datagram(None)) | None => self.remote.as_ref().ok_or_else(|| {
                        Error::protocol(Protocol::Udp, "write without a destination")
                    })?,
                };
                let n = socket
                    .send_to_with_flags(buf, dest, flags.bits())
                    .map_err(|e| os_failure(id, "sendto", e))?;
                sock_verbose!("sock#{id}: wrote {n} bytes to {}", describe(dest));
                n
            }
            Protocol::Tcp | Protocol::Local | Protocol::None => {
                let n = socket
                    .send_with_flags(buf, flags.bits())
                    .map_err(|e| os_failure(id, "send", e))?;
                sock_verbose!("sock#{id}: wrote {n} bytes");
                n
            }
            Protocol::Sctp => sctp_write(id, socket, buf, data, flags)?,
        };
        Ok(n)
    }
}

fn uninit(buf: &mut [u8]) -> &mut [MaybeUninit<u8>] {
    // SAFETY: `MaybeUninit<u8>` has the layout of `u8`, and the OS only
    // writes initialized bytes into the slice.
    unsafe { &mut *(buf as *mut [u8] as *mut [MaybeUninit<u8>]) }
}

fn os_failure(id: u64, call: &'static str, source: io::Error) -> Error {
    if matches!(
        source.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    ) {
        sock_debug!("sock#{id}: {call}: {source}");
    } else {
        sock_error!("sock#{id}: {call}: {source}");
    }
    Error::system(call, source)
}

#[cfg(all(feature = "sctp", target_os = "linux"))]
fn sctp_read(
    id: u64,
    socket: &Socket,
    buf: &mut [u8],
    data: Option<&mut ProtocolData>,
    flags: MsgFlags,
) -> Result<usize> {
    let info = match data {
        Some(ProtocolData::Sctp(info)) => Some(info),
        _ => None,
    };
    let n = crate::sctp::recv(socket, buf, info, flags.bits())
        .map_err(|e| os_failure(id, "recvmsg", e))?;
    sock_verbose!("sock#{id}: read {n} bytes (SCTP)");
    Ok(n)
}

#[cfg(not(all(feature = "sctp", target_os = "linux")))]
fn sctp_read(
    _id: u64,
    _socket: &Socket,
    _buf: &mut [u8],
    _data: Option<&mut ProtocolData>,
    _flags: MsgFlags,
) -> Result<usize> {
    Err(Error::protocol(Protocol::Sctp, "read"))
}

#[cfg(all(feature = "sctp", target_os = "linux"))]
fn sctp_write(
    id: u64,
    socket: &Socket,
    buf: &[u8],
    data: Option<&ProtocolData>,
    flags: MsgFlags,
) -> Result<usize> {
    let info = match data {
        Some(ProtocolData::Sctp(info)) => *info,
        _ => crate::sctp::SctpInfo::default(),
    };
    let n = crate::sctp::send(socket, buf, &info, flags.bits())
        .map_err(|e| os_failure(id, "sendmsg", e))?;
    sock_verbose!("sock#{id}: wrote {n} bytes (SCTP stream {})", info.stream);
    Ok(n)
}

#[cfg(not(all(feature = "sctp", target_os = "linux")))]
fn sctp_write(
    _id: u64,
    _socket: &Socket,
    _buf: &[u8],
    _data: Option<&ProtocolData>,
    _flags: MsgFlags,
) -> Result<usize> {
    Err(Error::protocol(Protocol::Sctp, "write"))
}
