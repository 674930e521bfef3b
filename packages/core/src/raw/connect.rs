use socket2::Socket;

use super::{candidates, exhausted, open};
use crate::addr::{describe, Family};
use crate::dns::{Hints, Resolver};
use crate::error::Result;
use crate::sock::Protocol;

/// Connect a fresh descriptor to the first reachable candidate.
///
/// For [`Protocol::Local`] `host` is a filesystem path and `service` is
/// ignored.
///
/// # Errors
///
/// `Error::Address` when resolution fails, `Error::System` when every
/// candidate fails.
pub fn connect(
    resolver: &dyn Resolver,
    host: &str,
    service: &str,
    protocol: Protocol,
    family: Option<Family>,
) -> Result<Socket> {
    if protocol == Protocol::Local {
        return local::connect(host);
    }

    let hints = Hints::active(protocol.socket_type(), protocol.ip_protocol()).with_family(family);
    let mut last_error = None;
    for candidate in candidates(resolver, Some(host), service, &hints)? {
        let target = describe(&candidate.address);
        let attempt = open(&candidate)
            .and_then(|socket| socket.connect(&candidate.address).map(|()| socket));
        match attempt {
            Ok(socket) => {
                sock_debug!("connected to {target}");
                return Ok(socket);
            }
            Err(e) => {
                sock_debug!("connect to {target} failed: {e}");
                last_error = Some(e);
            }
        }
    }
    Err(exhausted("connect", Some(host), service, last_error))
}

/// Connect an already-open descriptor, keeping its address family.
///
/// # Errors
///
/// As for [`connect`].
pub fn connect_existing(
    socket: &Socket,
    resolver: &dyn Resolver,
    host: &str,
    service: &str,
    protocol: Protocol,
) -> Result<()> {
    if protocol == Protocol::Local {
        return local::connect_existing(socket, host);
    }

    let family = socket
        .local_addr()
        .ok()
        .and_then(|addr| Family::of(&addr));
    let hints = Hints::active(protocol.socket_type(), protocol.ip_protocol()).with_family(family);
    let mut last_error = None;
    for candidate in candidates(resolver, Some(host), service, &hints)? {
        let target = describe(&candidate.address);
        match socket.connect(&candidate.address) {
            Ok(()) => {
                sock_debug!("reconnected to {target}");
                return Ok(());
            }
            Err(e) => {
                sock_debug!("connect to {target} failed: {e}");
                last_error = Some(e);
            }
        }
    }
    Err(exhausted("connect", Some(host), service, last_error))
}

#[cfg(unix)]
mod local {
    use socket2::{Domain, SockAddr, Socket, Type};

    use crate::error::Result;
    use crate::raw::system;

    pub(super) fn connect(path: &str) -> Result<Socket> {
        let socket =
            Socket::new(Domain::UNIX, Type::STREAM, None).map_err(|e| system("socket", e))?;
        connect_existing(&socket, path)?;
        Ok(socket)
    }

    pub(super) fn connect_existing(socket: &Socket, path: &str) -> Result<()> {
        let addr = SockAddr::unix(path).map_err(|e| system("unix address", e))?;
        socket.connect(&addr).map_err(|e| system("connect", e))?;
        sock_debug!("connected to {path}");
        Ok(())
    }
}

#[cfg(not(unix))]
mod local {
    use socket2::Socket;

    use crate::error::{Error, Result};

    pub(super) fn connect(_path: &str) -> Result<Socket> {
        Err(Error::Family)
    }

    pub(super) fn connect_existing(_socket: &Socket, _path: &str) -> Result<()> {
        Err(Error::Family)
    }
}
