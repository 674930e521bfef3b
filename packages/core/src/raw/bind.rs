use socket2::Socket;

use super::{candidates, exhausted, open};
use crate::addr::describe;
use crate::config::SockConfig;
use crate::dns::{Hints, Resolver};
use crate::error::Result;
use crate::sock::Protocol;

/// Bind a fresh descriptor to the first usable passive candidate.
///
/// An absent `host` binds the wildcard address. `SO_REUSEADDR` is requested
/// when `config.reuse_address` is set; failing to apply it is only logged.
/// SCTP sockets get their stream counts and header subscription before the
/// bind call. For [`Protocol::Local`] `host` is the path to bind.
///
/// # Errors
///
/// `Error::Address` when resolution fails, `Error::System` when every
/// candidate fails.
pub fn bind(
    resolver: &dyn Resolver,
    host: Option<&str>,
    service: &str,
    protocol: Protocol,
    config: &SockConfig,
) -> Result<Socket> {
    if protocol == Protocol::Local {
        return local::bind(host);
    }

    let hints =
        Hints::passive(protocol.socket_type(), protocol.ip_protocol()).with_family(config.family);
    let mut last_error = None;
    for candidate in candidates(resolver, host, service, &hints)? {
        let target = describe(&candidate.address);
        let socket = match open(&candidate) {
            Ok(socket) => socket,
            Err(e) => {
                sock_debug!("socket for {target} failed: {e}");
                last_error = Some(e);
                continue;
            }
        };

        if config.reuse_address {
            if let Err(e) = socket.set_reuse_address(true) {
                sock_warn!("SO_REUSEADDR on {target}: {e}");
            }
        }

        if protocol == Protocol::Sctp {
            if let Err(e) = crate::sctp::configure_listener(&socket, &config.sctp) {
                sock_debug!("SCTP options on {target} failed: {e}");
                last_error = Some(e);
                continue;
            }
        }

        match socket.bind(&candidate.address) {
            Ok(()) => {
                sock_debug!("bound {target}");
                return Ok(socket);
            }
            Err(e) => {
                sock_debug!("bind {target} failed: {e}");
                last_error = Some(e);
            }
        }
    }
    Err(exhausted("bind", host, service, last_error))
}

#[cfg(unix)]
mod local {
    use socket2::{Domain, SockAddr, Socket, Type};

    use crate::dns::ResolveError;
    use crate::error::{Error, Result};
    use crate::raw::system;

    pub(super) fn bind(path: Option<&str>) -> Result<Socket> {
        let path = path.ok_or_else(|| Error::Address(ResolveError::no_name("")))?;
        let addr = SockAddr::unix(path).map_err(|e| system("unix address", e))?;
        let socket =
            Socket::new(Domain::UNIX, Type::STREAM, None).map_err(|e| system("socket", e))?;
        socket.bind(&addr).map_err(|e| system("bind", e))?;
        sock_debug!("bound {path}");
        Ok(socket)
    }
}

#[cfg(not(unix))]
mod local {
    use socket2::Socket;

    use crate::error::{Error, Result};

    pub(super) fn bind(_path: Option<&str>) -> Result<Socket> {
        Err(Error::Family)
    }
}
