//! Raw socket primitives
//!
//! Resolution, descriptor creation and the connect/bind/accept/listen/close
//! system calls over `socket2`. Handle state lives in [`crate::sock`].

mod bind;
mod connect;
mod lifecycle;

pub use bind::bind;
pub use connect::{connect, connect_existing};
pub use lifecycle::{accept, close, listen};

use std::io;

use socket2::Socket;

use crate::dns::{AddrInfo, Hints, ResolveError, Resolver};
use crate::error::{Error, Result};

/// Resolve candidates, treating an empty list as a name failure.
fn candidates(
    resolver: &dyn Resolver,
    host: Option<&str>,
    service: &str,
    hints: &Hints,
) -> Result<Vec<AddrInfo>> {
    let target = host.unwrap_or("*");
    match resolver.resolve(host, Some(service), hints) {
        Ok(list) if list.is_empty() => {
            sock_error!("resolve {target}:{service}: no candidates");
            Err(Error::Address(ResolveError::no_name(target)))
        }
        Ok(list) => Ok(list),
        Err(e) => {
            sock_error!("resolve {target}:{service}: {e}");
            Err(Error::Address(e))
        }
    }
}

fn open(candidate: &AddrInfo) -> io::Result<Socket> {
    let domain = candidate
        .family
        .domain()
        .ok_or_else(|| io::Error::from(io::ErrorKind::Unsupported))?;
    Socket::new(domain, candidate.socktype, candidate.protocol)
}

/// Error for a candidate list in which every attempt failed.
fn exhausted(
    operation: &'static str,
    host: Option<&str>,
    service: &str,
    last: Option<io::Error>,
) -> Error {
    let source = last.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no usable address")
    });
    sock_error!(
        "{operation} {}:{service}: every candidate failed, last error: {source}",
        host.unwrap_or("*")
    );
    Error::system(operation, source)
}

/// Map an OS failure, logging it at error severity first.
fn system(operation: &'static str, source: io::Error) -> Error {
    sock_error!("{operation}: {source}");
    Error::system(operation, source)
}
