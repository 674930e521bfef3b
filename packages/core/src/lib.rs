//! # unisock core
//!
//! One blocking socket handle over TCP, UDP, SCTP and Unix-domain sockets,
//! with optional TLS and automatic multicast membership.
//!
//! - **Address translation** between raw socket addresses and text
//! - **Raw primitives** for resolve/connect/bind/accept/listen/close
//! - **Multicast** group join at connect time and leave at close
//! - **TLS** sessions through a pluggable provider (rustls by default)
//! - **Scope-bound teardown**: dropping a [`Handle`] closes it in order
//!
//! ```no_run
//! use unisock_core::{connect, MsgFlags, Protocol, SockFlags};
//!
//! let mut handle = connect("127.0.0.1", "7", Protocol::Tcp, SockFlags::NONE)?;
//! handle.write(b"ping", None, MsgFlags::NONE)?;
//! let reply = handle.read_vec(64, None, MsgFlags::NONE)?;
//! handle.close()?;
//! # let _ = reply;
//! # Ok::<(), unisock_core::Error>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

// Logging macros are textually scoped; keep this module first.
#[macro_use]
pub mod log;

pub mod addr;
pub mod config;
pub mod context;
pub mod dns;
pub mod error;
pub mod mcast;
pub mod raw;
pub mod sctp;
pub mod sock;
pub mod tls;

pub mod prelude;

pub use crate::prelude::*;

/// Connect using the global context.
///
/// # Errors
///
/// See [`SockContext::connect`].
pub fn connect(host: &str, service: &str, protocol: Protocol, flags: SockFlags) -> Result<Handle> {
    SockContext::global().connect(host, service, protocol, flags)
}

/// Bind using the global context.
///
/// # Errors
///
/// See [`SockContext::bind`].
pub fn bind(
    host: Option<&str>,
    service: &str,
    protocol: Protocol,
    flags: SockFlags,
) -> Result<Handle> {
    SockContext::global().bind(host, service, protocol, flags)
}

/// Listen with the global context's backlog.
///
/// # Errors
///
/// See [`SockContext::listen`].
pub fn listen(handle: &Handle) -> Result<()> {
    SockContext::global().listen(handle)
}

/// Accept using the global context.
///
/// # Errors
///
/// See [`SockContext::accept`].
pub fn accept(listener: &Handle) -> Result<Handle> {
    SockContext::global().accept(listener)
}

/// Connect an existing handle using the global context.
///
/// # Errors
///
/// See [`SockContext::reconnect`].
pub fn reconnect(handle: &mut Handle, host: &str, service: &str) -> Result<()> {
    SockContext::global().reconnect(handle, host, service)
}

/// Connected pair of local datagram handles.
///
/// # Errors
///
/// `Error::System` when the OS call fails.
pub fn socketpair() -> Result<(Handle, Handle)> {
    Handle::socketpair()
}
