//! unisock public API
//!
//! Fluent construction of [`Handle`]s: pick a protocol, optionally turn on
//! TLS or a multicast group, then `connect`, `bind` or `listen`.
//!
//! ```no_run
//! use unisock::{MsgFlags, Sock};
//!
//! let mut conn = Sock::tcp().tls().connect("127.0.0.1", "8443")?;
//! conn.write(b"hello", None, MsgFlags::NONE)?;
//! conn.close()?;
//! # Ok::<(), unisock::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;

pub use builder::*;

pub use unisock_core::{
    accept, socketpair, Error, Family, Handle, Interface, Membership, MsgFlags, Protocol,
    ProtocolData, Result, SctpInfo, SockConfig, SockContext, SockFlags, TlsConfig,
};

/// Entry point with one constructor per protocol
pub struct Sock;

impl Sock {
    #[must_use]
    pub fn tcp() -> SockBuilder {
        SockBuilder::new(Protocol::Tcp)
    }

    #[must_use]
    pub fn udp() -> SockBuilder {
        SockBuilder::new(Protocol::Udp)
    }

    /// SCTP one-to-one stream sockets
    #[must_use]
    pub fn sctp() -> SockBuilder {
        SockBuilder::new(Protocol::Sctp)
    }

    /// Unix-domain stream sockets; hosts are filesystem paths
    #[must_use]
    pub fn local() -> SockBuilder {
        SockBuilder::new(Protocol::Local)
    }
}

/// Shorthand for [`Sock::tcp`]
#[must_use]
pub fn tcp() -> SockBuilder {
    Sock::tcp()
}

/// Shorthand for [`Sock::udp`]
#[must_use]
pub fn udp() -> SockBuilder {
    Sock::udp()
}
