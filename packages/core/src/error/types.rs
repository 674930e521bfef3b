//! Socket layer error taxonomy
//!
//! One variant per failure class the handle layer distinguishes. OS level
//! detail stays attached as the `source` so callers can inspect errno.

use std::io;

use crate::dns::ResolveError;
use crate::sock::Protocol;
use crate::tls::TlsError;

/// A Result alias where the Err case is `unisock_core::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by every construction and data-path operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Host/service resolution failed.
    #[error("address resolution failed: {0}")]
    Address(#[from] ResolveError),

    /// An OS call failed; `source` carries the OS error code.
    #[error("{context}: {source}")]
    System {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// Unsupported or unknown address family.
    #[error("unsupported address family")]
    Family,

    /// Low-level interface query failed.
    #[error("interface query failed: {0}")]
    IoControl(#[source] io::Error),

    /// Interface name or index does not exist.
    #[error("unknown interface: {0}")]
    UnknownInterface(String),

    /// Operation is not valid for the handle's protocol.
    #[error("{operation} is not supported on {protocol} sockets")]
    Protocol {
        protocol: Protocol,
        operation: &'static str,
    },

    /// TLS handshake, record-layer or credential failure.
    #[error("TLS failure: {0}")]
    Tls(#[from] TlsError),

    /// A buffer reservation could not be satisfied.
    #[error("failed to reserve {requested} bytes")]
    Allocation { requested: usize },
}
