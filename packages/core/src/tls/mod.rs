//! TLS session adapter
//!
//! A [`TlsProvider`] turns a connected descriptor into an established
//! [`TlsSession`]. The handle only talks to these traits; the default
//! implementation is [`RustlsProvider`].

mod credentials;
mod errors;
mod provider;
mod session;
mod verifier;

pub use credentials::{load_server_credential, ServerCredential};
pub use errors::{CredentialError, TlsError};
pub use provider::RustlsProvider;

use std::fmt::Debug;

use socket2::Socket;

/// Established TLS session over a descriptor owned by the caller.
///
/// Every call receives the descriptor the session was negotiated on.
pub trait TlsSession: Send + Debug {
    /// Read decrypted bytes; `Ok(0)` after the peer's close notification.
    ///
    /// # Errors
    ///
    /// Record-layer or socket failure.
    fn read(&mut self, socket: &Socket, buf: &mut [u8]) -> Result<usize, TlsError>;

    /// Encrypt and send `buf`, returning the plaintext bytes accepted.
    ///
    /// # Errors
    ///
    /// Record-layer or socket failure.
    fn write(&mut self, socket: &Socket, buf: &[u8]) -> Result<usize, TlsError>;

    /// Send the close notification and flush it.
    ///
    /// # Errors
    ///
    /// Socket failure while flushing.
    fn shutdown(&mut self, socket: &Socket) -> Result<(), TlsError>;
}

/// Negotiates client and server sessions.
pub trait TlsProvider: Send + Sync + Debug {
    /// Drive a client handshake. `strict` verifies the peer certificate.
    ///
    /// # Errors
    ///
    /// Any configuration or handshake failure.
    fn client(
        &self,
        socket: &Socket,
        server_name: &str,
        strict: bool,
    ) -> Result<Box<dyn TlsSession>, TlsError>;

    /// Drive a server handshake with the configured credential.
    ///
    /// # Errors
    ///
    /// Credential, configuration or handshake failure.
    fn server(&self, socket: &Socket) -> Result<Box<dyn TlsSession>, TlsError>;
}
