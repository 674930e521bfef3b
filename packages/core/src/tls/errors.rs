//! TLS adapter error types

use std::io;
use std::path::PathBuf;

/// Failures loading the server certificate-and-key file.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("cannot read credential file {}: {source}", path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no usable certificate in {}: {reason}", path.display())]
    Certificate { path: PathBuf, reason: String },
    #[error("no usable private key in {}: {reason}", path.display())]
    Key { path: PathBuf, reason: String },
    #[error("private key in {} does not match its certificate", path.display())]
    Mismatch {
        path: PathBuf,
        #[source]
        source: rustls::Error,
    },
}

/// TLS session and configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("TLS configuration rejected: {0}")]
    Config(#[from] rustls::Error),
    #[error("invalid TLS server name {0:?}")]
    InvalidServerName(String),
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] io::Error),
    #[error("TLS record I/O failed: {0}")]
    Io(#[source] io::Error),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl TlsError {
    /// Whether the failure came from the credential file.
    #[must_use]
    pub fn is_credential(&self) -> bool {
        matches!(self, TlsError::Credential(_))
    }
}
