//! Error constructors and classification helpers

use std::io;

use super::types::Error;
use crate::sock::Protocol;

impl Error {
    /// Wrap an OS failure with the name of the call that produced it.
    #[must_use]
    pub fn system(context: &'static str, source: io::Error) -> Self {
        Error::System { context, source }
    }

    #[must_use]
    pub fn protocol(protocol: Protocol, operation: &'static str) -> Self {
        Error::Protocol {
            protocol,
            operation,
        }
    }

    /// Raw OS error code for `System` and `IoControl` failures.
    #[must_use]
    pub fn os_error(&self) -> Option<i32> {
        match self {
            Error::System { source, .. } | Error::IoControl(source) => source.raw_os_error(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol { .. })
    }

    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self, Error::Tls(_))
    }

    /// Whether the underlying OS call would have blocked on a non-blocking
    /// descriptor or hit a configured socket timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::System { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

#[cfg(unix)]
impl From<nix::Error> for Error {
    fn from(err: nix::Error) -> Self {
        Error::IoControl(io::Error::from(err))
    }
}
