pub mod constructors;
pub mod types;

pub use types::{Error, Result};

// Collaborator error types are re-exported so callers can match on them
// without reaching into the owning modules.
pub use crate::dns::ResolveError;
pub use crate::tls::{CredentialError, TlsError};
