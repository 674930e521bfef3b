//! DNS resolution error types

use std::io;

/// Resolver failure reasons
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid combination of resolution hints")]
    BadFlags,
    #[error("no address of the requested family")]
    Family,
    #[error("socket type not supported by the resolver")]
    SockType,
    #[error("name or service not known: {0}")]
    NoName(String),
    #[error("out of memory during resolution")]
    Memory,
    #[error("system error during resolution: {0}")]
    System(#[source] io::Error),
}

impl ResolveError {
    pub fn no_name(name: impl Into<String>) -> Self {
        Self::NoName(name.into())
    }
}
