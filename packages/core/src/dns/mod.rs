//! Host/service resolution
//!
//! The handle layer only sees the [`Resolver`] trait. [`SystemResolver`] is
//! the default implementation; tests and embedders may substitute their own
//! through [`SockContext`](crate::SockContext).

mod error;
mod services;
mod system;
mod types;

pub use error::ResolveError;
pub use services::lookup_service;
pub use system::SystemResolver;
pub use types::{AddrInfo, Hints};

/// Name-to-address translation collaborator.
pub trait Resolver: Send + Sync + std::fmt::Debug {
    /// Produce candidate addresses in the order they should be tried.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] describing why no candidates exist.
    fn resolve(
        &self,
        host: Option<&str>,
        service: Option<&str>,
        hints: &Hints,
    ) -> Result<Vec<AddrInfo>, ResolveError>;
}
