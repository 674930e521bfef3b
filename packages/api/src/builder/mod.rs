//! Socket builder modules
//!
//! [`SockBuilder`] collects the protocol, TLS mode, context and multicast
//! options; the terminal methods construct the handle.

pub mod core;
pub mod methods;
pub mod multicast;
pub mod tls;

pub use self::core::*;
