//! Unified socket handle
//!
//! Construction goes through [`SockContext`](crate::SockContext) (or the
//! crate-level free functions using the global context); the data path and
//! teardown live on [`Handle`] itself.

mod data;
mod flags;
mod handle;
mod io;
mod protocol;

pub use data::{MsgFlags, ProtocolData};
pub use flags::SockFlags;
pub use handle::{Handle, RawDescriptor, INVALID_DESCRIPTOR};
pub use protocol::Protocol;
