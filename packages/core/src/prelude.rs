//! Types most callers need

pub use crate::addr::{address_to_text, is_multicast, parse_address, port_of, Family};
pub use crate::config::{SctpConfig, SockConfig, TlsConfig};
pub use crate::context::{SockContext, SockContextBuilder};
pub use crate::dns::{Resolver, SystemResolver};
pub use crate::error::{CredentialError, Error, ResolveError, Result, TlsError};
pub use crate::log::{Level, LogSink};
pub use crate::mcast::{Interface, Membership};
pub use crate::sctp::SctpInfo;
pub use crate::sock::{Handle, MsgFlags, Protocol, ProtocolData, SockFlags};
pub use crate::tls::{RustlsProvider, TlsProvider, TlsSession};
