//! SCTP socket options and ancillary data
//!
//! The stream-count and event-subscription options are set on every SCTP
//! listener. Per-message `sctp_sndrcvinfo` exchange needs the `sctp`
//! feature and is Linux-only.

use socket2::Protocol;

#[cfg(target_os = "linux")]
mod linux;

/// IANA protocol number for SCTP.
pub const IPPROTO_SCTP: i32 = 132;

#[must_use]
pub fn protocol() -> Protocol {
    Protocol::from(IPPROTO_SCTP)
}

/// Per-message SCTP metadata, mirroring `struct sctp_sndrcvinfo`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SctpInfo {
    pub stream: u16,
    pub ssn: u16,
    pub flags: u16,
    pub ppid: u32,
    pub context: u32,
    pub time_to_live: u32,
    pub tsn: u32,
    pub cum_tsn: u32,
    pub assoc_id: i32,
}

/// Whether ancillary-data receive/send is compiled in.
#[must_use]
pub const fn messages_supported() -> bool {
    cfg!(all(feature = "sctp", target_os = "linux"))
}

#[cfg(target_os = "linux")]
pub(crate) use linux::configure_listener;

#[cfg(all(feature = "sctp", target_os = "linux"))]
pub(crate) use linux::{recv, send};

#[cfg(not(target_os = "linux"))]
pub(crate) fn configure_listener(
    _socket: &socket2::Socket,
    _config: &crate::config::SctpConfig,
) -> std::io::Result<()> {
    Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
}
