//! Per-call protocol data and OS message flags

use std::ops::BitOr;

use socket2::SockAddr;

use crate::sctp::SctpInfo;

/// Protocol-specific side channel for `read`/`write`.
#[derive(Debug, Clone)]
pub enum ProtocolData {
    /// UDP peer address: filled in by `read`, used as destination by `write`
    /// (the cached remote address when `None`).
    Datagram(Option<SockAddr>),
    /// SCTP per-message header
    Sctp(SctpInfo),
}

impl ProtocolData {
    /// Empty source-address slot for a datagram receive.
    #[must_use]
    pub fn datagram() -> Self {
        ProtocolData::Datagram(None)
    }

    #[must_use]
    pub fn peer(&self) -> Option<&SockAddr> {
        match self {
            ProtocolData::Datagram(addr) => addr.as_ref(),
            ProtocolData::Sctp(_) => None,
        }
    }
}

/// Flags passed through to the OS send/receive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MsgFlags(i32);

impl MsgFlags {
    pub const NONE: MsgFlags = MsgFlags(0);
    #[cfg(unix)]
    pub const PEEK: MsgFlags = MsgFlags(libc::MSG_PEEK);
    #[cfg(unix)]
    pub const WAIT_ALL: MsgFlags = MsgFlags(libc::MSG_WAITALL);
    #[cfg(unix)]
    pub const DONT_WAIT: MsgFlags = MsgFlags(libc::MSG_DONTWAIT);

    #[must_use]
    pub const fn from_bits(bits: i32) -> Self {
        MsgFlags(bits)
    }

    #[must_use]
    pub const fn bits(self) -> i32 {
        self.0
    }
}

impl BitOr for MsgFlags {
    type Output = MsgFlags;

    fn bitor(self, rhs: MsgFlags) -> MsgFlags {
        MsgFlags(self.0 | rhs.0)
    }
}
