//! SCTP association parameters applied before `bind`

/// Values written into `SCTP_INITMSG` on SCTP listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SctpConfig {
    /// Number of outbound streams requested
    pub out_streams: u16,
    /// Maximum number of inbound streams accepted
    pub max_in_streams: u16,
    /// INIT retransmissions; 0 keeps the kernel default
    pub max_attempts: u16,
    /// INIT retransmission timeout cap in milliseconds; 0 keeps the kernel default
    pub max_init_timeout_ms: u16,
}

impl Default for SctpConfig {
    fn default() -> Self {
        Self {
            out_streams: 10,
            max_in_streams: 10,
            max_attempts: 0,
            max_init_timeout_ms: 0,
        }
    }
}
