//! Core `SockBuilder` structure

use std::fmt;
use std::sync::Arc;

use unisock_core::{Interface, Protocol, SockContext, SockFlags};

/// Group to join once a datagram handle is bound.
#[derive(Debug, Clone)]
pub(crate) struct GroupJoin {
    pub(crate) group: String,
    pub(crate) interface: Interface,
}

/// Fluent builder for a [`Handle`](unisock_core::Handle)
#[derive(Clone)]
pub struct SockBuilder {
    pub(crate) protocol: Protocol,
    pub(crate) flags: SockFlags,
    /// Context used by the terminal methods; the global one when unset
    pub(crate) context: Option<Arc<SockContext>>,
    pub(crate) group: Option<GroupJoin>,
    pub(crate) debug_enabled: bool,
}

impl SockBuilder {
    #[must_use]
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            flags: SockFlags::NONE,
            context: None,
            group: None,
            debug_enabled: false,
        }
    }

    /// Use an explicit context instead of the global one.
    #[must_use]
    pub fn context(mut self, context: Arc<SockContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Trace each construction step through `tracing`.
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    #[must_use]
    pub fn flags(&self) -> SockFlags {
        self.flags
    }

    pub(crate) fn resolve_context(&self) -> Arc<SockContext> {
        self.context.clone().unwrap_or_else(SockContext::global)
    }
}

impl fmt::Debug for SockBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SockBuilder")
            .field("protocol", &self.protocol)
            .field("flags", &self.flags)
            .field("custom_context", &self.context.is_some())
            .field("group", &self.group)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = SockBuilder::new(Protocol::Udp);
        assert_eq!(builder.protocol(), Protocol::Udp);
        assert_eq!(builder.flags(), SockFlags::NONE);
        assert!(builder.context.is_none());
    }
}
