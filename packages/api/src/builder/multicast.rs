//! Receiver-side multicast group selection

use unisock_core::Interface;

use super::core::GroupJoin;
use super::SockBuilder;

impl SockBuilder {
    /// Join `group` (an IP literal) on the default interface after `bind`.
    #[must_use]
    pub fn multicast_group(self, group: impl Into<String>) -> Self {
        self.multicast_group_on(group, Interface::Default)
    }

    /// Join `group` on a specific interface after `bind`.
    #[must_use]
    pub fn multicast_group_on(mut self, group: impl Into<String>, interface: Interface) -> Self {
        self.group = Some(GroupJoin {
            group: group.into(),
            interface,
        });
        self
    }
}
