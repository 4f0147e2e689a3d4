//! Subscription handles.

use std::sync::Weak;

use super::ChannelInner;
use crate::TRACING_TARGET_CHANNEL;

/// Registration of a handler on a [`SessionChannel`](super::SessionChannel).
///
/// Dropping the handle unregisters the handler, so a component that owns its
/// subscription can never leave a dangling listener behind.
pub struct Subscription {
    id: u64,
    channel: Weak<ChannelInner>,
}

impl Subscription {
    pub(super) fn new(id: u64, channel: Weak<ChannelInner>) -> Self {
        Self { id, channel }
    }

    /// Returns the subscription identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns `true` while the handler is still registered.
    pub fn is_active(&self) -> bool {
        self.channel.upgrade().is_some_and(|inner| {
            inner
                .handlers()
                .iter()
                .any(|(handler_id, _)| *handler_id == self.id)
        })
    }

    /// Unregisters the handler now, returning whether it was still registered.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        let Some(inner) = self.channel.upgrade() else {
            return false;
        };
        self.channel = Weak::new();

        let removed = inner.unsubscribe(self.id);
        if removed {
            tracing::trace!(
                target: TRACING_TARGET_CHANNEL,
                subscription_id = self.id,
                "listener released"
            );
        }
        removed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
