//! Session event broadcast.
//!
//! A [`SessionChannel`] is an explicit publish/subscribe seam replacing an
//! ambient, name-based global signal. Delivery is synchronous and unbuffered:
//! an event published while nobody listens is dropped.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use gopark_session::channel::{SessionChannel, SessionEvent};
//!
//! let channel = SessionChannel::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = seen.clone();
//! let subscription = channel.subscribe(move |event| {
//!     if *event == SessionEvent::Expired {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     }
//! });
//!
//! assert_eq!(channel.raise_expired(), 1);
//! drop(subscription);
//! assert_eq!(channel.raise_expired(), 0);
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

mod event;
mod subscription;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use event::{SESSION_EXPIRED, SessionEvent};
pub use subscription::Subscription;

use crate::TRACING_TARGET_CHANNEL;

type Handler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Default)]
struct ChannelInner {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, Handler)>>,
}

impl ChannelInner {
    fn handlers(&self) -> MutexGuard<'_, Vec<(u64, Handler)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unsubscribe(&self, id: u64) -> bool {
        let mut handlers = self.handlers();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        before != handlers.len()
    }
}

/// Process-wide broadcast of [`SessionEvent`]s.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone, Default)]
pub struct SessionChannel {
    inner: Arc<ChannelInner>,
}

impl std::fmt::Debug for SessionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionChannel")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl SessionChannel {
    /// Creates a channel with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for every subsequently published event.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped or released.
    #[must_use = "dropping the subscription immediately unregisters the handler"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.handlers().push((id, Arc::new(handler)));

        tracing::trace!(
            target: TRACING_TARGET_CHANNEL,
            subscription_id = id,
            "listener registered"
        );

        Subscription::new(id, Arc::downgrade(&self.inner))
    }

    /// Delivers `event` to every registered handler, returning how many ran.
    ///
    /// Handlers run outside the registry lock, so they may subscribe,
    /// unsubscribe, or publish themselves.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let handlers: Vec<Handler> = self
            .inner
            .handlers()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        if handlers.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET_CHANNEL,
                event = event.name(),
                "event dropped: no listeners"
            );
            return 0;
        }

        for handler in &handlers {
            handler(&event);
        }

        tracing::debug!(
            target: TRACING_TARGET_CHANNEL,
            event = event.name(),
            listeners = handlers.len(),
            "event delivered"
        );

        handlers.len()
    }

    /// Raises the session-expired signal.
    pub fn raise_expired(&self) -> usize {
        self.publish(SessionEvent::Expired)
    }

    /// Returns the number of registered handlers.
    pub fn listener_count(&self) -> usize {
        self.inner.handlers().len()
    }
}
