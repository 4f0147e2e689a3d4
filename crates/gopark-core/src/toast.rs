//! Ephemeral notification queue.
//!
//! Toasts are appended at the tail and may be removed from any position, either
//! by the user dismissing one or by their auto-dismiss deadline passing.

use std::collections::VecDeque;
use std::time::Duration;

use derive_more::{Display, From};
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};

use crate::TRACING_TARGET_TOAST;

/// Unique identifier of a toast within its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Display, From, Serialize, Deserialize)]
pub struct ToastId(u64);

impl ToastId {
    /// Returns the raw identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Severity class of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, IntoStaticStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Auto-dismiss duration used when none is given explicitly.
    ///
    /// Errors stay until dismissed.
    pub const fn default_duration(self) -> Option<Duration> {
        match self {
            Self::Info | Self::Success => Some(Duration::from_secs(3)),
            Self::Warning => Some(Duration::from_secs(5)),
            Self::Error => None,
        }
    }
}

/// A single notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    pub severity: Severity,
    pub message: String,
    pub duration: Option<Duration>,
    pub created_at: Timestamp,
}

impl Toast {
    /// Returns `true` once the auto-dismiss deadline has passed at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        let Some(duration) = self.duration else {
            return false;
        };

        match SignedDuration::try_from(duration) {
            Ok(limit) => now.duration_since(self.created_at) >= limit,
            Err(_) => false,
        }
    }
}

/// Ordered queue of toasts with monotonically increasing ids.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    last_id: u64,
}

impl ToastQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a toast with the severity's default duration.
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> ToastId {
        self.push_for(severity, message, severity.default_duration())
    }

    /// Appends a toast with an explicit auto-dismiss duration.
    pub fn push_for(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> ToastId {
        self.push_at(severity, message, duration, Timestamp::now())
    }

    /// Appends a toast created at the given instant.
    pub fn push_at(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        duration: Option<Duration>,
        created_at: Timestamp,
    ) -> ToastId {
        self.last_id += 1;
        let id = ToastId(self.last_id);

        tracing::trace!(
            target: TRACING_TARGET_TOAST,
            toast_id = %id,
            severity = severity.as_ref(),
            "toast queued"
        );

        self.toasts.push_back(Toast {
            id,
            severity,
            message: message.into(),
            duration,
            created_at,
        });

        id
    }

    /// Removes the toast with the given id, wherever it sits in the queue.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let Some(index) = self.toasts.iter().position(|toast| toast.id == id) else {
            return false;
        };

        self.toasts.remove(index);
        true
    }

    /// Removes every toast whose deadline has passed at `now`.
    pub fn expire(&mut self, now: Timestamp) -> Vec<ToastId> {
        let mut expired = Vec::new();
        self.toasts.retain(|toast| {
            if toast.is_expired_at(now) {
                expired.push(toast.id);
                false
            } else {
                true
            }
        });

        if !expired.is_empty() {
            tracing::trace!(
                target: TRACING_TARGET_TOAST,
                count = expired.len(),
                "toasts expired"
            );
        }

        expired
    }

    /// Iterates toasts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Returns the most recently queued toast.
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    /// Returns the number of queued toasts.
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Returns `true` when no toast is queued.
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(queue: &ToastQueue) -> Vec<u64> {
        queue.iter().map(|toast| toast.id.get()).collect()
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut queue = ToastQueue::new();
        let a = queue.push(Severity::Info, "a");
        let b = queue.push(Severity::Error, "b");
        queue.dismiss(b);
        let c = queue.push(Severity::Success, "c");

        assert!(a < b);
        assert!(b < c);
        assert_eq!(c.get(), 3);
    }

    #[test]
    fn test_dismiss_from_middle_keeps_order() {
        let mut queue = ToastQueue::new();
        queue.push(Severity::Info, "first");
        let middle = queue.push(Severity::Warning, "second");
        queue.push(Severity::Info, "third");

        assert!(queue.dismiss(middle));
        assert_eq!(ids(&queue), vec![1, 3]);
        assert!(!queue.dismiss(middle));
    }

    #[test]
    fn test_expire_respects_deadlines() {
        let start = Timestamp::from_second(1_700_000_000).unwrap();
        let mut queue = ToastQueue::new();
        let short = queue.push_at(Severity::Info, "short", Some(Duration::from_secs(3)), start);
        queue.push_at(Severity::Warning, "long", Some(Duration::from_secs(10)), start);
        queue.push_at(Severity::Error, "sticky", None, start);

        let later = start.checked_add(SignedDuration::from_secs(5)).unwrap();
        assert_eq!(queue.expire(later), vec![short]);
        assert_eq!(ids(&queue), vec![2, 3]);

        let much_later = start.checked_add(SignedDuration::from_secs(3600)).unwrap();
        assert_eq!(queue.expire(much_later).len(), 1);
        assert_eq!(ids(&queue), vec![3]);
    }

    #[test]
    fn test_error_toasts_do_not_auto_dismiss() {
        assert_eq!(Severity::Error.default_duration(), None);
        assert!(Severity::Info.default_duration().is_some());
    }
}
