//! Client-side navigation seam.
//!
//! Routing itself belongs to the host application; the session layer only
//! needs to push or replace a destination.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// How a navigation affects history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NavigationMode {
    /// Appends a history entry.
    Push,
    /// Replaces the current entry, so the previous page cannot be returned to.
    Replace,
}

/// A navigation that was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub path: String,
    pub mode: NavigationMode,
}

/// Destination router used by guards and logout.
pub trait Navigator: Send + Sync {
    /// Navigates to `path`.
    fn navigate(&self, path: &str, mode: NavigationMode);

    /// Returns the path currently displayed.
    fn current_path(&self) -> String;

    /// Pushes `path` onto history.
    fn push(&self, path: &str) {
        self.navigate(path, NavigationMode::Push);
    }

    /// Replaces the current history entry with `path`.
    fn replace(&self, path: &str) {
        self.navigate(path, NavigationMode::Replace);
    }
}

#[derive(Debug, Default)]
struct History {
    entries: Vec<String>,
    issued: Vec<Navigation>,
}

/// In-memory history stack.
///
/// Records every navigation it receives so callers can report where a
/// session flow ended up.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<History>,
}

impl HistoryNavigator {
    /// Creates a history positioned at `start`.
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(History {
                entries: vec![start.into()],
                issued: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current path.
    pub fn current(&self) -> String {
        self.lock().entries.last().cloned().unwrap_or_default()
    }

    /// Returns the history entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().entries.clone()
    }

    /// Returns every navigation issued so far, in order.
    pub fn navigations(&self) -> Vec<Navigation> {
        self.lock().issued.clone()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str, mode: NavigationMode) {
        let mut history = self.lock();
        match mode {
            NavigationMode::Push => history.entries.push(path.to_owned()),
            NavigationMode::Replace => match history.entries.last_mut() {
                Some(current) => *current = path.to_owned(),
                None => history.entries.push(path.to_owned()),
            },
        }

        history.issued.push(Navigation {
            path: path.to_owned(),
            mode,
        });
    }

    fn current_path(&self) -> String {
        self.current()
    }
}
