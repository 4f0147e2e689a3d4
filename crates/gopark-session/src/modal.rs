//! Session-expired modal.
//!
//! A blocking notice opened by the [`SessionEvent::Expired`] signal. It cannot
//! be dismissed; the only way out is acknowledging it, which logs out to the
//! login route and keeps the remembered login.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strum::{AsRefStr, Display};

use crate::TRACING_TARGET_LOGOUT;
use crate::channel::{SessionChannel, SessionEvent, Subscription};
use crate::logout::{LogoutCoordinator, LogoutOptions, LogoutReport};

/// Visibility of the modal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ModalPhase {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Default)]
struct ModalState {
    phase: ModalPhase,
    times_opened: u64,
    ignored_raises: u64,
}

/// Listener that blocks the interface once the session has expired.
///
/// The channel subscription lives exactly as long as the modal.
pub struct SessionExpiredModal {
    state: Arc<Mutex<ModalState>>,
    coordinator: LogoutCoordinator,
    _subscription: Subscription,
}

impl std::fmt::Debug for SessionExpiredModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionExpiredModal")
            .field("state", &*lock(&self.state))
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<ModalState>) -> MutexGuard<'_, ModalState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionExpiredModal {
    /// Attaches a closed modal to `channel`.
    pub fn attach(channel: &SessionChannel, coordinator: LogoutCoordinator) -> Self {
        let state = Arc::new(Mutex::new(ModalState::default()));

        let listener = state.clone();
        let subscription = channel.subscribe(move |event| {
            if *event == SessionEvent::Expired {
                open(&listener);
            }
        });

        Self {
            state,
            coordinator,
            _subscription: subscription,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> ModalPhase {
        lock(&self.state).phase
    }

    /// Returns `true` while the modal blocks the interface.
    pub fn is_open(&self) -> bool {
        self.phase() == ModalPhase::Open
    }

    /// Returns how many times the modal went from closed to open.
    pub fn times_opened(&self) -> u64 {
        lock(&self.state).times_opened
    }

    /// Returns how many raises arrived while the modal was already open.
    pub fn ignored_raises(&self) -> u64 {
        lock(&self.state).ignored_raises
    }

    /// Attempts to close the modal without logging out.
    ///
    /// Always refused while open. Returns `true` only when there was nothing
    /// to dismiss.
    pub fn dismiss(&self) -> bool {
        if self.is_open() {
            tracing::debug!(target: TRACING_TARGET_LOGOUT, "modal dismissal refused");
            return false;
        }
        true
    }

    /// Logs out to the login route and closes the modal.
    ///
    /// Returns `None` when the modal was not open.
    pub fn acknowledge(&self) -> Option<LogoutReport> {
        if !self.is_open() {
            return None;
        }

        let options = LogoutOptions::to_login(self.coordinator.routes());
        let report = self.coordinator.logout(&options);
        lock(&self.state).phase = ModalPhase::Closed;

        tracing::info!(target: TRACING_TARGET_LOGOUT, "session-expired modal acknowledged");
        Some(report)
    }
}

fn open(state: &Mutex<ModalState>) {
    let mut state = lock(state);
    if state.phase == ModalPhase::Open {
        state.ignored_raises += 1;
        tracing::debug!(
            target: TRACING_TARGET_LOGOUT,
            ignored_raises = state.ignored_raises,
            "session-expired modal already open"
        );
        return;
    }

    state.phase = ModalPhase::Open;
    state.times_opened += 1;
    tracing::info!(
        target: TRACING_TARGET_LOGOUT,
        times_opened = state.times_opened,
        "session expired, modal opened"
    );
}

#[cfg(test)]
mod tests {
    use gopark_core::{Role, Routes};

    use super::*;
    use crate::credential::{
        CredentialStore, RememberPolicy, RememberedLogins, SessionRepository,
    };
    use crate::navigation::HistoryNavigator;
    use crate::storage::MemoryStorage;

    struct Fixture {
        channel: SessionChannel,
        store: Arc<CredentialStore>,
        navigator: Arc<HistoryNavigator>,
        modal: SessionExpiredModal,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(CredentialStore::with_policy(
            Arc::new(MemoryStorage::new()),
            RememberPolicy::Plaintext,
        ));
        store.save_token("tok").unwrap();
        store.save_role(Role::Admin).unwrap();
        store.save_remembered("admin@gopark.app", "secret").unwrap();

        let channel = SessionChannel::new();
        let navigator = Arc::new(HistoryNavigator::new("/admin"));
        let coordinator = LogoutCoordinator::new(
            store.clone(),
            navigator.clone(),
            channel.clone(),
            Routes::default(),
        );
        let modal = SessionExpiredModal::attach(&channel, coordinator);

        Fixture {
            channel,
            store,
            navigator,
            modal,
        }
    }

    #[test]
    fn test_opens_on_expired() {
        let f = fixture();
        assert!(!f.modal.is_open());

        f.channel.raise_expired();
        assert!(f.modal.is_open());
    }

    #[test]
    fn test_double_raise_opens_one_instance() {
        let f = fixture();
        f.channel.raise_expired();
        f.channel.raise_expired();

        assert!(f.modal.is_open());
        assert_eq!(f.modal.times_opened(), 1);
        assert_eq!(f.modal.ignored_raises(), 1);
    }

    #[test]
    fn test_dismiss_is_refused_while_open() {
        let f = fixture();
        f.channel.raise_expired();

        assert!(!f.modal.dismiss());
        assert!(f.modal.is_open());
        assert_eq!(f.store.get_token().unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn test_acknowledge_logs_out_to_login() {
        let f = fixture();
        f.channel.raise_expired();

        let report = f.modal.acknowledge().unwrap();

        assert_eq!(report.redirected_to, "/login");
        assert!(!f.modal.is_open());
        assert_eq!(f.navigator.current(), "/login");
        assert_eq!(f.store.get_token().unwrap(), None);
        assert_eq!(f.store.get_role().unwrap(), Role::Guest);
        assert!(f.store.has_remembered().unwrap());
    }

    #[test]
    fn test_acknowledge_when_closed_does_nothing() {
        let f = fixture();

        assert_eq!(f.modal.acknowledge(), None);
        assert!(f.navigator.navigations().is_empty());
        assert!(f.modal.dismiss());
    }

    #[test]
    fn test_reopens_after_acknowledge() {
        let f = fixture();
        f.channel.raise_expired();
        f.modal.acknowledge();
        f.channel.raise_expired();

        assert!(f.modal.is_open());
        assert_eq!(f.modal.times_opened(), 2);
    }

    #[test]
    fn test_drop_detaches_listener() {
        let f = fixture();
        assert_eq!(f.channel.listener_count(), 1);

        drop(f.modal);
        assert_eq!(f.channel.raise_expired(), 0);
    }
}
