//! Logout coordination.
//!
//! Logging out clears the identity token and role, optionally forgets the
//! remembered login, and navigates away. Clearing is best effort: a storage
//! failure is logged and reported, but navigation is always attempted so the
//! user ends up back at the login surface even when storage is degraded.

use std::sync::Arc;

use gopark_core::Routes;
use strum::{AsRefStr, Display};

use crate::channel::{SessionChannel, SessionEvent};
use crate::credential::CredentialRepository;
use crate::navigation::Navigator;
use crate::{Error, TRACING_TARGET_LOGOUT};

/// Options for a single logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOptions {
    /// Destination after credentials are cleared.
    pub redirect_to: String,
    /// Whether the remembered login is forgotten as well.
    pub clear_remembered_login: bool,
}

impl LogoutOptions {
    /// Logs out to `redirect_to`, keeping the remembered login.
    pub fn to(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
            clear_remembered_login: false,
        }
    }

    /// Logs out to the login route, keeping the remembered login.
    pub fn to_login(routes: &Routes) -> Self {
        Self::to(routes.login.clone())
    }

    /// Sets whether the remembered login is cleared.
    #[must_use]
    pub fn forget_login(mut self, clear: bool) -> Self {
        self.clear_remembered_login = clear;
        self
    }
}

/// Credential that could not be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ClearStep {
    Token,
    Role,
    RememberedLogin,
}

/// What a logout actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutReport {
    /// Destination navigated to.
    pub redirected_to: String,
    /// Clears that failed.
    pub failed: Vec<ClearStep>,
}

impl LogoutReport {
    /// Returns `true` when every requested clear succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reusable logout action.
#[derive(Clone)]
pub struct LogoutCoordinator {
    credentials: Arc<dyn CredentialRepository>,
    navigator: Arc<dyn Navigator>,
    channel: SessionChannel,
    routes: Routes,
}

impl std::fmt::Debug for LogoutCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoutCoordinator")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl LogoutCoordinator {
    /// Creates a coordinator over the given collaborators.
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        navigator: Arc<dyn Navigator>,
        channel: SessionChannel,
        routes: Routes,
    ) -> Self {
        Self {
            credentials,
            navigator,
            channel,
            routes,
        }
    }

    /// Returns the routing table.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Clears credentials and navigates to `options.redirect_to`.
    ///
    /// Idempotent: a second call leaves the same end state.
    pub fn logout(&self, options: &LogoutOptions) -> LogoutReport {
        let mut failed = Vec::new();

        Self::attempt(&mut failed, ClearStep::Token, self.credentials.clear_token());
        Self::attempt(&mut failed, ClearStep::Role, self.credentials.clear_role());
        if options.clear_remembered_login {
            Self::attempt(
                &mut failed,
                ClearStep::RememberedLogin,
                self.credentials.clear_remembered(),
            );
        }

        self.channel.publish(SessionEvent::LoggedOut);
        self.navigator.push(&options.redirect_to);

        tracing::info!(
            target: TRACING_TARGET_LOGOUT,
            redirect_to = %options.redirect_to,
            clear_remembered_login = options.clear_remembered_login,
            failed_steps = failed.len(),
            "logged out"
        );

        LogoutReport {
            redirected_to: options.redirect_to.clone(),
            failed,
        }
    }

    fn attempt(failed: &mut Vec<ClearStep>, step: ClearStep, result: Result<(), Error>) {
        if let Err(error) = result {
            tracing::warn!(
                target: TRACING_TARGET_LOGOUT,
                step = step.as_ref(),
                error = %error,
                "failed to clear credential, continuing logout"
            );
            failed.push(step);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use gopark_core::Role;

    use super::*;
    use crate::Result;
    use crate::credential::{
        CredentialStore, RememberPolicy, RememberedLogin, RememberedLogins, SessionRepository,
    };
    use crate::navigation::{HistoryNavigator, NavigationMode};
    use crate::storage::MemoryStorage;

    struct Fixture {
        store: Arc<CredentialStore>,
        navigator: Arc<HistoryNavigator>,
        coordinator: LogoutCoordinator,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(CredentialStore::with_policy(
            Arc::new(MemoryStorage::new()),
            RememberPolicy::Plaintext,
        ));
        store.save_token("tok").unwrap();
        store.save_role(Role::Owner).unwrap();
        store.save_remembered("owner@gopark.app", "secret").unwrap();

        let navigator = Arc::new(HistoryNavigator::new("/owner"));
        let coordinator = LogoutCoordinator::new(
            store.clone(),
            navigator.clone(),
            SessionChannel::new(),
            Routes::default(),
        );

        Fixture {
            store,
            navigator,
            coordinator,
        }
    }

    struct BrokenStorage;

    impl SessionRepository for BrokenStorage {
        fn save_token(&self, _: &str) -> Result<()> {
            Err(Error::unavailable("quota exceeded"))
        }

        fn get_token(&self) -> Result<Option<String>> {
            Err(Error::unavailable("quota exceeded"))
        }

        fn clear_token(&self) -> Result<()> {
            Err(Error::unavailable("quota exceeded"))
        }

        fn save_role(&self, _: Role) -> Result<()> {
            Err(Error::unavailable("quota exceeded"))
        }

        fn get_role(&self) -> Result<Role> {
            Err(Error::unavailable("quota exceeded"))
        }

        fn clear_role(&self) -> Result<()> {
            Err(Error::unavailable("quota exceeded"))
        }
    }

    impl RememberedLogins for BrokenStorage {
        fn save_remembered(&self, _: &str, _: &str) -> Result<()> {
            Err(Error::unavailable("quota exceeded"))
        }

        fn get_remembered(&self) -> Result<Option<RememberedLogin>> {
            Err(Error::unavailable("quota exceeded"))
        }

        fn has_remembered(&self) -> Result<bool> {
            Err(Error::unavailable("quota exceeded"))
        }

        fn clear_remembered(&self) -> Result<()> {
            Err(Error::unavailable("quota exceeded"))
        }
    }

    #[test]
    fn test_logout_clears_session_and_keeps_remembered() {
        let f = fixture();
        let report = f.coordinator.logout(&LogoutOptions::to("/login"));

        assert!(report.is_clean());
        assert_eq!(f.store.get_token().unwrap(), None);
        assert_eq!(f.store.get_role().unwrap(), Role::Guest);
        assert!(f.store.has_remembered().unwrap());
        assert_eq!(f.navigator.current(), "/login");
    }

    #[test]
    fn test_logout_can_forget_remembered() {
        let f = fixture();
        f.coordinator
            .logout(&LogoutOptions::to("/login").forget_login(true));

        assert!(!f.store.has_remembered().unwrap());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let f = fixture();
        let options = LogoutOptions::to_login(f.coordinator.routes()).forget_login(true);

        let first = f.coordinator.logout(&options);
        let second = f.coordinator.logout(&options);

        assert_eq!(first, second);
        assert_eq!(f.store.get_token().unwrap(), None);
        assert!(!f.store.has_remembered().unwrap());
        assert_eq!(f.navigator.current(), "/login");
    }

    #[test]
    fn test_logout_navigates_with_push() {
        let f = fixture();
        f.coordinator.logout(&LogoutOptions::to("/login"));

        let navigations = f.navigator.navigations();
        assert_eq!(navigations.len(), 1);
        assert_eq!(navigations[0].mode, NavigationMode::Push);
    }

    #[test]
    fn test_logout_navigates_despite_broken_storage() {
        let navigator = Arc::new(HistoryNavigator::new("/admin"));
        let coordinator = LogoutCoordinator::new(
            Arc::new(BrokenStorage),
            navigator.clone(),
            SessionChannel::new(),
            Routes::default(),
        );

        let report = coordinator.logout(&LogoutOptions::to("/login").forget_login(true));

        assert_eq!(
            report.failed,
            vec![ClearStep::Token, ClearStep::Role, ClearStep::RememberedLogin]
        );
        assert_eq!(navigator.current(), "/login");
    }

    #[test]
    fn test_logout_announces_logged_out() {
        let f = fixture();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let _subscription = f.coordinator.channel.subscribe(move |event| {
            if *event == SessionEvent::LoggedOut {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        f.coordinator.logout(&LogoutOptions::to("/login"));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
