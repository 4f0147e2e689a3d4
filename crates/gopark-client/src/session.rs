//! Login session service.
//!
//! [`AuthSession`] drives the authentication calls and applies their results
//! to the credential store, the session channel and the toast queue. Upstream
//! failures end here: callers only ever see the user-facing message.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gopark_core::{Role, Routes, Severity, ToastQueue};
use gopark_session::channel::{SessionChannel, SessionEvent};
use gopark_session::credential::CredentialRepository;
use validator::Validate;

use crate::{
    AuthApi, Error, ForgotPasswordRequest, LoginRequest, ProfileData, ResetPasswordRequest,
    Result, SignupRequest, TRACING_TARGET,
};

/// Where a successful login lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: Role,
    pub redirect_to: String,
}

/// Authentication flows bound to one device session.
pub struct AuthSession<A> {
    api: A,
    credentials: Arc<dyn CredentialRepository>,
    channel: SessionChannel,
    toasts: Arc<Mutex<ToastQueue>>,
    routes: Routes,
}

impl<A> std::fmt::Debug for AuthSession<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("channel", &self.channel)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl<A: AuthApi> AuthSession<A> {
    /// Creates a session service with its own toast queue.
    pub fn new(
        api: A,
        credentials: Arc<dyn CredentialRepository>,
        channel: SessionChannel,
        routes: Routes,
    ) -> Self {
        Self::with_toasts(api, credentials, channel, routes, Arc::default())
    }

    /// Creates a session service that reports into a shared toast queue.
    pub fn with_toasts(
        api: A,
        credentials: Arc<dyn CredentialRepository>,
        channel: SessionChannel,
        routes: Routes,
        toasts: Arc<Mutex<ToastQueue>>,
    ) -> Self {
        Self {
            api,
            credentials,
            channel,
            toasts,
            routes,
        }
    }

    /// Locks the toast queue.
    pub fn toasts(&self) -> MutexGuard<'_, ToastQueue> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, severity: Severity, message: impl Into<String>) {
        self.toasts().push(severity, message);
    }

    fn fail<T>(&self, flow: &'static str, error: &Error) -> Result<T, String> {
        tracing::warn!(
            target: TRACING_TARGET,
            flow,
            kind = error.kind(),
            error = %error,
            "auth flow failed"
        );

        let message = error.user_message();
        self.notify(Severity::Error, message.clone());
        Err(message)
    }

    /// Logs in and stores the resulting credentials.
    ///
    /// With `remember` the login is kept for prefill, otherwise any remembered
    /// login is forgotten. Nothing is written when the call fails, and a
    /// failure to update the remembered login does not fail the login.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome, String> {
        match self.try_login(email, password, remember).await {
            Ok(outcome) => {
                self.notify(Severity::Success, "Signed in successfully.");
                Ok(outcome)
            }
            Err(error) => self.fail("login", &error),
        }
    }

    async fn try_login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome> {
        let request = LoginRequest::new(email.trim(), password);
        request.validate()?;

        let data = self.api.login(&request).await?;

        self.credentials.save_token(&data.token)?;
        self.credentials.save_role(data.role)?;
        self.apply_remember(&request.email, password, remember);

        tracing::info!(
            target: TRACING_TARGET,
            role = %data.role,
            remember,
            "login succeeded"
        );
        self.channel.publish(SessionEvent::LoggedIn { role: data.role });

        Ok(LoginOutcome {
            role: data.role,
            redirect_to: data.role.home(&self.routes).to_owned(),
        })
    }

    /// Keeps or forgets the login for prefill.
    ///
    /// A failure here leaves the new session in place and is only logged.
    fn apply_remember(&self, email: &str, password: &str, remember: bool) {
        let result = if remember {
            self.credentials.save_remembered(email, password)
        } else {
            self.credentials.clear_remembered()
        };

        if let Err(error) = result {
            tracing::warn!(
                target: TRACING_TARGET,
                remember,
                error = %error,
                "failed to update remembered login"
            );
        }
    }

    /// Registers an account, returning the server's confirmation.
    pub async fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, String> {
        let request = SignupRequest::new(full_name.trim(), email.trim(), password);
        let result = match request.validate() {
            Ok(()) => self.api.signup(&request).await,
            Err(errors) => Err(errors.into()),
        };
        self.finish("signup", result.map(|data| data.message))
    }

    /// Requests a password reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<String, String> {
        let request = ForgotPasswordRequest::new(email.trim());
        let result = match request.validate() {
            Ok(()) => self.api.forgot_password(&request).await,
            Err(errors) => Err(errors.into()),
        };
        self.finish("forgot_password", result.map(|data| data.message))
    }

    /// Sets a new password using a reset token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, String> {
        let request = ResetPasswordRequest::new(token.trim(), new_password);
        let result = match request.validate() {
            Ok(()) => self.api.reset_password(&request).await,
            Err(errors) => Err(errors.into()),
        };
        self.finish("reset_password", result.map(|data| data.message))
    }

    fn finish(&self, flow: &'static str, result: Result<String>) -> Result<String, String> {
        match result {
            Ok(message) => {
                tracing::info!(target: TRACING_TARGET, flow, "auth flow succeeded");
                self.notify(Severity::Success, message.clone());
                Ok(message)
            }
            Err(error) => self.fail(flow, &error),
        }
    }

    /// Announces that the stored identity is no longer accepted.
    pub fn report_unauthorized(&self) -> usize {
        tracing::info!(target: TRACING_TARGET, "identity rejected upstream, raising expiry");
        self.channel.raise_expired()
    }

    /// Fetches the account behind the stored token.
    ///
    /// An unauthorized answer raises the session-expired signal.
    pub async fn refresh_profile(&self) -> Result<ProfileData, String> {
        match self.try_refresh_profile().await {
            Ok(profile) => Ok(profile),
            Err(error) => {
                if error.is_unauthorized() {
                    self.report_unauthorized();
                }
                self.fail("profile", &error)
            }
        }
    }

    async fn try_refresh_profile(&self) -> Result<ProfileData> {
        let token = self.credentials.get_token()?.ok_or(Error::MissingToken)?;
        self.api.profile(&token).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use gopark_session::credential::{
        CredentialStore, RememberPolicy, RememberedLogin, RememberedLogins, SessionRepository,
    };
    use gopark_session::storage::MemoryStorage;

    use super::*;
    use crate::{LoginData, MessageData};

    #[derive(Default)]
    struct StubApi {
        reject_login: bool,
        expired: bool,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl AuthApi for StubApi {
        async fn login(&self, request: &LoginRequest) -> Result<LoginData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_login {
                return Err(Error::unauthorized("Wrong email or password"));
            }

            let role = if request.email.starts_with("admin") {
                Role::Admin
            } else {
                Role::Owner
            };
            Ok(LoginData {
                token: "issued-token".to_owned(),
                role,
            })
        }

        async fn signup(&self, _: &SignupRequest) -> Result<MessageData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::rejected(409, "Email already registered"))
        }

        async fn forgot_password(&self, _: &ForgotPasswordRequest) -> Result<MessageData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MessageData {
                message: "Check your inbox".to_owned(),
            })
        }

        async fn reset_password(&self, _: &ResetPasswordRequest) -> Result<MessageData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MessageData {
                message: "Password updated".to_owned(),
            })
        }

        async fn profile(&self, _: &str) -> Result<ProfileData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.expired {
                return Err(Error::unauthorized("Token expired"));
            }
            Ok(ProfileData {
                email: "owner@gopark.app".to_owned(),
                role: Role::Owner,
                full_name: None,
            })
        }
    }

    fn session(api: StubApi) -> (AuthSession<StubApi>, Arc<CredentialStore>, SessionChannel) {
        let store = Arc::new(CredentialStore::with_policy(
            Arc::new(MemoryStorage::new()),
            RememberPolicy::Plaintext,
        ));
        let channel = SessionChannel::new();
        let session = AuthSession::new(api, store.clone(), channel.clone(), Routes::default());
        (session, store, channel)
    }

    #[tokio::test]
    async fn test_login_stores_credentials_and_redirects_home() {
        let (session, store, _) = session(StubApi::default());

        let outcome = session.login("admin@gopark.app", "secret", true).await.unwrap();

        assert_eq!(outcome.redirect_to, "/admin");
        assert_eq!(store.get_token().unwrap().as_deref(), Some("issued-token"));
        assert_eq!(store.get_role().unwrap(), Role::Admin);
        let remembered = store.get_remembered().unwrap().unwrap();
        assert_eq!(remembered.email, "admin@gopark.app");
        assert_eq!(remembered.password, "secret");
    }

    #[tokio::test]
    async fn test_login_without_remember_forgets_previous() {
        let (session, store, _) = session(StubApi::default());
        store.save_remembered("old@gopark.app", "old").unwrap();

        session.login("owner@gopark.app", "secret", false).await.unwrap();

        assert!(!store.has_remembered().unwrap());
    }

    #[tokio::test]
    async fn test_rejected_login_changes_nothing() {
        let api = StubApi {
            reject_login: true,
            ..StubApi::default()
        };
        let (session, store, _) = session(api);
        store.save_remembered("owner@gopark.app", "old").unwrap();

        let message = session.login("owner@gopark.app", "bad", false).await.unwrap_err();

        assert_eq!(message, "Wrong email or password");
        assert_eq!(store.get_token().unwrap(), None);
        assert_eq!(store.get_role().unwrap(), Role::Guest);
        assert!(store.has_remembered().unwrap());
        assert_eq!(session.toasts().last().unwrap().severity, Severity::Error);
    }

    struct NoRememberStore(CredentialStore);

    impl SessionRepository for NoRememberStore {
        fn save_token(&self, token: &str) -> gopark_session::Result<()> {
            self.0.save_token(token)
        }

        fn get_token(&self) -> gopark_session::Result<Option<String>> {
            self.0.get_token()
        }

        fn clear_token(&self) -> gopark_session::Result<()> {
            self.0.clear_token()
        }

        fn save_role(&self, role: Role) -> gopark_session::Result<()> {
            self.0.save_role(role)
        }

        fn get_role(&self) -> gopark_session::Result<Role> {
            self.0.get_role()
        }

        fn clear_role(&self) -> gopark_session::Result<()> {
            self.0.clear_role()
        }
    }

    impl RememberedLogins for NoRememberStore {
        fn save_remembered(&self, _: &str, _: &str) -> gopark_session::Result<()> {
            Err(gopark_session::Error::unavailable("quota exceeded"))
        }

        fn get_remembered(&self) -> gopark_session::Result<Option<RememberedLogin>> {
            Ok(None)
        }

        fn has_remembered(&self) -> gopark_session::Result<bool> {
            Ok(false)
        }

        fn clear_remembered(&self) -> gopark_session::Result<()> {
            Err(gopark_session::Error::unavailable("quota exceeded"))
        }
    }

    #[tokio::test]
    async fn test_login_survives_remembered_login_failure() {
        let store = Arc::new(NoRememberStore(CredentialStore::new(Arc::new(
            MemoryStorage::new(),
        ))));
        let channel = SessionChannel::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let _subscription = channel.subscribe(move |event| sink.lock().unwrap().push(*event));
        let session = AuthSession::new(
            StubApi::default(),
            store.clone(),
            channel.clone(),
            Routes::default(),
        );

        let outcome = session.login("owner@gopark.app", "secret", true).await.unwrap();

        assert_eq!(outcome.role, Role::Owner);
        assert_eq!(store.get_token().unwrap().as_deref(), Some("issued-token"));
        assert_eq!(store.get_role().unwrap(), Role::Owner);
        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::LoggedIn { role: Role::Owner }]
        );
        assert_eq!(session.toasts().last().unwrap().severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_invalid_login_is_not_sent() {
        let (session, _, _) = session(StubApi::default());

        let message = session.login("not-an-email", "", false).await.unwrap_err();

        assert!(message.contains("email"));
        assert_eq!(session.api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_login_announces_role() {
        let (session, _, channel) = session(StubApi::default());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let _subscription = channel.subscribe(move |event| sink.lock().unwrap().push(*event));

        session.login("owner@gopark.app", "secret", false).await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::LoggedIn { role: Role::Owner }]
        );
    }

    #[tokio::test]
    async fn test_signup_rejection_message_is_toasted() {
        let (session, _, _) = session(StubApi::default());

        let message = session
            .signup("Lot Owner", "owner@gopark.app", "password123")
            .await
            .unwrap_err();

        assert_eq!(message, "Email already registered");
        assert_eq!(session.toasts().last().unwrap().message, message);
    }

    #[tokio::test]
    async fn test_forgot_and_reset_password() {
        let (session, _, _) = session(StubApi::default());

        assert_eq!(
            session.forgot_password("owner@gopark.app").await.unwrap(),
            "Check your inbox"
        );
        assert!(session.reset_password("token", "short").await.is_err());
        assert_eq!(
            session.reset_password("token", "long-enough").await.unwrap(),
            "Password updated"
        );
        assert_eq!(session.toasts().len(), 3);
    }

    #[tokio::test]
    async fn test_expired_profile_raises_signal() {
        let api = StubApi {
            expired: true,
            ..StubApi::default()
        };
        let (session, store, channel) = session(api);
        store.save_token("stale").unwrap();

        let raised = Arc::new(AtomicUsize::new(0));
        let counter = raised.clone();
        let _subscription = channel.subscribe(move |event| {
            if *event == SessionEvent::Expired {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert!(session.refresh_profile().await.is_err());
        assert_eq!(raised.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_profile_without_token_skips_server() {
        let (session, _, _) = session(StubApi::default());

        let message = session.refresh_profile().await.unwrap_err();

        assert_eq!(message, "Please sign in to continue.");
        assert_eq!(session.api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_profile_with_token() {
        let (session, store, _) = session(StubApi::default());
        store.save_token("fresh").unwrap();

        let profile = session.refresh_profile().await.unwrap();
        assert_eq!(profile.role, Role::Owner);
    }
}
