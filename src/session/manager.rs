// Session manager for the admin session lifecycle

use super::types::{AuthState, ExpiryReason, SessionConfig, SessionEvent, SessionRecord};
use crate::auth::AuthBackend;
use crate::models::{AuthReply, LoginResult};
use crate::security::RateLimiter;
use crate::storage::{KeyValueStore, SecureStorage};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// Rate-limit key for login attempts. The process serves a single client
/// context, so one key covers it.
const LOGIN_RATE_KEY: &str = "admin-login";

const MSG_MISSING_FIELDS: &str = "Email and password are required";
const MSG_RATE_LIMITED: &str = "Too many login attempts. Please try again later.";
const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
const MSG_GENERIC_ERROR: &str = "An error occurred. Please try again.";

/// Owns the one authenticated-session record and answers "is the caller
/// currently authenticated, and as whom".
///
/// All collaborators are injected: the persistent store, the authentication
/// backend, and the login rate limiter. Callers observe forced expiry through
/// the broadcast channel returned by [`SessionManager::subscribe`].
pub struct SessionManager {
    storage: SecureStorage,
    backend: Arc<dyn AuthBackend>,
    limiter: Arc<dyn RateLimiter>,
    config: SessionConfig,
    state: RwLock<AuthState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        backend: Arc<dyn AuthBackend>,
        limiter: Arc<dyn RateLimiter>,
        config: SessionConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            storage: SecureStorage::new(store),
            backend,
            limiter,
            config,
            state: RwLock::new(AuthState::Unauthenticated),
            events,
        }
    }

    /// Subscribe to forced-expiry notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Attempt a login. Never returns an error: every failure mode folds
    /// into a `LoginResult` with a user-facing message, and the message does
    /// not reveal which part of the credentials was wrong.
    pub async fn login(&self, email: &str, password: &str) -> LoginResult {
        if email.trim().is_empty() || password.is_empty() {
            return LoginResult::failure(MSG_MISSING_FIELDS);
        }

        // Gate before any backend contact.
        if !self.limiter.check(LOGIN_RATE_KEY).await {
            warn!("Login attempt rejected by rate limiter");
            return LoginResult::failure(MSG_RATE_LIMITED);
        }

        let email = email.trim().to_lowercase();

        let replies = match self.backend.authenticate(&email, password).await {
            Ok(replies) => replies,
            Err(e) => {
                warn!("Authentication call failed: {}", e);
                return LoginResult::failure(MSG_GENERIC_ERROR);
            }
        };

        let Some(user) = replies
            .into_iter()
            .next()
            .and_then(AuthReply::into_active_user)
        else {
            debug!("Authentication reply did not contain a usable account");
            return LoginResult::failure(MSG_INVALID_CREDENTIALS);
        };

        let now = Utc::now().timestamp_millis();
        let record = SessionRecord::new(&user, now, &self.config);

        if let Err(e) = self.storage.set(&self.config.storage_key, &record).await {
            warn!("Failed to persist session record: {}", e);
            return LoginResult::failure(MSG_GENERIC_ERROR);
        }

        info!("Admin {} authenticated", record.id);
        *self.state.write().await = AuthState::Authenticated(record.current_user());
        LoginResult::ok()
    }

    /// Purge the session record and mark the caller unauthenticated.
    /// Idempotent.
    pub async fn logout(&self) {
        if let Err(e) = self.storage.remove(&self.config.storage_key).await {
            warn!("Failed to clear session record: {}", e);
        }

        let mut state = self.state.write().await;
        if state.is_authenticated() {
            info!("Admin logged out");
        }
        *state = AuthState::Unauthenticated;
    }

    /// Re-validate the persisted record against the current time.
    ///
    /// Invoked at startup and reusable on demand. A valid record refreshes
    /// `last_activity`; an invalid or undecodable one is purged.
    pub async fn check_auth_status(&self) -> AuthState {
        self.check_auth_status_at(Utc::now().timestamp_millis())
            .await
    }

    /// [`check_auth_status`](Self::check_auth_status) at an explicit
    /// timestamp, for deterministic tests.
    pub async fn check_auth_status_at(&self, now_ms: i64) -> AuthState {
        let record: Option<SessionRecord> = match self.storage.get(&self.config.storage_key).await
        {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to read session record: {}", e);
                None
            }
        };

        let Some(mut record) = record else {
            *self.state.write().await = AuthState::Unauthenticated;
            return AuthState::Unauthenticated;
        };

        if !record.is_valid_at(now_ms, &self.config) {
            debug!("Purging invalid session record for {}", record.id);
            if let Err(e) = self.storage.remove(&self.config.storage_key).await {
                warn!("Failed to purge session record: {}", e);
            }
            *self.state.write().await = AuthState::Unauthenticated;
            return AuthState::Unauthenticated;
        }

        record.touch(now_ms);
        if let Err(e) = self.storage.set(&self.config.storage_key, &record).await {
            warn!("Failed to refresh session record: {}", e);
        }

        let user = record.current_user();
        *self.state.write().await = AuthState::Authenticated(user.clone());
        AuthState::Authenticated(user)
    }

    /// True if the session's role satisfies the requested role.
    pub async fn has_role(&self, role: crate::models::AdminRole) -> bool {
        match &*self.state.read().await {
            AuthState::Authenticated(user) => user.role.satisfies(role),
            AuthState::Unauthenticated => false,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn current_user(&self) -> Option<crate::models::CurrentUser> {
        self.state.read().await.user().cloned()
    }

    /// Record a qualifying user interaction: bump `last_activity` and
    /// re-persist the record. Cheap, never debounced; a no-op when no record
    /// exists.
    pub async fn record_activity(&self) {
        self.record_activity_at(Utc::now().timestamp_millis()).await
    }

    pub async fn record_activity_at(&self, now_ms: i64) {
        let record: Option<SessionRecord> =
            self.storage.get(&self.config.storage_key).await.unwrap_or_default();

        if let Some(mut record) = record {
            record.touch(now_ms);
            if let Err(e) = self.storage.set(&self.config.storage_key, &record).await {
                warn!("Failed to persist activity update: {}", e);
            }
        }
    }

    /// One liveness sweep: if the session has gone inactive or outlived its
    /// absolute lifetime, force a logout and notify subscribers.
    pub async fn run_liveness_check(&self) -> Option<SessionEvent> {
        self.run_liveness_check_at(Utc::now().timestamp_millis())
            .await
    }

    pub async fn run_liveness_check_at(&self, now_ms: i64) -> Option<SessionEvent> {
        if !self.state.read().await.is_authenticated() {
            return None;
        }

        let record: Option<SessionRecord> =
            self.storage.get(&self.config.storage_key).await.unwrap_or_default();

        let Some(record) = record else {
            // Record vanished underneath us; converge to unauthenticated.
            *self.state.write().await = AuthState::Unauthenticated;
            return None;
        };

        if record.is_valid_at(now_ms, &self.config) {
            return None;
        }

        let reason = if now_ms >= record.expires_at {
            ExpiryReason::Lifetime
        } else {
            ExpiryReason::Inactivity
        };

        info!("Session for {} expired ({:?})", record.id, reason);
        if let Err(e) = self.storage.remove(&self.config.storage_key).await {
            warn!("Failed to purge expired session record: {}", e);
        }
        *self.state.write().await = AuthState::Unauthenticated;

        let event = SessionEvent::Expired(reason);
        // No subscribers is fine.
        let _ = self.events.send(event.clone());
        Some(event)
    }

    /// Spawn the recurring liveness sweep on the configured interval.
    pub fn spawn_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(manager.config.sweep_interval_secs));
            loop {
                interval.tick().await;
                manager.run_liveness_check().await;
            }
        })
    }
}
