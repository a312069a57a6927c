// Session types and data structures

use crate::models::{AdminRole, AuthUserData, CurrentUser};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Inactivity timeout (idle timeout) in seconds
    #[serde(default = "default_inactivity_timeout_secs")]
    pub inactivity_timeout_secs: i64,
    /// Absolute session lifetime in seconds (regardless of activity)
    #[serde(default = "default_absolute_lifetime_secs")]
    pub absolute_lifetime_secs: i64,
    /// Interval between liveness sweeps in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Key the session record is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_inactivity_timeout_secs() -> i64 {
    20 * 60
}

fn default_absolute_lifetime_secs() -> i64 {
    24 * 60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_storage_key() -> String {
    "admin_session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: default_inactivity_timeout_secs(),
            absolute_lifetime_secs: default_absolute_lifetime_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            storage_key: default_storage_key(),
        }
    }
}

impl SessionConfig {
    pub fn inactivity_timeout_ms(&self) -> i64 {
        self.inactivity_timeout_secs * 1000
    }

    pub fn absolute_lifetime_ms(&self) -> i64 {
        self.absolute_lifetime_secs * 1000
    }
}

/// The persisted admin session.
///
/// Exactly one record exists per storage context at a time; timestamps are
/// epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
    /// When the session expires regardless of activity
    pub expires_at: i64,
    /// Last qualifying user interaction
    pub last_activity: i64,
    /// Locally generated opaque token. Distinguishes "a session exists" from
    /// "no session"; not a cryptographic credential.
    pub session_token: String,
}

impl SessionRecord {
    /// Build a fresh record for a just-authenticated user.
    pub fn new(user: &AuthUserData, now_ms: i64, config: &SessionConfig) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
            expires_at: now_ms + config.absolute_lifetime_ms(),
            last_activity: now_ms,
            session_token: generate_session_token(now_ms),
        }
    }

    /// A session is valid iff it has not passed its absolute expiry, has seen
    /// activity within the inactivity timeout, and carries a token.
    pub fn is_valid_at(&self, now_ms: i64, config: &SessionConfig) -> bool {
        !self.session_token.is_empty()
            && now_ms < self.expires_at
            && now_ms - self.last_activity < config.inactivity_timeout_ms()
    }

    /// Bump the activity timestamp. Never moves it backwards.
    pub fn touch(&mut self, now_ms: i64) {
        self.last_activity = self.last_activity.max(now_ms);
    }

    pub fn current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
        }
    }
}

/// Generate a session token: creation timestamp plus a random suffix in a
/// reversible encoding.
pub fn generate_session_token(now_ms: i64) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    STANDARD.encode(format!("{}:{}", now_ms, suffix))
}

/// Authentication state as seen by callers.
///
/// There are exactly two states; activity refresh is transparent and never
/// surfaces an intermediate state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(CurrentUser),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Unauthenticated => None,
        }
    }
}

/// Why a session was force-expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    /// No qualifying activity within the inactivity timeout
    Inactivity,
    /// Absolute lifetime reached
    Lifetime,
}

/// Event broadcast to subscribers when the session ends without an explicit
/// logout, signalling the caller to re-authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Expired(ExpiryReason),
}
