use serde::{Deserialize, Serialize};

/// Role assigned to an admin console user.
///
/// The hierarchy has exactly two effective levels: `SuperAdmin` satisfies
/// every role check, every other role only satisfies itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    Editor,
}

impl AdminRole {
    /// Whether this role satisfies a required role.
    pub fn satisfies(&self, required: AdminRole) -> bool {
        *self == AdminRole::SuperAdmin || *self == required
    }
}

/// Identity fields of the currently authenticated admin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
}

/// Login credentials as submitted by the login form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Outcome of a login attempt, surfaced directly to the caller.
///
/// Failures are intentionally generic: "wrong password" and "network down"
/// produce the same shape so the response does not leak which field was wrong.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub success: bool,
    pub message: String,
}

impl LoginResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: "Login successful".to_string(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// User payload inside a successful authentication reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserData {
    pub id: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
}

/// One entry of the authentication procedure's reply list.
///
/// The remote procedure returns either an empty list or
/// `[{success, user_data}]`. The shape is validated here, at the boundary,
/// rather than trusted implicitly downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthReply {
    pub success: bool,
    #[serde(default)]
    pub user_data: Option<AuthUserData>,
}

impl AuthReply {
    /// Extract the user data if this reply represents a usable login:
    /// marked successful, carrying user data, and for an active account.
    pub fn into_active_user(self) -> Option<AuthUserData> {
        if !self.success {
            return None;
        }
        self.user_data.filter(|u| u.is_active && !u.email.is_empty())
    }
}
