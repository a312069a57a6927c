// Authentication backends
// The remote authentication procedure is an opaque collaborator: it takes
// credentials and returns a reply list that is validated at this boundary.

use super::password::{hash_password, verify_password};
use crate::models::{AdminRole, AuthReply, AuthUserData};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Trait for authentication backends.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Authenticate credentials against the backing user store.
    ///
    /// Returns the raw reply list; an empty list means no matching account.
    /// Transport and protocol failures are reported as `Err`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Vec<AuthReply>, String>;
}

/// A stored admin account in the in-memory backend.
#[derive(Debug, Clone)]
struct StoredAdmin {
    id: String,
    email: String,
    password_hash: String,
    role: AdminRole,
    is_active: bool,
}

/// In-memory authentication backend with bcrypt-hashed passwords.
///
/// Used by tests and local development in place of the hosted database RPC.
pub struct MemoryAuthBackend {
    users: Arc<RwLock<HashMap<String, StoredAdmin>>>,
}

impl MemoryAuthBackend {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register an admin account. The email is stored lowercased.
    pub async fn add_user(
        &self,
        id: &str,
        email: &str,
        password: &str,
        role: AdminRole,
        is_active: bool,
    ) -> Result<(), String> {
        let password_hash = hash_password(password)?;
        let email = email.trim().to_lowercase();

        let mut users = self.users.write().await;
        users.insert(
            email.clone(),
            StoredAdmin {
                id: id.to_string(),
                email,
                password_hash,
                role,
                is_active,
            },
        );
        Ok(())
    }
}

impl Default for MemoryAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for MemoryAuthBackend {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Vec<AuthReply>, String> {
        let users = self.users.read().await;

        let Some(user) = users.get(email) else {
            debug!("No account for submitted email");
            return Ok(Vec::new());
        };

        if !verify_password(password, &user.password_hash)? {
            debug!("Password mismatch for {}", user.id);
            return Ok(vec![AuthReply {
                success: false,
                user_data: None,
            }]);
        }

        Ok(vec![AuthReply {
            success: true,
            user_data: Some(AuthUserData {
                id: user.id.clone(),
                email: user.email.clone(),
                role: user.role,
                is_active: user.is_active,
            }),
        }])
    }
}

/// Authentication backend that POSTs credentials to the hosted database RPC.
pub struct HttpAuthBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAuthBackend {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Vec<AuthReply>, String> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Authentication request failed: {}", e))?;

        if !response.status().is_success() {
            warn!(
                "Authentication endpoint returned status {}",
                response.status()
            );
            return Err(format!(
                "Authentication endpoint returned status: {}",
                response.status()
            ));
        }

        response
            .json::<Vec<AuthReply>>()
            .await
            .map_err(|e| format!("Failed to parse authentication reply: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_authenticates_known_user() {
        let backend = MemoryAuthBackend::new();
        backend
            .add_user("u1", "Ops@Agency.example", "Str0ng!pass", AdminRole::Admin, true)
            .await
            .unwrap();

        let replies = backend
            .authenticate("ops@agency.example", "Str0ng!pass")
            .await
            .unwrap();

        let user = replies
            .into_iter()
            .next()
            .unwrap()
            .into_active_user()
            .unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "ops@agency.example");
        assert_eq!(user.role, AdminRole::Admin);
    }

    #[tokio::test]
    async fn test_memory_backend_rejects_wrong_password() {
        let backend = MemoryAuthBackend::new();
        backend
            .add_user("u1", "ops@agency.example", "Str0ng!pass", AdminRole::Admin, true)
            .await
            .unwrap();

        let replies = backend
            .authenticate("ops@agency.example", "wrong")
            .await
            .unwrap();

        assert!(!replies[0].success);
        assert!(replies[0].user_data.is_none());
    }

    #[tokio::test]
    async fn test_memory_backend_unknown_email_yields_empty_reply() {
        let backend = MemoryAuthBackend::new();

        let replies = backend
            .authenticate("nobody@agency.example", "whatever")
            .await
            .unwrap();

        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn test_memory_backend_keeps_inactive_flag() {
        let backend = MemoryAuthBackend::new();
        backend
            .add_user("u2", "gone@agency.example", "Str0ng!pass", AdminRole::Editor, false)
            .await
            .unwrap();

        let replies = backend
            .authenticate("gone@agency.example", "Str0ng!pass")
            .await
            .unwrap();

        // The reply carries the flag; the boundary check rejects it.
        assert!(replies[0].success);
        assert!(replies[0].clone().into_active_user().is_none());
    }
}
