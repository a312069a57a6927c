pub mod manager;
pub mod types;

pub use manager::SessionManager;
pub use types::{AuthState, ExpiryReason, SessionConfig, SessionEvent, SessionRecord};
