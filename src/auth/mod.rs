pub mod backend;
pub mod password;

pub use backend::{AuthBackend, HttpAuthBackend, MemoryAuthBackend};
pub use password::{hash_password, verify_password};
