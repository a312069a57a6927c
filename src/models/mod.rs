pub mod user;

pub use user::{AdminRole, AuthReply, AuthUserData, CurrentUser, LoginRequest, LoginResult};
