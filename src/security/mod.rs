// Security utilities shared by the session manager and public-facing forms

pub mod rate_limit;
pub mod sanitize;
pub mod validate;

pub use rate_limit::{FixedWindowRateLimiter, RateLimiter};
pub use sanitize::{sanitize_html, sanitize_input};
pub use validate::{
    validate_email, validate_password_strength, validate_phone, validate_url, FileMetadata,
    PasswordStrength,
};
