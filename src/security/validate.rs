// Format validators for public-facing form fields

use lazy_static::lazy_static;
use regex::Regex;

/// Practical upper bound on email length (RFC 5321).
const MAX_EMAIL_LEN: usize = 254;

/// Special characters accepted by the password strength check.
const PASSWORD_SPECIALS: &str = "@$!%*?&";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9]\d{0,15}$").unwrap();
    static ref URL_RE: Regex = Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").unwrap();
}

/// Validate an email address: minimal `local@domain.tld` shape plus the
/// practical length limit.
pub fn validate_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

/// Validate a phone number. Spaces, hyphens and parentheses are stripped
/// before matching an optional `+`, a non-zero leading digit, and up to 15
/// further digits.
pub fn validate_phone(phone: &str) -> bool {
    let stripped: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&stripped)
}

/// Validate a URL: must be absolute with an `http` or `https` scheme.
/// Rejects `javascript:`, `data:`, `file:` and every other scheme.
pub fn validate_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Declared metadata of an uploaded file.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

impl FileMetadata {
    /// Exact membership test against the declared media type.
    pub fn is_valid_file_type(&self, allowed: &[&str]) -> bool {
        allowed.contains(&self.content_type.as_str())
    }

    /// Byte-size comparison against a megabyte cap.
    pub fn is_valid_file_size(&self, max_mb: u64) -> bool {
        self.size_bytes <= max_mb * 1024 * 1024
    }
}

/// Result of a password strength check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    pub is_valid: bool,
    pub message: String,
}

impl PasswordStrength {
    fn fail(message: &str) -> Self {
        Self {
            is_valid: false,
            message: message.to_string(),
        }
    }
}

/// Check password strength rule by rule, short-circuiting on the first
/// failure. Rules: length >= 8, a lowercase letter, an uppercase letter, a
/// digit, and one of `@$!%*?&`.
pub fn validate_password_strength(password: &str) -> PasswordStrength {
    if password.len() < 8 {
        return PasswordStrength::fail("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return PasswordStrength::fail("Password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return PasswordStrength::fail("Password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return PasswordStrength::fail("Password must contain a digit");
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return PasswordStrength::fail("Password must contain a special character (@$!%*?&)");
    }

    PasswordStrength {
        is_valid: true,
        message: "Password is strong".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_minimal_shape() {
        assert!(validate_email("a@b.co"));
        assert!(validate_email("booking.desk@agency.example.com"));
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a b@c.de"));
        assert!(!validate_email("@b.co"));
        assert!(!validate_email("a@@b.co"));
    }

    #[test]
    fn test_validate_email_rejects_overlong() {
        let long = format!("{}@b.co", "x".repeat(260));
        assert!(!validate_email(&long));
    }

    #[test]
    fn test_validate_phone_accepts_formatted_numbers() {
        assert!(validate_phone("+33 1 42 86 82 00"));
        assert!(validate_phone("(212) 555-0142"));
        assert!(validate_phone("15551234567"));
    }

    #[test]
    fn test_validate_phone_rejects_bad_numbers() {
        assert!(!validate_phone("0123456"));
        assert!(!validate_phone("+"));
        assert!(!validate_phone("phone"));
        assert!(!validate_phone("+1234567890123456789"));
    }

    #[test]
    fn test_validate_url_requires_http_scheme() {
        assert!(validate_url("https://example.com"));
        assert!(validate_url("http://example.com/tours?year=2026"));
        assert!(!validate_url("javascript:alert(1)"));
        assert!(!validate_url("ftp://x"));
        assert!(!validate_url("data:text/html,hi"));
        assert!(!validate_url("example.com"));
    }

    #[test]
    fn test_file_type_exact_membership() {
        let file = FileMetadata {
            name: "beach.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size_bytes: 1024,
        };
        assert!(file.is_valid_file_type(&["image/jpeg", "image/png"]));
        assert!(!file.is_valid_file_type(&["image/png"]));
    }

    #[test]
    fn test_file_size_cap() {
        let six_mb = FileMetadata {
            name: "big.png".to_string(),
            content_type: "image/png".to_string(),
            size_bytes: 6 * 1024 * 1024,
        };
        let four_mb = FileMetadata {
            name: "ok.png".to_string(),
            content_type: "image/png".to_string(),
            size_bytes: 4 * 1024 * 1024,
        };
        assert!(!six_mb.is_valid_file_size(5));
        assert!(four_mb.is_valid_file_size(5));
    }

    #[test]
    fn test_password_strength_short_circuits_in_order() {
        assert!(!validate_password_strength("Ab1@").is_valid);
        assert_eq!(
            validate_password_strength("short").message,
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            validate_password_strength("ALLUPPER1@").message,
            "Password must contain a lowercase letter"
        );
        assert_eq!(
            validate_password_strength("alllower1@").message,
            "Password must contain an uppercase letter"
        );
        assert_eq!(
            validate_password_strength("NoDigits@").message,
            "Password must contain a digit"
        );
        assert_eq!(
            validate_password_strength("NoSpecial1").message,
            "Password must contain a special character (@$!%*?&)"
        );
    }

    #[test]
    fn test_password_strength_accepts_all_rules() {
        let result = validate_password_strength("Str0ng!pass");
        assert!(result.is_valid);
    }
}
