use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username regex"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// User entity - an account allowed to perform write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    ///
    /// `password_hash` must already be hashed; plaintext never reaches this type.
    pub fn new(
        username: &str,
        email: &str,
        password_hash: String,
        full_name: Option<String>,
    ) -> Result<Self, DomainError> {
        let username = validate_username(username)?;
        let email = normalize_email(email)?;
        if password_hash.trim().is_empty() {
            return Err(DomainError::validation("Password hash cannot be empty"));
        }
        let full_name = validate_full_name(full_name)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            full_name,
            is_active: true,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_password_hash(&mut self, password_hash: String) -> Result<(), DomainError> {
        if password_hash.trim().is_empty() {
            return Err(DomainError::validation("Password hash cannot be empty"));
        }
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn activate(&mut self) {
        if !self.is_active {
            self.is_active = true;
            self.updated_at = Utc::now();
        }
    }

    pub fn deactivate(&mut self) {
        if self.is_active {
            self.is_active = false;
            self.updated_at = Utc::now();
        }
    }
}

/// Trim and check a username: 3-50 of `[a-zA-Z0-9_]`, no leading or trailing underscore.
pub fn validate_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    let len = username.chars().count();
    if len < 3 {
        return Err(DomainError::validation(
            "Username must be at least 3 characters long",
        ));
    }
    if len > 50 {
        return Err(DomainError::validation("Username cannot exceed 50 characters"));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(DomainError::validation(
            "Username can only contain letters, numbers, and underscores",
        ));
    }
    if username.starts_with('_') || username.ends_with('_') {
        return Err(DomainError::validation(
            "Username cannot start or end with underscore",
        ));
    }
    Ok(username.to_string())
}

/// Trim, lower-case and syntax-check an email address.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(DomainError::validation("Email cannot be empty"));
    }
    if email.len() > 255 {
        return Err(DomainError::validation("Email cannot exceed 255 characters"));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(DomainError::validation("Email must have a valid format"));
    }
    Ok(email)
}

fn validate_full_name(full_name: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(name) = full_name else {
        return Ok(None);
    };
    let name = name.trim();
    if name.chars().count() > 100 {
        return Err(DomainError::validation("Full name cannot exceed 100 characters"));
    }
    Ok((!name.is_empty()).then(|| name.to_string()))
}

/// Password complexity rules applied before hashing.
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < 8 {
        return Err(DomainError::validation(
            "Password must be at least 8 characters long",
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(DomainError::validation(
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(DomainError::validation(
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(
            "Password must contain at least one digit",
        ));
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(DomainError::validation(
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_fields() {
        let user = User::new(
            "  john_doe ",
            "John@Example.COM ",
            "hash".into(),
            Some("  ".into()),
        )
        .unwrap();

        assert_eq!(user.username, "john_doe");
        assert_eq!(user.email, "john@example.com");
        assert_eq!(user.full_name, None);
        assert!(user.is_active);
        assert!(!user.is_superuser);
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("_leading").is_err());
        assert!(validate_username("trailing_").is_err());
        assert!(validate_username("ok_name_42").is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(normalize_email("user@example.com").is_ok());
        assert!(normalize_email("user@localhost").is_err());
        assert!(normalize_email("no-at-sign.com").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("SecurePass123!").is_ok());
        assert!(validate_password_strength("Sh0rt!").is_err());
        assert!(validate_password_strength("lowercase123!").is_err());
        assert!(validate_password_strength("UPPERCASE123!").is_err());
        assert!(validate_password_strength("NoDigitsHere!").is_err());
        assert!(validate_password_strength("NoSpecial123").is_err());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new("alice", "alice@example.com", "secret-hash".into(), None).unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
