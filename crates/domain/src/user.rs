//! User account value types and validation rules.

use eleads_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Maximum accepted email length (RFC 5321 path limit).
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length. Bounds Argon2 work per request.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// The check is structural only: one `@`, non-empty local part and a
    /// dotted domain.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let normalized = value.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::Validation("email is required".to_owned()));
        }

        if normalized.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "email must not exceed {EMAIL_MAX_LENGTH} characters"
            )));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(AppError::Validation("email must contain '@'".to_owned()));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(AppError::Validation("email address is malformed".to_owned()));
        }

        let domain_is_dotted = domain
            .split('.')
            .all(|label| !label.is_empty())
            && domain.contains('.');
        if !domain_is_dotted {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// First and last name of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    first_name: NonEmptyString,
    last_name: NonEmptyString,
}

impl PersonName {
    /// Creates a validated person name.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            first_name: NonEmptyString::for_field("first name", first_name)?,
            last_name: NonEmptyString::for_field("last name", last_name)?,
        })
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }
}

/// Validates a plaintext password before it is hashed.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.iter().any(|entry| *entry == lowered) {
        return Err(AppError::Validation("this password is too common".to_owned()));
    }

    Ok(())
}

static COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwertyuiop",
    "qwerty123",
    "iloveyou",
    "sunshine",
    "football",
    "baseball",
    "letmein1",
    "welcome1",
    "trustno1",
    "superman",
    "passw0rd",
];
