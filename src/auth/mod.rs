pub mod password;
pub mod service;
pub mod token;

use crate::models::User;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use token::{RandomSource, SystemRandom, TokenCodec, TokenPayload};

lazy_static! {
    // Regex for name validation: letters (including accented) and spaces
    static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-ZÀ-ÿ\s]+$").unwrap();
}

/// Generic error message for any login failure. Deliberately identical for
/// "no such user", "inactive user", and "wrong password" so callers cannot
/// enumerate registered accounts.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Error message for a registration attempt against an existing email.
pub const EMAIL_ALREADY_EXISTS: &str = "Email is already in use";

/// Generic message for unexpected internal failures.
pub const SERVER_ERROR: &str = "Internal server error";

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Represents the payload for a user login request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginCredentials {
    /// User's email address.
    #[validate(email)]
    pub email: String,
    /// User's password.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterData {
    /// Display name for the new account.
    /// Must be between 2 and 100 characters, letters and spaces only.
    #[validate(
        length(min = 2, max = 100),
        regex(
            path = "NAME_REGEX",
            message = "Name must contain only letters and spaces"
        )
    )]
    pub name: String,
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email, length(max = 254))]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Outcome of a login or registration attempt.
///
/// On success `user` is present with its password hash blanked; on failure
/// `error` carries a user-facing message. Neither failure path ever panics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResult {
    pub fn ok(user: User) -> Self {
        Self {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            error: Some(message.into()),
        }
    }
}
