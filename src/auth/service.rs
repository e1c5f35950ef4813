use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::models::User;

use super::password::{hash_password, verify_password};
use super::token::TokenCodec;
use super::{
    AuthResult, LoginCredentials, RegisterData, EMAIL_ALREADY_EXISTS, INVALID_CREDENTIALS,
    PASSWORD_MIN_LENGTH,
};

/// In-memory user directory plus the login/registration/token-verification
/// operations over it. This is the entire "database" for the crate's scope.
///
/// Every `User` returned from this service has its password hash blanked;
/// the stored hashes never leave the directory.
pub struct AuthService {
    users: Vec<User>,
    codec: TokenCodec,
    secret: String,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self::with_users(config, Vec::new())
    }

    /// Builds a service over a pre-seeded directory. Used by tests and the
    /// demo binary.
    pub fn with_users(config: &Config, users: Vec<User>) -> Self {
        Self {
            users,
            codec: TokenCodec::new(&config.token_secret).with_ttl_hours(config.token_ttl_hours),
            secret: config.token_secret.clone(),
        }
    }

    /// Authenticates a user by email and password.
    ///
    /// Absent users, deactivated users, and wrong passwords all fail with the
    /// same generic message so the responses cannot be used to probe which
    /// emails are registered.
    pub async fn login(&self, credentials: &LoginCredentials) -> AuthResult {
        let user = self
            .users
            .iter()
            .find(|u| u.email == credentials.email && u.is_active);

        let Some(user) = user else {
            return AuthResult::failure(INVALID_CREDENTIALS);
        };

        if !verify_password(&credentials.password, &self.secret, &user.password_hash) {
            return AuthResult::failure(INVALID_CREDENTIALS);
        }

        AuthResult::ok(user.blanked())
    }

    /// Registers a new user.
    ///
    /// Validates the input, rejects duplicate emails, normalizes the name
    /// (trim) and email (trim + lowercase), hashes the password, and appends
    /// the new account to the directory.
    pub async fn register(&mut self, data: &RegisterData) -> AuthResult {
        if let Err(errors) = data.validate() {
            let fields = errors.field_errors();
            if fields.contains_key("email") {
                return AuthResult::failure(INVALID_CREDENTIALS);
            }
            if fields.contains_key("password") {
                return AuthResult::failure(format!(
                    "Password must be at least {} characters",
                    PASSWORD_MIN_LENGTH
                ));
            }
            return AuthResult::failure("Name must be 2-100 letters and spaces");
        }

        let email = data.email.trim().to_lowercase();

        if self.users.iter().any(|u| u.email == email) {
            return AuthResult::failure(EMAIL_ALREADY_EXISTS);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name.trim().to_string(),
            email,
            password_hash: hash_password(&data.password, &self.secret),
            created_at: Utc::now(),
            is_active: true,
        };

        self.users.push(user.clone());
        log::info!("registered user {}", user.id);

        AuthResult::ok(user.blanked())
    }

    /// Resolves a token to its user: `None` when the token is invalid,
    /// expired, or points at a missing or deactivated account.
    pub async fn verify_token(&self, token: &str) -> Option<User> {
        let payload = self.codec.decrypt_payload(token)?;

        self.users
            .iter()
            .find(|u| u.id == payload.user_id && u.is_active)
            .map(User::blanked)
    }

    /// Exchanges a valid token for a brand-new one (fresh salt, fresh
    /// issuance/expiry window). `None` when the old token does not verify.
    pub async fn refresh_token(&self, token: &str) -> Option<String> {
        let payload = self.codec.decrypt_payload(token)?;

        let user = self
            .users
            .iter()
            .find(|u| u.id == payload.user_id && u.is_active)?;

        match self.codec.issue_token(user.id, &user.email) {
            Ok(new_token) => Some(new_token),
            Err(e) => {
                log::error!("failed to issue refreshed token: {}", e);
                None
            }
        }
    }

    /// The full directory, password hashes blanked.
    pub fn get_users(&self) -> Vec<User> {
        self.users.iter().map(User::blanked).collect()
    }
}
