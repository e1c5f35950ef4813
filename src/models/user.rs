use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account in the in-memory directory.
///
/// The password hash never crosses the auth service boundary: every user object
/// handed to callers goes through [`User::blanked`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    /// Deactivated users are excluded from login and token verification.
    pub is_active: bool,
}

impl User {
    /// Returns a copy with the password hash overwritten by an empty string,
    /// safe to hand across the auth service boundary.
    pub fn blanked(&self) -> User {
        User {
            password_hash: String::new(),
            ..self.clone()
        }
    }
}
