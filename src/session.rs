//!
//! # Session Orchestrator
//!
//! Process-wide authentication state: which user is signed in, whether a
//! startup restore is in flight, and the persisted-token lifecycle (legacy
//! migration, stale-token cleanup, restore, logout purge).
//!
//! The orchestrator is held behind an explicit [`SessionHandle`] that gets
//! passed into the task orchestrator's constructor; there is no ambient
//! global to reach into.

use std::cell::RefCell;
use std::rc::Rc;

use crate::auth::token::{self, TokenCodec};
use crate::auth::{AuthResult, AuthService, LoginCredentials, RegisterData, SERVER_ERROR};
use crate::config::Config;
use crate::models::User;
use crate::storage::{StorageRepository, AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Shared single-threaded handle to the session orchestrator.
pub type SessionHandle = Rc<RefCell<SessionOrchestrator>>;

pub struct SessionOrchestrator {
    auth: AuthService,
    codec: TokenCodec,
    storage: Box<dyn StorageRepository>,
    user: Option<User>,
    is_authenticated: bool,
    is_loading: bool,
}

impl SessionOrchestrator {
    pub fn new(config: &Config, storage: Box<dyn StorageRepository>) -> Self {
        Self::with_auth_service(config, AuthService::new(config), storage)
    }

    /// Builds the orchestrator around a pre-seeded auth service. Used by
    /// tests and the demo binary.
    pub fn with_auth_service(
        config: &Config,
        auth: AuthService,
        storage: Box<dyn StorageRepository>,
    ) -> Self {
        Self {
            auth,
            codec: TokenCodec::new(&config.token_secret).with_ttl_hours(config.token_ttl_hours),
            storage,
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }

    pub fn into_handle(self) -> SessionHandle {
        Rc::new(RefCell::new(self))
    }

    /// Startup sequence, run once at application start.
    ///
    /// Order matters: legacy tokens are migrated away first, then any stored
    /// token failing integrity/expiry verification is dropped, and only then
    /// is a surviving token resolved to a user. Any failure leaves the
    /// session unauthenticated with the persisted auth data cleared.
    pub async fn initialize(&mut self) {
        self.is_loading = true;

        self.migrate_legacy_tokens();
        self.clear_invalid_tokens();

        if let Some(stored) = self.storage.get_item(AUTH_TOKEN_KEY) {
            match self.auth.verify_token(&stored).await {
                Some(user) => {
                    self.user = Some(user);
                    self.is_authenticated = true;
                }
                None => {
                    log::warn!("stored token failed verification, clearing auth data");
                    self.clear_auth_data();
                }
            }
        }

        self.is_loading = false;
    }

    /// Purges tokens persisted in the old unsigned format (or ones that are
    /// not readable at all), forcing a fresh login.
    fn migrate_legacy_tokens(&mut self) {
        let Some(stored) = self.storage.get_item(AUTH_TOKEN_KEY) else {
            return;
        };

        if token::decode_raw(&stored).is_none() {
            log::warn!("unreadable stored token, removing");
            self.storage.remove_item(AUTH_TOKEN_KEY);
        } else if token::is_legacy_format(&stored) {
            log::info!("legacy token detected, removing to force a fresh login");
            self.storage.remove_item(AUTH_TOKEN_KEY);
        }
    }

    /// Drops any persisted token that no longer passes integrity and expiry
    /// checks, for both the auth and refresh keys.
    fn clear_invalid_tokens(&mut self) {
        for key in [AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Some(stored) = self.storage.get_item(key) {
                if self.codec.decrypt_payload(&stored).is_none() {
                    log::warn!("removing invalid token under {}", key);
                    self.storage.remove_item(key);
                }
            }
        }
    }

    /// Logs in through the auth service; on success mints and persists a
    /// session token and updates the in-memory state.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> AuthResult {
        self.is_loading = true;
        let result = self.auth.login(credentials).await;
        let result = self.establish_session(result);
        self.is_loading = false;
        result
    }

    /// Registers through the auth service; same session establishment as
    /// [`login`](Self::login).
    pub async fn register(&mut self, data: &RegisterData) -> AuthResult {
        self.is_loading = true;
        let result = self.auth.register(data).await;
        let result = self.establish_session(result);
        self.is_loading = false;
        result
    }

    fn establish_session(&mut self, result: AuthResult) -> AuthResult {
        if !result.success {
            return result;
        }
        let Some(user) = &result.user else {
            return result;
        };

        match self.codec.issue_token(user.id, &user.email) {
            Ok(token) => {
                self.storage.set_item(AUTH_TOKEN_KEY, &token);
                self.user = Some(user.clone());
                self.is_authenticated = true;
                result
            }
            Err(e) => {
                // Token minting failed: report a generic server error instead
                // of leaving a half-established session.
                log::error!("failed to issue session token: {}", e);
                AuthResult::failure(SERVER_ERROR)
            }
        }
    }

    /// Clears the persisted tokens and the in-memory session. Never fails.
    pub fn logout(&mut self) {
        self.clear_auth_data();
    }

    /// Renews the persisted token through the auth service. `false` when no
    /// token is persisted or the stored one no longer verifies.
    pub async fn refresh_token(&mut self) -> bool {
        let Some(current) = self.storage.get_item(AUTH_TOKEN_KEY) else {
            return false;
        };

        match self.auth.refresh_token(&current).await {
            Some(renewed) => {
                self.storage.set_item(AUTH_TOKEN_KEY, &renewed);
                true
            }
            None => false,
        }
    }

    fn clear_auth_data(&mut self) {
        self.storage.remove_item(AUTH_TOKEN_KEY);
        self.storage.remove_item(REFRESH_TOKEN_KEY);
        self.user = None;
        self.is_authenticated = false;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The underlying storage, exposed so callers (and tests) can observe
    /// the persisted-token lifecycle.
    pub fn storage(&self) -> &dyn StorageRepository {
        self.storage.as_ref()
    }
}
