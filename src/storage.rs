use std::collections::HashMap;

/// Storage key for the persisted session token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Storage key reserved for a separately issued refresh token. Currently only
/// written at logout-time removal; kept so stale entries from older versions
/// get cleaned up.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Abstract key-value persistence for auth data.
///
/// The session orchestrator only ever talks to this interface, so a real
/// persistent backing store can be substituted without touching the auth or
/// task logic.
pub trait StorageRepository {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);
    fn clear(&mut self);
}

/// Process-local `StorageRepository` backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageRepository for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
