use crate::error::AppError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::password::constant_time_compare;

/// Default validity horizon for freshly issued tokens.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Number of random salt bytes mixed into the integrity tag.
const SALT_BYTES: usize = 16;

/// Source of randomness for salts and session ids.
///
/// The codec is pure apart from this dependency, so tests substitute a fixed
/// source to get reproducible tokens.
pub trait RandomSource {
    fn random_bytes(&self, len: usize) -> Vec<u8>;
}

/// Default `RandomSource` backed by the thread-local RNG.
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill(&mut bytes[..]);
        bytes
    }
}

/// The claims embedded in a session token.
///
/// Field names follow the persisted wire format (camelCase, millisecond epoch
/// timestamps), which is also what the legacy unsigned tokens carry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    /// Issuance time, milliseconds since epoch.
    pub iat: i64,
    /// Expiry time, milliseconds since epoch.
    pub exp: i64,
    /// Random id for traceability. Not used for revocation.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl TokenPayload {
    /// A payload is expired once its expiry timestamp lies in the past.
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp_millis()
    }
}

/// The outer tamper-evident wrapper around a serialized payload:
/// `hash` is a keyed digest over payload + salt + server secret.
#[derive(Debug, Serialize, Deserialize)]
struct TokenEnvelope {
    payload: String,
    salt: String,
    hash: String,
}

/// Encodes token payloads into opaque, tamper-evident strings and back.
///
/// The token is NOT confidentiality-protected: the payload is recoverable by
/// anyone who base64-decodes it. The integrity tag only makes tampering
/// detectable.
pub struct TokenCodec {
    secret: String,
    ttl: Duration,
    random: Box<dyn RandomSource + Send + Sync>,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
            random: Box::new(SystemRandom),
        }
    }

    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.ttl = Duration::hours(hours);
        self
    }

    pub fn with_random_source(mut self, random: Box<dyn RandomSource + Send + Sync>) -> Self {
        self.random = random;
        self
    }

    fn integrity_tag(&self, payload_json: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload_json.as_bytes());
        hasher.update(salt.as_bytes());
        hasher.update(self.secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Wraps a payload into an opaque token string: base64 of a JSON envelope
    /// `{payload, salt, hash}` with a fresh 16-byte random salt.
    pub fn encrypt_payload(&self, payload: &TokenPayload) -> Result<String, AppError> {
        let payload_json = serde_json::to_string(payload)?;
        let salt = hex::encode(self.random.random_bytes(SALT_BYTES));
        let hash = self.integrity_tag(&payload_json, &salt);

        let envelope = serde_json::to_string(&TokenEnvelope {
            payload: payload_json,
            salt,
            hash,
        })?;

        Ok(BASE64.encode(envelope))
    }

    /// Unwraps a token back into its payload.
    ///
    /// Returns `None` for anything that is not a currently valid token:
    /// malformed base64, invalid JSON, a missing envelope field, an integrity
    /// tag mismatch, or an expired payload. Tokens in the legacy unsigned
    /// format (raw payload, no salt/hash) are still accepted when unexpired.
    pub fn decrypt_payload(&self, token: &str) -> Option<TokenPayload> {
        let value = decode_raw(token)?;

        let has_envelope = value.get("payload").is_some()
            && value.get("salt").is_some()
            && value.get("hash").is_some();

        let payload = if has_envelope {
            let envelope: TokenEnvelope = serde_json::from_value(value).ok()?;
            let expected = self.integrity_tag(&envelope.payload, &envelope.salt);
            if !constant_time_compare(&envelope.hash, &expected) {
                log::warn!("token integrity tag mismatch");
                return None;
            }
            serde_json::from_str::<TokenPayload>(&envelope.payload).ok()?
        } else if value.get("userId").is_some()
            && value.get("iat").is_some()
            && value.get("exp").is_some()
        {
            // Legacy unsigned format: valid but carries no integrity tag.
            serde_json::from_value::<TokenPayload>(value).ok()?
        } else {
            return None;
        };

        if payload.is_expired() {
            return None;
        }

        Some(payload)
    }

    /// Issues a fresh token for a user: new issuance/expiry window, new
    /// random session id, new salt.
    pub fn issue_token(&self, user_id: Uuid, email: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp_millis();
        let session_id = hex::encode(self.random.random_bytes(SALT_BYTES));

        let payload = TokenPayload {
            user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl.num_milliseconds(),
            session_id: Some(session_id),
        };

        self.encrypt_payload(&payload)
    }
}

/// Base64-decodes a token and parses it as JSON, without interpreting it.
/// `None` when the string is not base64-encoded JSON at all.
pub fn decode_raw(token: &str) -> Option<serde_json::Value> {
    let decoded = BASE64.decode(token).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    serde_json::from_str(&decoded).ok()
}

/// Detects tokens persisted in the old unsigned format: a raw JSON payload
/// with a `userId` claim and no integrity hash.
pub fn is_legacy_format(token: &str) -> bool {
    match decode_raw(token) {
        Some(value) => value.get("userId").is_some() && value.get("hash").is_none(),
        None => false,
    }
}
