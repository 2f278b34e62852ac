//! # Security Module
//!
//! Authorization for the admin surface: a capability check on every request
//! and a single-use anti-forgery token on the generation form.
//!
//! ## Capability check
//!
//! [`AdminAuth`] is the trait seam; [`ApiKeyAdminAuth`] is the shipped
//! implementation, validating a static admin key from a header or cookie.
//! Anything fancier (sessions, SSO) slots in behind the same trait.
//!
//! ## Anti-forgery tokens
//!
//! [`TokenStore`] issues signed, single-use tokens embedded in the admin form
//! and consumed when the form posts back. A token is a ULID nonce plus the
//! URL-safe base64 SHA-256 of `secret:nonce`; validation recomputes the
//! digest, checks the token was actually issued and not expired, and removes
//! it so replays fail.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose, Engine as _};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use ulid::Ulid;

/// Request context for authorization decisions.
///
/// Carries the extracted credentials without tying providers to the HTTP
/// layer.
pub struct SecurityRequest<'a> {
    pub headers: &'a HashMap<String, String>,
    pub cookies: &'a HashMap<String, String>,
    pub query: &'a HashMap<String, String>,
}

/// Administrative capability check.
pub trait AdminAuth: Send + Sync {
    /// Whether the caller holds the administrative capability.
    fn authorize(&self, req: &SecurityRequest) -> bool;
}

/// Static admin-key provider.
///
/// Accepts the key from the configured header (default `x-admin-key`) or,
/// when configured, from a cookie — browsers submitting the admin form carry
/// the cookie, scripted callers use the header.
pub struct ApiKeyAdminAuth {
    key: String,
    header_name: String,
    cookie_name: Option<String>,
}

impl ApiKeyAdminAuth {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header_name: "x-admin-key".to_string(),
            cookie_name: None,
        }
    }

    /// Change the header the key is read from.
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into().to_ascii_lowercase();
        self
    }

    /// Also accept the key from this cookie.
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    fn extract<'a>(&self, req: &'a SecurityRequest) -> Option<&'a str> {
        if let Some(value) = req.headers.get(&self.header_name) {
            return Some(value);
        }
        if let Some(name) = &self.cookie_name {
            if let Some(value) = req.cookies.get(name) {
                return Some(value);
            }
        }
        None
    }
}

impl AdminAuth for ApiKeyAdminAuth {
    fn authorize(&self, req: &SecurityRequest) -> bool {
        !self.key.is_empty() && self.extract(req) == Some(self.key.as_str())
    }
}

const TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Issues and consumes single-use anti-forgery tokens.
pub struct TokenStore {
    secret: String,
    issued: DashMap<String, Instant>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issued: DashMap::new(),
            ttl: TOKEN_TTL,
        }
    }

    /// Override the token lifetime.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn digest(&self, nonce: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(nonce.as_bytes());
        general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    /// Issue a fresh token for the admin form.
    pub fn issue(&self) -> String {
        // Expired leftovers are purged opportunistically on issue
        let now = Instant::now();
        self.issued
            .retain(|_, issued_at| now.duration_since(*issued_at) < self.ttl);

        let nonce = Ulid::new().to_string();
        let token = format!("{nonce}.{}", self.digest(&nonce));
        self.issued.insert(token.clone(), now);
        token
    }

    /// Consume a submitted token.
    ///
    /// Succeeds at most once per issued token; forged, expired and replayed
    /// tokens all fail.
    pub fn validate(&self, token: &str) -> bool {
        let Some((nonce, digest)) = token.split_once('.') else {
            return false;
        };
        if digest != self.digest(nonce) {
            return false;
        }
        let Some((_, issued_at)) = self.issued.remove(token) else {
            return false;
        };
        issued_at.elapsed() < self.ttl
    }
}
