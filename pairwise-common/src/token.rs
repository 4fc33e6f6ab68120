//! Bearer token minting and verification
//!
//! Tokens are opaque strings of the form `subject.issued.expires.sig`
//! where `sig` is the SHA-256 of the payload concatenated with a
//! per-process random secret, hex encoded. Verification is stateless;
//! rotating the secret invalidates every outstanding token.

use sha2::{Digest, Sha256};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Token verification error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token does not have the expected shape
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the payload
    #[error("invalid token signature")]
    BadSignature,

    /// Token expiry is in the past
    #[error("token expired")]
    Expired,
}

/// Claims recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    /// Unix epoch milliseconds
    pub issued_at: i64,
    /// Unix epoch milliseconds
    pub expires_at: i64,
}

/// Mints and verifies signed, time-boxed bearer tokens.
pub struct TokenSigner {
    secret: [u8; 32],
}

impl TokenSigner {
    /// Create a signer with a fresh random secret
    pub fn new() -> Self {
        Self {
            secret: rand::random(),
        }
    }

    /// Replace the signing secret, invalidating all outstanding tokens
    pub fn rotate(&mut self) {
        self.secret = rand::random();
    }

    /// Mint a token for `subject` valid for `ttl` from now
    pub fn mint(&self, subject: &str, ttl: Duration) -> String {
        let issued_at = now_millis();
        let expires_at = issued_at + ttl.as_millis() as i64;
        let payload = format!("{}.{}.{}", subject, issued_at, expires_at);
        let sig = self.sign(&payload);
        format!("{}.{}", payload, sig)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        // Split from the right so the subject may contain dots
        let mut parts = token.rsplitn(4, '.');
        let sig = parts.next().ok_or(TokenError::Malformed)?;
        let expires_at: i64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(TokenError::Malformed)?;
        let issued_at: i64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(TokenError::Malformed)?;
        let subject = parts.next().ok_or(TokenError::Malformed)?;
        if subject.is_empty() {
            return Err(TokenError::Malformed);
        }

        let payload = format!("{}.{}.{}", subject, issued_at, expires_at);
        if self.sign(&payload) != sig {
            return Err(TokenError::BadSignature);
        }

        if now_millis() > expires_at {
            return Err(TokenError::Expired);
        }

        Ok(TokenClaims {
            subject: subject.to_string(),
            issued_at,
            expires_at,
        })
    }

    fn sign(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hasher.update(self.secret);
        format!("{:x}", hasher.finalize())
    }
}

impl Default for TokenSigner {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}
