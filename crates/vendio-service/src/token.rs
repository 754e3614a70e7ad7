//! # Token Issuance
//!
//! HS256 JWT issuance and verification for the access/refresh pair.
//!
//! ```text
//! issue_pair(account_id)
//!        │
//!        ├──► access  token   (short TTL, kind = "access")
//!        └──► refresh token   (long TTL,  kind = "refresh")
//! ```
//!
//! Both tokens carry a `kind` claim and verification checks it, so a
//! refresh token can never be replayed where an access token is expected
//! and vice versa. The algorithm is pinned to HS256 at verification time.
//!
//! Expiry is checked manually against the injected [`Clock`] rather than
//! the library's wall-clock check, so token lifetimes are testable
//! without sleeping.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vendio_core::TokenPair;

use crate::clock::Clock;

// ============================================================================
// Claims
// ============================================================================

/// Which half of the pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claim set carried by both token kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id the token was issued to.
    pub sub: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds. Checked against the injected clock.
    pub exp: i64,
    /// Unique token id. Makes two tokens minted in the same second
    /// distinct, which rotation relies on.
    pub jti: String,
    /// Access or refresh.
    pub kind: TokenKind,
}

// ============================================================================
// Errors
// ============================================================================

/// Token verification and signing failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    Malformed,

    #[error("token is of the wrong kind")]
    WrongKind,

    #[error("token signing failed")]
    Signing,
}

// ============================================================================
// Issuer
// ============================================================================

/// Signs and verifies the access/refresh token pair.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(
        secret: &str,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
            clock,
        }
    }

    /// Seconds a refresh token stays valid. The session row written
    /// alongside it uses the same horizon.
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    /// Mints a fresh access/refresh pair for an account.
    pub fn issue_pair(&self, account_id: &str) -> Result<TokenPair, TokenError> {
        let now = self.clock.now().timestamp();
        Ok(TokenPair {
            access_token: self.sign(account_id, now, self.access_ttl_secs, TokenKind::Access)?,
            refresh_token: self.sign(account_id, now, self.refresh_ttl_secs, TokenKind::Refresh)?,
        })
    }

    /// Verifies an access token and returns its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenKind::Access)
    }

    /// Verifies a refresh token and returns its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenKind::Refresh)
    }

    fn sign(
        &self,
        account_id: &str,
        now: i64,
        ttl_secs: i64,
        kind: TokenKind,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now,
            exp: now + ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
            kind,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        // Pin the algorithm; expiry is ours to check against the clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::Expired);
        }
        if data.claims.kind != expected {
            return Err(TokenError::WrongKind);
        }
        Ok(data.claims)
    }
}
