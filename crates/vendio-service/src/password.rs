//! # Credential Hashing
//!
//! Argon2id wrapper for account passwords. Hashes are stored as PHC
//! strings, so the parameters and salt travel with each hash and can be
//! raised later without invalidating old credentials.
//!
//! `verify` never errors: an unparseable stored hash verifies as `false`
//! so a corrupt row degrades to a failed login rather than a 500.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, Params, PasswordVerifier};

use crate::error::{ServiceError, ServiceResult};

/// Syntactically valid Argon2id PHC string that matches no password.
///
/// Login verifies against this when the email is unknown, so the work
/// factor is paid on both paths and response timing does not reveal
/// whether an account exists.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$eHh4eHh4eHh4eHh4eHh4eHh4eHh4eHh4eHh4eHh4eHg";

/// Argon2id password hasher with a pinned configuration.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Hasher with the library defaults (Argon2id, 19 MiB, t=2, p=1).
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hasher with explicit cost parameters. Used to dial the work factor
    /// down in tests.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> ServiceResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| ServiceError::Internal(format!("invalid argon2 params: {e}")))?;
        Ok(Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        })
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> ServiceResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored PHC string.
    pub fn verify(&self, stored_hash: &str, plaintext: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}
