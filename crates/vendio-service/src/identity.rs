//! # Identity Service
//!
//! Account registration and the full session lifecycle.
//!
//! ```text
//!  register ──► validate ──► hash ──► AccountStore::insert
//!
//!  login ─────► lookup ──► verify ──► issue pair ──► SessionStore::save
//!
//!  refresh ───► SessionStore::validate ──► issue NEW pair
//!                      │                        │
//!                      │                 save new session
//!                      └──────────────── revoke old session
//!
//!  logout ────► SessionStore::revoke (idempotent)
//! ```
//!
//! ## Rotation
//! Refreshing consumes the presented refresh token: a new pair is minted
//! and persisted, then the old session is revoked. A stolen refresh
//! token is therefore single-use, and replaying it after a legitimate
//! refresh fails with `InvalidSession`.
//!
//! ## Enumeration Resistance
//! Login failures are uniform. Unknown email, wrong password and a
//! disabled account all return `InvalidCredentials`, and the unknown-
//! email path still runs an Argon2 verification against [`DUMMY_HASH`]
//! so the cost profile matches.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use vendio_core::{
    validation::{validate_email, validate_password},
    Account, AccountView, RegisterRequest, TokenPair, ValidationError, DEFAULT_ROLE,
};
use vendio_db::generate_account_id;

use crate::clock::Clock;
use crate::error::{ServiceError, ServiceResult};
use crate::password::{CredentialHasher, DUMMY_HASH};
use crate::store::{AccountStore, SessionStore};
use crate::token::TokenIssuer;

/// Account registration and session lifecycle.
pub struct IdentityService {
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: CredentialHasher,
    tokens: TokenIssuer,
    clock: Arc<dyn Clock>,
}

impl IdentityService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
        hasher: CredentialHasher,
        tokens: TokenIssuer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            hasher,
            tokens,
            clock,
        }
    }

    /// Creates a new account from a registration request.
    ///
    /// The returned view never contains the password hash. A duplicate
    /// email surfaces as [`ServiceError::DuplicateAccount`].
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AccountView> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        require_name("first_name", &request.first_name)?;
        require_name("last_name", &request.last_name)?;

        let now = self.clock.now();
        let account = Account {
            id: generate_account_id(),
            email: request.email.trim().to_lowercase(),
            password_hash: self.hasher.hash(&request.password)?,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            role: DEFAULT_ROLE.to_string(),
            enabled: true,
            address: request.address,
            created_at: now,
            updated_at: now,
        };

        self.accounts.insert(&account).await?;
        info!(account_id = %account.id, "Account registered");

        Ok(account.into())
    }

    /// Authenticates an email/password pair and opens a session.
    ///
    /// On success returns a fresh token pair; the refresh token is
    /// persisted as a session row expiring on the refresh horizon.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<TokenPair> {
        let email = email.trim().to_lowercase();
        let account = self.accounts.find_by_email(&email).await?;

        // Verify on both branches so timing does not leak existence
        let verified = match &account {
            Some(acct) => self.hasher.verify(&acct.password_hash, password),
            None => {
                self.hasher.verify(DUMMY_HASH, password);
                false
            }
        };

        let Some(account) = account else {
            debug!("Login attempt for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };
        if !verified {
            debug!(account_id = %account.id, "Login attempt with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }
        if !account.enabled {
            warn!(account_id = %account.id, "Login attempt on disabled account");
            return Err(ServiceError::InvalidCredentials);
        }

        let pair = self
            .tokens
            .issue_pair(&account.id)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.open_session(&account.id, &pair.refresh_token).await?;

        info!(account_id = %account.id, "Login succeeded");
        Ok(pair)
    }

    /// Exchanges a valid refresh token for a new token pair.
    ///
    /// Rotation order matters: the new session is persisted before the
    /// old one is revoked, so a crash between the two steps leaves the
    /// client with at least one working token rather than none.
    pub async fn refresh_access(&self, refresh_token: &str) -> ServiceResult<TokenPair> {
        // Signature and expiry first; no store round-trip for garbage
        if self.tokens.verify_refresh(refresh_token).is_err() {
            return Err(ServiceError::InvalidSession);
        }

        let now = self.clock.now();
        let Some(account_id) = self.sessions.validate(refresh_token, now).await? else {
            debug!("Refresh with unknown or revoked session");
            return Err(ServiceError::InvalidSession);
        };

        let pair = self
            .tokens
            .issue_pair(&account_id)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.open_session(&account_id, &pair.refresh_token).await?;

        if let Err(err) = self.sessions.revoke(refresh_token).await {
            // The replacement row is already persisted but never reached
            // the client; it stays valid in the store until expiry.
            warn!(
                account_id = %account_id,
                error = %err,
                "Failed to revoke rotated session; undelivered replacement remains in store"
            );
            return Err(err);
        }

        debug!(account_id = %account_id, "Session rotated");
        Ok(pair)
    }

    /// Revokes a refresh session. Logging out an already-revoked or
    /// unknown token succeeds silently.
    pub async fn logout(&self, refresh_token: &str) -> ServiceResult<()> {
        self.sessions.revoke(refresh_token).await?;
        debug!("Session revoked");
        Ok(())
    }

    /// Fetches the public view of an account.
    pub async fn profile(&self, account_id: &str) -> ServiceResult<AccountView> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .map(AccountView::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Account {account_id}")))
    }

    async fn open_session(&self, account_id: &str, refresh_token: &str) -> ServiceResult<()> {
        let now = self.clock.now();
        let expires_at = (now + Duration::seconds(self.tokens.refresh_ttl_secs())).timestamp();
        self.sessions
            .save(account_id, refresh_token, expires_at, now)
            .await
    }
}

fn require_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}
