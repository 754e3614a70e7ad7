//! # Domain Types
//!
//! Core domain types used throughout the Vendio backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Account      │   │    Session      │   │    Product      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │   │  token (PK)     │   │  id (UUID)      │   │
//! │  │  email (unique) │   │  account_id     │   │  stock_quantity │   │
//! │  │  password_hash  │   │  expires_at     │   │  sold_quantity  │   │
//! │  │  role, enabled  │   │  created_at     │   │  price_cents    │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! │                                                                     │
//! │  AccountView = Account minus the password hash. The hash never      │
//! │  crosses the service boundary.                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Entities use UUID v4 string ids: globally unique without coordination,
//! generated server-side before insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Account
// =============================================================================

/// A registered account.
///
/// Carries the password hash for internal verification; use [`AccountView`]
/// for anything that leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login email. Unique across all accounts.
    pub email: String,

    /// Argon2id PHC-format password hash. Never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Authorization role, e.g. `user` or `admin`.
    pub role: String,

    /// Disabled accounts cannot authenticate.
    pub enabled: bool,

    /// Optional shipping address.
    pub address: Option<String>,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The outward-facing projection of an [`Account`].
///
/// This is what `register` and `profile` return: everything except the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccountView {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub enabled: bool,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        AccountView {
            id: account.id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            role: account.role,
            enabled: account.enabled,
            address: account.address,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
}

// =============================================================================
// Session
// =============================================================================

/// A persisted refresh-token session.
///
/// One row per issued refresh token; an account may hold several at once
/// (multi-device). Expiry is unix seconds so SQL comparisons against a
/// bound `now` are exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Session {
    /// The refresh token value. Primary key: at most one lookup per token.
    pub token: String,

    /// Owning account id.
    pub account_id: String,

    /// Expiry as unix seconds. A row past this instant is inert even
    /// before it is purged.
    pub expires_at: i64,

    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// An access/refresh token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

// =============================================================================
// Product
// =============================================================================

/// A sellable product with its stock record.
///
/// `stock_quantity` never goes negative: the only way down is the
/// conditional decrement in the inventory repository. `sold_quantity` is
/// cumulative and only moves up outside administrative corrections.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display title.
    pub title: String,

    /// Optional description.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit). Never floats.
    pub price_cents: i64,

    /// Available sellable quantity. Always >= 0.
    pub stock_quantity: i64,

    /// Cumulative units sold, for reporting.
    pub sold_quantity: i64,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_view_drops_password_hash() {
        let account = Account {
            id: "a-1".to_string(),
            email: "jo@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            role: "user".to_string(),
            enabled: true,
            address: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let view = AccountView::from(account);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("jo@example.com"));
    }

    #[test]
    fn account_serialization_skips_hash() {
        let account = Account {
            id: "a-1".to_string(),
            email: "jo@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            role: "user".to_string(),
            enabled: true,
            address: Some("12 Elm St".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
    }
}
