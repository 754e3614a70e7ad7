//! # Storage Capabilities
//!
//! The traits the services depend on instead of concrete repositories.
//!
//! ```text
//! IdentityService ──► AccountStore ─────┐
//!                 ──► SessionStore ─────┼──► vendio-db repositories
//! PurchaseCoordinator ► InventoryLedger ┘         (SQLite)
//! ```
//!
//! Each trait is implemented for the corresponding SQLite repository
//! below; tests can substitute their own implementations to exercise
//! failure paths the real store never produces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vendio_core::{Account, Product};
use vendio_db::{
    AccountRepository, InventoryRepository, SessionRepository, StockUpdate,
};

use crate::error::{ServiceError, ServiceResult};

// ============================================================================
// Traits
// ============================================================================

/// Account persistence as seen by the identity service.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, account: &Account) -> ServiceResult<()>;
    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<Account>>;
    async fn find_by_id(&self, id: &str) -> ServiceResult<Option<Account>>;
}

/// Refresh-session persistence.
///
/// A session past its expiry is indistinguishable from one that never
/// existed; both validate to `None`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a refresh session keyed by the token value.
    async fn save(
        &self,
        account_id: &str,
        token: &str,
        expires_at: i64,
        now: DateTime<Utc>,
    ) -> ServiceResult<()>;

    /// Returns the owning account id if the session exists and has not
    /// expired as of `now`.
    async fn validate(&self, token: &str, now: DateTime<Utc>) -> ServiceResult<Option<String>>;

    /// Removes a session. Revoking an unknown token is a no-op.
    async fn revoke(&self, token: &str) -> ServiceResult<()>;
}

/// Stock bookkeeping for the purchase pipeline.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Current stock level. `NotFound` for an unknown product.
    async fn check_stock(&self, product_id: &str) -> ServiceResult<i64>;

    /// Atomically decrements stock and records the sale in one
    /// transaction. Fails with `InsufficientStock` without changing
    /// either counter when stock is short.
    async fn sell(&self, product_id: &str, quantity: i64) -> ServiceResult<()>;

    /// Adds stock back.
    async fn restock(&self, product_id: &str, quantity: i64) -> ServiceResult<()>;

    /// Products with zero stock remaining.
    async fn out_of_stock(&self) -> ServiceResult<Vec<Product>>;
}

// ============================================================================
// SQLite implementations
// ============================================================================

#[async_trait]
impl AccountStore for AccountRepository {
    async fn insert(&self, account: &Account) -> ServiceResult<()> {
        AccountRepository::insert(self, account).await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<Account>> {
        Ok(self.get_by_email(email).await?)
    }

    async fn find_by_id(&self, id: &str) -> ServiceResult<Option<Account>> {
        Ok(self.get_by_id(id).await?)
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn save(
        &self,
        account_id: &str,
        token: &str,
        expires_at: i64,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        SessionRepository::insert(self, account_id, token, expires_at, now).await?;
        Ok(())
    }

    async fn validate(&self, token: &str, now: DateTime<Utc>) -> ServiceResult<Option<String>> {
        Ok(self.find_valid(token, now).await?)
    }

    async fn revoke(&self, token: &str) -> ServiceResult<()> {
        self.delete(token).await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryLedger for InventoryRepository {
    async fn check_stock(&self, product_id: &str) -> ServiceResult<i64> {
        Ok(InventoryRepository::check_stock(self, product_id).await?)
    }

    async fn sell(&self, product_id: &str, quantity: i64) -> ServiceResult<()> {
        match InventoryRepository::sell(self, product_id, quantity).await? {
            StockUpdate::Applied => Ok(()),
            StockUpdate::Insufficient { available } => Err(ServiceError::InsufficientStock {
                product_id: product_id.to_string(),
                available,
                requested: quantity,
            }),
        }
    }

    async fn restock(&self, product_id: &str, quantity: i64) -> ServiceResult<()> {
        InventoryRepository::restock(self, product_id, quantity).await?;
        Ok(())
    }

    async fn out_of_stock(&self) -> ServiceResult<Vec<Product>> {
        Ok(InventoryRepository::out_of_stock(self).await?)
    }
}
