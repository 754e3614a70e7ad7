//! # Account Repository
//!
//! Database operations for accounts.
//!
//! Email uniqueness is enforced by the UNIQUE index; a duplicate insert
//! surfaces as [`DbError::UniqueViolation`] carrying the offending email,
//! which the service layer translates to its DuplicateAccount error.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use vendio_core::Account;

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Inserts a new account.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, account: &Account) -> DbResult<()> {
        debug!(id = %account.id, "Inserting account");

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (
                id, email, password_hash, first_name, last_name,
                role, enabled, address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.role)
        .bind(account.enabled)
        .bind(&account.address)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match DbError::from(e) {
                // Attach the email so the caller can report which value clashed
                DbError::UniqueViolation { field, .. } => Err(DbError::UniqueViolation {
                    field,
                    value: account.email.clone(),
                }),
                other => Err(other),
            },
        }
    }

    /// Gets an account by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - Account not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT
                id, email, password_hash, first_name, last_name,
                role, enabled, address, created_at, updated_at
            FROM accounts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Gets an account by its login email.
    ///
    /// The login path calls this unconditionally and verifies against a
    /// dummy hash when `None` comes back, so absent and present accounts
    /// cost the same.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT
                id, email, password_hash, first_name, last_name,
                role, enabled, address, created_at, updated_at
            FROM accounts
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Counts registered accounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new account ID.
pub fn generate_account_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn sample_account(email: &str) -> Account {
        let now = Utc::now();
        Account {
            id: generate_account_id(),
            email: email.to_string(),
            password_hash: "$argon2id$fake-hash".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            role: "user".to_string(),
            enabled: true,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.accounts();

        let account = sample_account("jo@example.com");
        repo.insert(&account).await.unwrap();

        let by_email = repo.get_by_email("jo@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, account.id);
        assert_eq!(by_email.password_hash, account.password_hash);

        let by_id = repo.get_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "jo@example.com");

        assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.accounts();

        repo.insert(&sample_account("jo@example.com")).await.unwrap();
        let err = repo
            .insert(&sample_account("jo@example.com"))
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "jo@example.com"),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }
}
