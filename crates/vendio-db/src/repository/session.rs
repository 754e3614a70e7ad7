//! # Session Repository
//!
//! Persistence for refresh-token sessions.
//!
//! ## Session Lifecycle
//! ```text
//! login            ──► insert(token, account_id, expires_at)
//! refresh (rotate) ──► insert(new) then delete(old)
//! logout           ──► delete(token)           (idempotent)
//! expiry           ──► row becomes inert; find_valid filters it out
//!                      in the same query, delete_expired purges lazily
//! ```
//!
//! A found-but-expired token answers exactly like a missing one: callers
//! cannot learn whether it ever existed.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use vendio_core::Session;

/// Repository for refresh-token session records.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Appends a session record.
    ///
    /// Multiple concurrent sessions per account are permitted
    /// (multi-device); the token value itself is the primary key.
    pub async fn insert(
        &self,
        account_id: &str,
        token: &str,
        expires_at: i64,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(account_id = %account_id, "Saving refresh session");

        sqlx::query(
            r#"
            INSERT INTO sessions (token, account_id, expires_at, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(token)
        .bind(account_id)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up a token and checks its expiry in the same query.
    ///
    /// `now` is bound by the caller (the injected clock), not taken from
    /// the database, so expiry boundaries are deterministic in tests.
    ///
    /// ## Returns
    /// * `Ok(Some(account_id))` - Token exists and has not expired
    /// * `Ok(None)` - Unknown or expired token (indistinguishable)
    pub async fn find_valid(&self, token: &str, now: DateTime<Utc>) -> DbResult<Option<String>> {
        let account_id: Option<String> = sqlx::query_scalar(
            r#"
            SELECT account_id FROM sessions
            WHERE token = ?1 AND expires_at > ?2
            "#,
        )
        .bind(token)
        .bind(now.timestamp())
        .fetch_optional(&self.pool)
        .await?;

        Ok(account_id)
    }

    /// Fetches the full session row, expired or not. Test/diagnostic aid.
    pub async fn get(&self, token: &str) -> DbResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token, account_id, expires_at, created_at
            FROM sessions
            WHERE token = ?1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Deletes a session record.
    ///
    /// Revoking an unknown token is a no-op success: logout never fails
    /// from the caller's perspective.
    pub async fn delete(&self, token: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Purges sessions past their expiry. Returns the number removed.
    ///
    /// Purely housekeeping: expired rows are already inert for
    /// [`find_valid`](Self::find_valid).
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        if removed > 0 {
            debug!(removed, "Purged expired sessions");
        }

        Ok(removed)
    }

    /// Counts live sessions for an account (multi-device checks).
    pub async fn count_for_account(&self, account_id: &str, now: DateTime<Utc>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM sessions
            WHERE account_id = ?1 AND expires_at > ?2
            "#,
        )
        .bind(account_id)
        .bind(now.timestamp())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::account::generate_account_id;
    use chrono::Duration;
    use vendio_core::Account;

    async fn db_with_account() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let account = Account {
            id: generate_account_id(),
            email: "jo@example.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            role: "user".to_string(),
            enabled: true,
            address: None,
            created_at: now,
            updated_at: now,
        };
        db.accounts().insert(&account).await.unwrap();
        let id = account.id;
        (db, id)
    }

    #[tokio::test]
    async fn test_valid_session_resolves_account() {
        let (db, account_id) = db_with_account().await;
        let repo = db.sessions();
        let now = Utc::now();
        let expires = (now + Duration::days(1)).timestamp();

        repo.insert(&account_id, "tok-1", expires, now).await.unwrap();

        let resolved = repo.find_valid("tok-1", now).await.unwrap();
        assert_eq!(resolved.as_deref(), Some(account_id.as_str()));
    }

    #[tokio::test]
    async fn test_expired_token_looks_like_missing_token() {
        let (db, account_id) = db_with_account().await;
        let repo = db.sessions();
        let now = Utc::now();

        // Already past expiry at insert time
        let expired = (now - Duration::hours(1)).timestamp();
        repo.insert(&account_id, "tok-old", expired, now).await.unwrap();

        assert!(repo.find_valid("tok-old", now).await.unwrap().is_none());
        assert!(repo.find_valid("tok-never", now).await.unwrap().is_none());

        // The inert row is still there until purged
        assert!(repo.get("tok-old").await.unwrap().is_some());
        assert_eq!(repo.delete_expired(now).await.unwrap(), 1);
        assert!(repo.get("tok-old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expiry_boundary_is_exclusive() {
        let (db, account_id) = db_with_account().await;
        let repo = db.sessions();
        let now = Utc::now();

        // expires_at == now means expired: the check is strictly greater-than
        repo.insert(&account_id, "tok-edge", now.timestamp(), now)
            .await
            .unwrap();
        assert!(repo.find_valid("tok-edge", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (db, account_id) = db_with_account().await;
        let repo = db.sessions();
        let now = Utc::now();
        let expires = (now + Duration::days(1)).timestamp();

        repo.insert(&account_id, "tok-1", expires, now).await.unwrap();
        repo.delete("tok-1").await.unwrap();
        // Second delete of the same token still succeeds
        repo.delete("tok-1").await.unwrap();
        repo.delete("tok-unknown").await.unwrap();

        assert!(repo.find_valid("tok-1", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_multi_device_sessions_coexist() {
        let (db, account_id) = db_with_account().await;
        let repo = db.sessions();
        let now = Utc::now();
        let expires = (now + Duration::days(1)).timestamp();

        repo.insert(&account_id, "tok-phone", expires, now).await.unwrap();
        repo.insert(&account_id, "tok-laptop", expires, now).await.unwrap();

        assert_eq!(repo.count_for_account(&account_id, now).await.unwrap(), 2);
        assert!(repo.find_valid("tok-phone", now).await.unwrap().is_some());
        assert!(repo.find_valid("tok-laptop", now).await.unwrap().is_some());
    }
}
