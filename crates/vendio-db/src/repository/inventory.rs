//! # Inventory Repository
//!
//! Stock and sold-quantity counters, including the one operation in the
//! system that must be atomic under concurrency.
//!
//! ## Why a Conditional UPDATE
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 Overselling Under Concurrency                       │
//! │                                                                     │
//! │  ❌ WRONG: read-then-write                                          │
//! │     A: SELECT stock  → 1          B: SELECT stock → 1              │
//! │     A: UPDATE stock = 0           B: UPDATE stock = 0              │
//! │     Both "succeed", one unit sold twice.                            │
//! │                                                                     │
//! │  ✅ CORRECT: one conditional write                                  │
//! │     UPDATE products SET stock_quantity = stock_quantity - n        │
//! │     WHERE id = ? AND stock_quantity >= n                           │
//! │                                                                     │
//! │     The store serializes the two writers; exactly one matches the   │
//! │     WHERE clause. rows_affected == 0 means "not applied".           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The purchase write pair (decrement + sold counter) runs in a single
//! transaction in [`InventoryRepository::sell`], so a crash between the
//! two writes cannot leave the sold counter under-reported.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use vendio_core::Product;

/// Outcome of a conditional stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockUpdate {
    /// The conditional write matched and was applied.
    Applied,
    /// Stock was below the requested quantity; nothing changed.
    Insufficient {
        /// Stock observed when the condition failed.
        available: i64,
    },
}

/// Repository for product stock operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Inserts a new product with its initial stock record.
    pub async fn insert_product(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, title = %product.title, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, description, price_cents,
                stock_quantity, sold_quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.sold_quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, price_cents,
                stock_quantity, sold_quantity, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Returns the current stock level of a product.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No such product
    pub async fn check_stock(&self, id: &str) -> DbResult<i64> {
        let stock: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        stock.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Decrements stock only if at least `quantity` is available.
    ///
    /// One conditional write, never a read-then-write pair: concurrent
    /// purchasers serialize here and stock cannot go negative.
    ///
    /// ## Returns
    /// * `Ok(StockUpdate::Applied)` - Stock reserved
    /// * `Ok(StockUpdate::Insufficient { available })` - Condition failed
    /// * `Err(DbError::NotFound)` - No such product
    pub async fn decrement_if_available(&self, id: &str, quantity: i64) -> DbResult<StockUpdate> {
        debug!(id = %id, quantity, "Conditional stock decrement");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND stock_quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish "no product" from "not enough stock". The extra
            // read only decides the error kind; correctness was settled by
            // the conditional write above.
            let available = self.check_stock(id).await?;
            return Ok(StockUpdate::Insufficient { available });
        }

        Ok(StockUpdate::Applied)
    }

    /// Increments the cumulative sold counter.
    pub async fn record_sold(&self, id: &str, quantity: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET sold_quantity = sold_quantity + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sells `quantity` units: conditional decrement plus sold-counter
    /// increment as one all-or-nothing transaction.
    ///
    /// This is the purchase pipeline's commit point. Either both writes
    /// land or neither does; a purchaser that loses the race gets
    /// `StockUpdate::Insufficient` and the row is untouched.
    pub async fn sell(&self, id: &str, quantity: i64) -> DbResult<StockUpdate> {
        debug!(id = %id, quantity, "Selling stock");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND stock_quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            tx.rollback().await?;

            return match available {
                Some(available) => Ok(StockUpdate::Insufficient { available }),
                None => Err(DbError::not_found("Product", id)),
            };
        }

        sqlx::query(
            r#"
            UPDATE products
            SET sold_quantity = sold_quantity + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(StockUpdate::Applied)
    }

    /// Unconditional additive stock increment (restocking).
    pub async fn restock(&self, id: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, quantity, "Restocking");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists products whose stock has reached zero.
    pub async fn out_of_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, price_cents,
                stock_quantity, sold_quantity, created_at, updated_at
            FROM products
            WHERE stock_quantity = 0
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_product(stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            title: "Walnut Desk".to_string(),
            description: Some("Solid walnut, 140cm".to_string()),
            price_cents: 24_900,
            stock_quantity: stock,
            sold_quantity: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_check_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();

        let product = sample_product(7);
        repo.insert_product(&product).await.unwrap();

        assert_eq!(repo.check_stock(&product.id).await.unwrap(), 7);
        assert!(matches!(
            repo.check_stock("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_decrement_respects_available_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();

        let product = sample_product(5);
        repo.insert_product(&product).await.unwrap();

        assert_eq!(
            repo.decrement_if_available(&product.id, 3).await.unwrap(),
            StockUpdate::Applied
        );
        assert_eq!(
            repo.decrement_if_available(&product.id, 3).await.unwrap(),
            StockUpdate::Insufficient { available: 2 }
        );
        assert_eq!(repo.check_stock(&product.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_decrement_unknown_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();

        assert!(matches!(
            repo.decrement_if_available("missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_sell_moves_both_counters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();

        let product = sample_product(10);
        repo.insert_product(&product).await.unwrap();

        assert_eq!(repo.sell(&product.id, 4).await.unwrap(), StockUpdate::Applied);

        let after = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_quantity, 6);
        assert_eq!(after.sold_quantity, 4);
    }

    #[tokio::test]
    async fn test_sell_insufficient_changes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();

        let product = sample_product(2);
        repo.insert_product(&product).await.unwrap();

        assert_eq!(
            repo.sell(&product.id, 3).await.unwrap(),
            StockUpdate::Insufficient { available: 2 }
        );

        let after = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_quantity, 2);
        assert_eq!(after.sold_quantity, 0);
    }

    #[tokio::test]
    async fn test_restock_and_out_of_stock_listing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();

        let product = sample_product(1);
        repo.insert_product(&product).await.unwrap();

        assert_eq!(repo.sell(&product.id, 1).await.unwrap(), StockUpdate::Applied);

        let empty = repo.out_of_stock().await.unwrap();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].id, product.id);

        repo.restock(&product.id, 5).await.unwrap();
        assert_eq!(repo.check_stock(&product.id).await.unwrap(), 5);
        assert!(repo.out_of_stock().await.unwrap().is_empty());
    }
}
