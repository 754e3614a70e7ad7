//! # vendio-db: Database Layer for Vendio
//!
//! SQLite storage for accounts, refresh-token sessions and product stock,
//! built on sqlx.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (account, session, inventory)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vendio_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/vendio.db")).await?;
//!
//! let account = db.accounts().get_by_email("jo@example.com").await?;
//! db.inventory().restock("product-id", 10).await?;
//! ```
//!
//! ## Correctness Note
//!
//! The inventory repository owns the one operation in the system that must
//! be atomic under concurrency: the conditional stock decrement. It is a
//! single conditional `UPDATE`, never a read-then-write pair, and the
//! purchase write pair (decrement + sold counter) runs inside one
//! transaction. See [`repository::inventory`].

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::{generate_account_id, AccountRepository};
pub use repository::inventory::{generate_product_id, InventoryRepository, StockUpdate};
pub use repository::session::SessionRepository;
