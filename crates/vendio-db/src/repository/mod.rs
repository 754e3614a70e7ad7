//! # Repository Module
//!
//! Database repository implementations for Vendio.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Service layer                                                      │
//! │       │                                                             │
//! │       │  db.inventory().sell("product-id", 3)                       │
//! │       ▼                                                             │
//! │  InventoryRepository        SQL isolated in one place               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`account::AccountRepository`] - Account persistence and lookup
//! - [`session::SessionRepository`] - Refresh-token session records
//! - [`inventory::InventoryRepository`] - Stock and sold-quantity counters

pub mod account;
pub mod inventory;
pub mod session;
