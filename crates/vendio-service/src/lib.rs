//! # Vendio Service
//!
//! Identity and purchase services over the SQLite store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     vendio-service                      │
//! │                                                         │
//! │  IdentityService          PurchaseCoordinator           │
//! │    register/login/          purchase/restock/           │
//! │    refresh/logout           out-of-stock report         │
//! │        │                        │                       │
//! │  ┌─────┴──────┐                 │                       │
//! │  │ Credential │ TokenIssuer     │                       │
//! │  │ Hasher     │ (JWT HS256)     │                       │
//! │  └─────┬──────┘                 │                       │
//! │        ▼                        ▼                       │
//! │  AccountStore / SessionStore / InventoryLedger (traits) │
//! └────────┴────────────────────────┴───────────────────────┘
//!                          │
//!                     vendio-db (SQLite)
//! ```
//!
//! Time is injected through [`Clock`] everywhere it matters, so token
//! and session expiry are deterministic under test.

pub mod clock;
pub mod config;
pub mod error;
pub mod identity;
pub mod password;
pub mod purchase;
pub mod store;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use identity::IdentityService;
pub use password::CredentialHasher;
pub use purchase::PurchaseCoordinator;
pub use store::{AccountStore, InventoryLedger, SessionStore};
pub use token::{Claims, TokenError, TokenIssuer, TokenKind};

use std::sync::Arc;
use vendio_db::Database;

/// The wired-up service layer.
pub struct Services {
    pub identity: IdentityService,
    pub purchases: PurchaseCoordinator,
}

/// Builds both services over a database with the given config and clock.
pub fn build_services(db: &Database, config: &ServiceConfig, clock: Arc<dyn Clock>) -> Services {
    let tokens = TokenIssuer::new(
        &config.jwt_secret,
        config.jwt_access_ttl_secs,
        config.jwt_refresh_ttl_secs,
        clock.clone(),
    );
    let identity = IdentityService::new(
        Arc::new(db.accounts()),
        Arc::new(db.sessions()),
        CredentialHasher::new(),
        tokens,
        clock,
    );
    let purchases = PurchaseCoordinator::new(Arc::new(db.inventory()));
    Services {
        identity,
        purchases,
    }
}
