//! # vendio-core: Pure Domain Logic for Vendio
//!
//! This crate is the heart of the Vendio backend. It contains the domain
//! types, validation rules and error taxonomy shared by every other crate,
//! as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Vendio Data Flow                              │
//! │                                                                     │
//! │  HTTP boundary (external collaborator)                             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  vendio-service  (IdentityService, PurchaseCoordinator)            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ★ vendio-core (THIS CRATE) ★                                       │
//! │                                                                     │
//! │   ┌───────────┐    ┌─────────────┐    ┌───────────┐                │
//! │   │   types   │    │ validation  │    │   error   │                │
//! │   │  Account  │    │ email rules │    │ domain    │                │
//! │   │  Product  │    │ pw policy   │    │ variants  │                │
//! │   └───────────┘    └─────────────┘    └───────────┘                │
//! │                                                                     │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS               │
//! │                                                                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  vendio-db  (SQLite repositories)                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Prices are cents (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum accepted password length for registration.
///
/// Checked before hashing so rejected input never reaches the hasher.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Role assigned to freshly registered accounts.
pub const DEFAULT_ROLE: &str = "user";

/// Maximum quantity a single purchase or restock may move.
///
/// Guards against fat-finger requests (e.g. typing 1000 instead of 10).
pub const MAX_STOCK_MOVEMENT: i64 = 999;
