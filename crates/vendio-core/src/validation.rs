//! # Validation Module
//!
//! Input validation rules for the identity and purchase flows.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Presentation boundary (deserialization, required fields)  │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (UNIQUE email, CHECK stock >= 0, FK sessions)    │
//! │                                                                     │
//! │  Defense in depth: each layer catches a different failure class.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_STOCK_MOVEMENT, MIN_PASSWORD_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates the shape of a login email.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with non-empty local part
/// - Domain must contain a dot and no whitespace
///
/// This is a shape check, not RFC 5322: the real proof of ownership is a
/// delivery, which is outside this core.
///
/// ## Example
/// ```rust
/// use vendio_core::validation::validate_email;
///
/// assert!(validate_email("jo@example.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// assert!(validate_email("jo@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() {
        return Err(invalid("expected local@domain"));
    }

    if email.chars().any(char::is_whitespace) || domain.contains('@') {
        return Err(invalid("unexpected character"));
    }

    // Domain needs at least one label separator, with labels on both sides
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

/// Validates the registration password policy.
///
/// ## Rules
/// - At least [`MIN_PASSWORD_LENGTH`] characters
///
/// Checked before hashing so weak input never reaches the hasher.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Stock Validators
// =============================================================================

/// Validates a purchase or restock quantity.
///
/// ## Rules
/// - Must be positive
/// - Must not exceed [`MAX_STOCK_MOVEMENT`]
///
/// ## Example
/// ```rust
/// use vendio_core::validation::validate_quantity;
///
/// assert!(validate_quantity(5).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-3).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_STOCK_MOVEMENT {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_STOCK_MOVEMENT,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_normal_addresses() {
        assert!(validate_email("jo@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
        // Surrounding whitespace is trimmed, not rejected
        assert!(validate_email("  jo@example.com  ").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_malformed_addresses() {
        assert!(validate_email("").is_err());
        assert!(validate_email("plainaddress").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jo@").is_err());
        assert!(validate_email("jo@localhost").is_err());
        assert!(validate_email("jo@exam ple.com").is_err());
        assert!(validate_email("jo@.example.com").is_err());
        assert!(validate_email("jo@example.com.").is_err());
    }

    #[test]
    fn test_validate_password_policy() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_STOCK_MOVEMENT).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_STOCK_MOVEMENT + 1).is_err());
    }
}
