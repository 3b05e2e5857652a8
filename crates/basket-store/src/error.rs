//! # Store Error Types
//!
//! Errors raised by storage backends. Note that [`crate::CartStore`]
//! itself swallows these by policy: reads degrade to an empty cart and
//! write failures are logged. The typed errors exist so backends can
//! report precisely and so tests can assert on failure modes.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not read the requested key.
    #[error("Storage read failed for key '{key}': {reason}")]
    ReadFailed { key: String, reason: String },

    /// The backend could not write the key (quota, permissions, disk).
    #[error("Storage write failed for key '{key}': {reason}")]
    WriteFailed { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = StoreError::WriteFailed {
            key: "basket.cart".to_string(),
            reason: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Storage write failed for key 'basket.cart': quota exceeded"
        );
    }
}
