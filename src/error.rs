//! Error type shared by all filter engines.
//!
//! Every engine validates its parameters and image shapes before touching
//! any sample, so an `Err` always means no output was produced.

use std::collections::TryReserveError;

use thiserror::Error;

/// Shape of an image as `(channels, height, width)`.
pub type Shape = (usize, usize, usize);

/// Errors returned by the filter engines.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A kernel size, method selector, gamma or factor was out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// Destination (or constructed) image does not match the expected shape.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { expected: Shape, actual: Shape },

    /// A scratch buffer could not be reserved.
    #[error("failed to allocate scratch buffer: {0}")]
    Allocation(#[from] TryReserveError),
}

impl FilterError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        FilterError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Allocate a vector of `len` copies of `value`, reporting allocation failure.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, FilterError> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    buffer.resize(len, value);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = FilterError::invalid("gamma", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "invalid parameter `gamma`: must be positive, got 0"
        );
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = FilterError::ShapeMismatch {
            expected: (1, 4, 4),
            actual: (3, 4, 4),
        };
        assert!(err.to_string().contains("(1, 4, 4)"));
        assert!(err.to_string().contains("(3, 4, 4)"));
    }

    #[test]
    fn test_try_filled_len() {
        let buffer = try_filled(7, 3i16).unwrap();
        assert_eq!(buffer, vec![3i16; 7]);
    }
}
