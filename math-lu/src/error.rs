//! Error types for the no-pivot LU factorization.
//!
//! Dimension and layout problems are precondition failures caught at entry,
//! before any data is copied. A singular pivot is only an error under
//! [`SingularPolicy::Strict`](crate::SingularPolicy::Strict).

use thiserror::Error;

/// Errors that can occur while factorizing a matrix.
#[derive(Debug, Error)]
pub enum LuError {
    /// Matrix exceeds the configured row or column limit.
    #[error(
        "matrix of {rows}x{cols} exceeds the configured maximum of {max_rows}x{max_cols}"
    )]
    InvalidDimension {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
        /// Configured row limit
        max_rows: usize,
        /// Configured column limit
        max_cols: usize,
    },

    /// Matrix has no rows or no columns.
    #[error("matrix must have at least one row and one column")]
    EmptyMatrix,

    /// Leading dimension is smaller than the column count.
    #[error("leading dimension {lda} is smaller than the column count {cols}")]
    LeadingDimension {
        /// Stride between consecutive rows
        lda: usize,
        /// Column count
        cols: usize,
    },

    /// Linear buffer is too short for the requested layout.
    #[error("buffer holds {actual} elements, layout requires {required}")]
    BufferTooSmall {
        /// Minimum element count for the layout
        required: usize,
        /// Elements actually provided
        actual: usize,
    },

    /// Row stride times row count does not fit in the address space.
    #[error("layout of {rows}x{cols} with leading dimension {lda} overflows usize")]
    LayoutOverflow {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
        /// Stride between consecutive rows
        lda: usize,
    },

    /// Lane count must be at least one.
    #[error("lane count must be at least 1")]
    InvalidLaneCount,

    /// The pivot at an elimination step is zero, below tolerance, or not finite.
    #[error("singular pivot at elimination step {step} (|a00| = {magnitude:e})")]
    SingularPivot {
        /// Zero-based elimination step
        step: usize,
        /// Magnitude of the offending pivot
        magnitude: f64,
    },

    /// Operation needs a square factorization.
    #[error("operation requires a square matrix, got {rows}x{cols}")]
    NotSquare {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
    },

    /// Right-hand side has the wrong length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Provided length
        got: usize,
    },

    /// Dedicated worker pool could not be created.
    #[error("failed to build lane thread pool: {0}")]
    ThreadPool(String),

    /// Invalid configuration value or unreadable configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A specialized `Result` type for LU operations.
pub type Result<T> = std::result::Result<T, LuError>;

impl LuError {
    /// Returns `true` for shape, stride and buffer-size errors.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            LuError::InvalidDimension { .. }
                | LuError::EmptyMatrix
                | LuError::LeadingDimension { .. }
                | LuError::BufferTooSmall { .. }
                | LuError::LayoutOverflow { .. }
                | LuError::NotSquare { .. }
                | LuError::DimensionMismatch { .. }
        )
    }

    /// Returns `true` if a singular pivot stopped the factorization.
    pub fn is_singular(&self) -> bool {
        matches!(self, LuError::SingularPivot { .. })
    }
}

impl From<serde_json::Error> for LuError {
    fn from(err: serde_json::Error) -> Self {
        LuError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LuError::InvalidDimension {
            rows: 10,
            cols: 4,
            max_rows: 8,
            max_cols: 8,
        };
        assert_eq!(
            err.to_string(),
            "matrix of 10x4 exceeds the configured maximum of 8x8"
        );

        let err = LuError::SingularPivot {
            step: 2,
            magnitude: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "singular pivot at elimination step 2 (|a00| = 0e0)"
        );
    }

    #[test]
    fn test_is_dimension_error() {
        let dim_err = LuError::LeadingDimension { lda: 2, cols: 3 };
        let sing_err = LuError::SingularPivot {
            step: 0,
            magnitude: 0.0,
        };

        assert!(dim_err.is_dimension_error());
        assert!(!sing_err.is_dimension_error());
        assert!(sing_err.is_singular());
        assert!(!LuError::InvalidLaneCount.is_singular());
    }
}
