//! Error types for cholr

use crate::cholesky::Selector;
use thiserror::Error;

/// Result type alias using cholr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cholr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Factorization input is not square
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// The matrix is not positive definite
    ///
    /// `order` is the order of the first leading principal minor that failed
    /// the factorization, counted from 1.
    #[error("Matrix is not positive definite: leading minor of order {order} failed")]
    NotPositiveDefinite {
        /// Order of the failing leading minor (1-based)
        order: usize,
    },

    /// A pivoted factorization detected rank below the matrix dimension
    #[error("Factorization is rank deficient (kernel status {status})")]
    RankDeficient {
        /// Diagnostic status reported by the factorization kernel
        status: i32,
    },

    /// Extraction was asked for a selector the factorization does not carry
    #[error("Selector {selector:?} is not supported by this factorization")]
    InvalidSelector {
        /// The rejected selector
        selector: Selector,
    },

    /// Square root of a negative or non-real scalar
    #[error("Cholesky of a scalar requires a non-negative real value")]
    Domain,

    /// A triangular factor has a zero diagonal entry
    #[error("Triangular factor is singular at diagonal index {index}")]
    SingularFactor {
        /// Zero-based index of the zero diagonal entry
        index: usize,
    },

    /// Operation needs a native kernel the element type does not provide
    #[error("No native kernel available for this element type in '{op}'")]
    UnsupportedElement {
        /// The operation name
        op: &'static str,
    },
}
