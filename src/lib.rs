//! # cholr
//!
//! **Dense Cholesky factorization for Hermitian positive-definite matrices.**
//!
//! cholr factors a Hermitian (symmetric) positive-definite matrix into a
//! triangular factor and derives the operations that matter downstream:
//! triangular solve, determinant, log-determinant, inverse, and rank
//! detection through the pivoted variant.
//!
//! ## Why cholr?
//!
//! - **Two algorithms, one surface**: optimized native kernels for the
//!   machine float types, a generic element-wise fallback for any field
//!   with a square root
//! - **Pivoted variant**: greedy diagonal pivoting detects and isolates
//!   rank deficiency instead of failing mid-factorization
//! - **Half-aware**: upper and lower storage are first-class, with
//!   conjugate-transpose extraction between them
//! - **Pure Rust**: native kernels, no BLAS/LAPACK linkage, single binary
//!   deployment
//!
//! ## Quick Start
//!
//! ```
//! use cholr::prelude::*;
//!
//! let a = Matrix::from_vec(vec![4.0, 2.0, 2.0, 3.0], 2, 2)?;
//! let chol = Cholesky::new(a, Uplo::Upper)?;
//!
//! let x = chol.solve_vec(&[1.0, 1.0])?;
//! let det = chol.det();
//! # assert!((det - 8.0).abs() < 1e-12);
//! # Ok::<(), cholr::error::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cholesky;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod permutation;
pub mod pivoted;
pub mod scalar;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cholesky::{Cholesky, Extracted, Selector, Uplo};
    pub use crate::error::{Error, Result};
    pub use crate::matrix::Matrix;
    pub use crate::pivoted::CholeskyPivoted;
    pub use crate::scalar::{cholesky_scalar, Scalar};
}
