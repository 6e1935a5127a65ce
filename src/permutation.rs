//! Permutation helpers for the pivoted factorization
//!
//! Permutations are explicit index arrays: `perm[i]` is the source index of
//! the element that lands at position `i`. Applying a permutation to rows is
//! an indexed gather; inverting it is a single scatter pass whose result is
//! reused rather than recomputed.

use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Build the inverse index array: `inv[perm[i]] = i`
pub fn invert(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inv[p] = i;
    }
    inv
}

/// Gather rows: `out[i, :] = b[perm[i], :]`
pub fn gather_rows<T: Scalar>(b: &Matrix<T>, perm: &[usize]) -> Matrix<T> {
    let mut out = Matrix::zeros(b.rows(), b.cols());
    for (i, &p) in perm.iter().enumerate() {
        for j in 0..b.cols() {
            out.set(i, j, b.get(p, j));
        }
    }
    out
}

/// Permutation matrix `P` with `P[i, perm[i]] = 1`.
///
/// With this convention `P * A * P^H` is the matrix whose `(i, j)` entry is
/// `A[perm[i], perm[j]]`, the row-and-column permuted matrix the pivoted
/// factorization actually decomposes.
pub fn permutation_matrix<T: Scalar>(perm: &[usize]) -> Matrix<T> {
    let n = perm.len();
    let mut out = Matrix::zeros(n, n);
    for (i, &p) in perm.iter().enumerate() {
        out.set(i, p, T::one());
    }
    out
}
