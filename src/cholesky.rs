//! Plain Cholesky factorization and its derived operations
//!
//! [`Cholesky::new`] consumes a square Hermitian positive-definite matrix
//! and overwrites it in place with the triangular factor for the requested
//! half. The result owns the buffer and never mutates it again; solves that
//! overwrite a right-hand side do so only on caller-supplied buffers through
//! the `*_in_place` entry points.
//!
//! Element types with a native kernel (`f32`, `f64`, `Complex<f32>`,
//! `Complex<f64>`) take the optimized path; every other [`Scalar`] runs the
//! element-wise algorithm, which only needs field arithmetic and a square
//! root.

use crate::error::{Error, Result};
use crate::matrix::{validate_rhs, validate_square, Matrix};
use crate::scalar::Scalar;
use num_traits::{Float, One, Zero};

/// Which triangle of the storage holds the factor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Uplo {
    /// Upper triangular: `U^H * U` reconstructs the input
    Upper,
    /// Lower triangular: `L * L^H` reconstructs the input
    Lower,
}

/// What to extract from a factorization result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    /// The upper triangular factor, conjugate-transposing if stored lower
    Upper,
    /// The lower triangular factor, conjugate-transposing if stored upper
    Lower,
    /// The factor exactly as stored
    Stored,
    /// The permutation matrix (pivoted results only)
    Permutation,
    /// The raw pivot vector (pivoted results only)
    Pivot,
}

/// An extracted view materialized from a factorization result
#[derive(Clone, Debug, PartialEq)]
pub enum Extracted<T> {
    /// A triangular factor
    Factor(Matrix<T>),
    /// A permutation matrix
    Permutation(Matrix<T>),
    /// A raw pivot index vector
    Pivot(Vec<usize>),
}

impl<T> Extracted<T> {
    /// The factor matrix, if this extraction produced one
    pub fn into_factor(self) -> Option<Matrix<T>> {
        match self {
            Extracted::Factor(m) => Some(m),
            _ => None,
        }
    }
}

/// Cholesky factorization result: an owned triangular factor and its half.
///
/// # Example
///
/// ```
/// use cholr::prelude::*;
///
/// let a = Matrix::from_vec(vec![4.0, 2.0, 2.0, 3.0], 2, 2)?;
/// let chol = Cholesky::new(a, Uplo::Upper)?;
///
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// let x = chol.solve_vec(&[1.0, 1.0])?;
/// assert!((x[0] - 0.125).abs() < 1e-12);
/// assert!((x[1] - 0.25).abs() < 1e-12);
/// # Ok::<(), cholr::error::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Cholesky<T: Scalar> {
    storage: Matrix<T>,
    uplo: Uplo,
}

impl<T: Scalar> Cholesky<T> {
    /// Factor a Hermitian positive-definite matrix, consuming its buffer.
    ///
    /// Only the `uplo` triangle of `a` is read; the other triangle is
    /// ignored and left unspecified in the stored factor. Uses the element
    /// type's native kernel when it has one, the generic element-wise
    /// algorithm otherwise.
    ///
    /// # Errors
    ///
    /// - `NotSquare` if `a` is not square
    /// - `NotPositiveDefinite` with the order of the first failing leading
    ///   minor
    pub fn new(mut a: Matrix<T>, uplo: Uplo) -> Result<Self> {
        let n = validate_square(&a)?;
        match T::kernel_factor(uplo, n, a.data_mut()) {
            Some(0) => Ok(Self { storage: a, uplo }),
            Some(k) => Err(Error::NotPositiveDefinite { order: k as usize }),
            None => {
                factor_generic(&mut a, uplo)?;
                Ok(Self { storage: a, uplo })
            }
        }
    }

    /// Factor with the generic element-wise algorithm, bypassing any native
    /// kernel the element type may have.
    pub fn new_generic(mut a: Matrix<T>, uplo: Uplo) -> Result<Self> {
        validate_square(&a)?;
        factor_generic(&mut a, uplo)?;
        Ok(Self { storage: a, uplo })
    }

    /// Non-destructive entry point: copies the input before factoring.
    pub fn from_ref(a: &Matrix<T>, uplo: Uplo) -> Result<Self> {
        Self::new(a.clone(), uplo)
    }

    /// Order of the factored matrix
    pub fn order(&self) -> usize {
        self.storage.rows()
    }

    /// The stored half
    pub fn uplo(&self) -> Uplo {
        self.uplo
    }

    /// The raw storage; only the [`Self::uplo`] triangle is meaningful
    pub fn storage(&self) -> &Matrix<T> {
        &self.storage
    }

    /// Materialize a triangular factor.
    ///
    /// `Upper` and `Lower` conjugate-transpose when the request differs from
    /// the stored half; `Stored` returns the stored triangle as-is. The dead
    /// triangle of the output is zeroed.
    ///
    /// # Errors
    ///
    /// `InvalidSelector` for `Permutation` and `Pivot`, which only pivoted
    /// factorizations carry.
    pub fn extract(&self, selector: Selector) -> Result<Extracted<T>> {
        match selector {
            Selector::Upper => Ok(Extracted::Factor(extract_triangle(
                &self.storage,
                self.uplo,
                Uplo::Upper,
            ))),
            Selector::Lower => Ok(Extracted::Factor(extract_triangle(
                &self.storage,
                self.uplo,
                Uplo::Lower,
            ))),
            Selector::Stored => Ok(Extracted::Factor(extract_triangle(
                &self.storage,
                self.uplo,
                self.uplo,
            ))),
            other => Err(Error::InvalidSelector { selector: other }),
        }
    }

    /// Solve `A * X = B` in place on a caller-owned right-hand side.
    ///
    /// # Errors
    ///
    /// - `ShapeMismatch` if `b` does not have `order()` rows
    /// - `SingularFactor` if the factor diagonal has a zero entry
    pub fn solve_in_place(&self, b: &mut Matrix<T>) -> Result<()> {
        let n = self.order();
        validate_rhs(n, b)?;
        match T::kernel_solve(self.uplo, n, self.storage.data(), b.cols(), b.data_mut()) {
            Some(0) => Ok(()),
            Some(k) => Err(Error::SingularFactor {
                index: k as usize - 1,
            }),
            None => solve_triangular(&self.storage, self.uplo, b),
        }
    }

    /// Solve `A * X = B`, leaving the right-hand side untouched.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        let mut x = b.clone();
        self.solve_in_place(&mut x)?;
        Ok(x)
    }

    /// Solve for a single right-hand side vector.
    pub fn solve_vec(&self, b: &[T]) -> Result<Vec<T>> {
        let mut x = Matrix::from_vec(b.to_vec(), b.len(), 1)?;
        self.solve_in_place(&mut x)?;
        Ok(x.into_vec())
    }

    /// Determinant of the original matrix: the product of squared diagonal
    /// magnitudes of the factor, non-negative and real also for complex
    /// input.
    pub fn det(&self) -> T::Real {
        let mut acc = T::Real::one();
        for i in 0..self.order() {
            acc = acc * self.storage.get(i, i).norm_sqr();
        }
        acc
    }

    /// Log-determinant, computed as a single accumulated sum of diagonal
    /// logs doubled at the end.
    pub fn log_det(&self) -> T::Real {
        let mut acc = T::Real::zero();
        for i in 0..self.order() {
            acc = acc + self.storage.get(i, i).real().ln();
        }
        acc + acc
    }

    /// Inverse of the original matrix, without re-factoring.
    ///
    /// The native kernel rewrites the stored half and the result is mirrored
    /// into the full Hermitian matrix; the generic fallback solves against
    /// the identity.
    ///
    /// # Errors
    ///
    /// `SingularFactor` if the factor diagonal has a zero entry.
    pub fn invert(&self) -> Result<Matrix<T>> {
        let n = self.order();
        let mut a = self.storage.clone();
        match T::kernel_invert(self.uplo, n, a.data_mut()) {
            Some(0) => {
                mirror_half(&mut a, self.uplo);
                Ok(a)
            }
            Some(k) => Err(Error::SingularFactor {
                index: k as usize - 1,
            }),
            None => self.solve(&Matrix::identity(n)),
        }
    }
}

/// Generic element-wise Cholesky, in place on the `uplo` triangle.
///
/// Unblocked O(n^3): each step completes one diagonal entry via a checked
/// square root and divides the remainder of its row (or column) by the
/// conjugated diagonal. Usable over any [`Scalar`]; a zero diagonal passes
/// (the semidefinite boundary) and surfaces later as a singular solve.
fn factor_generic<T: Scalar>(a: &mut Matrix<T>, uplo: Uplo) -> Result<()> {
    let n = a.rows();
    match uplo {
        Uplo::Upper => {
            for k in 0..n {
                let mut s = a.get(k, k);
                for i in 0..k {
                    let aik = a.get(i, k);
                    s = s - aik.conj() * aik;
                }
                let d = s
                    .sqrt_checked()
                    .ok_or(Error::NotPositiveDefinite { order: k + 1 })?;
                a.set(k, k, d);
                let dc = d.conj();
                for j in (k + 1)..n {
                    let mut t = a.get(k, j);
                    for i in 0..k {
                        t = t - a.get(i, k).conj() * a.get(i, j);
                    }
                    a.set(k, j, t / dc);
                }
            }
        }
        Uplo::Lower => {
            for k in 0..n {
                let mut s = a.get(k, k);
                for i in 0..k {
                    let aki = a.get(k, i);
                    s = s - aki * aki.conj();
                }
                let d = s
                    .sqrt_checked()
                    .ok_or(Error::NotPositiveDefinite { order: k + 1 })?;
                a.set(k, k, d);
                let dc = d.conj();
                for j in (k + 1)..n {
                    let mut t = a.get(j, k);
                    for i in 0..k {
                        t = t - a.get(j, i) * a.get(k, i).conj();
                    }
                    a.set(j, k, t / dc);
                }
            }
        }
    }
    Ok(())
}

/// Two-sweep triangular solve against the stored factor, in place on `b`.
///
/// The fallback for element types without a native solve kernel. Lower
/// storage runs `L` then `L^H`; upper storage runs `U^H` then `U`.
pub(crate) fn solve_triangular<T: Scalar>(
    factor: &Matrix<T>,
    uplo: Uplo,
    b: &mut Matrix<T>,
) -> Result<()> {
    let n = factor.rows();
    let nrhs = b.cols();
    for i in 0..n {
        if factor.get(i, i).norm_sqr() == T::Real::zero() {
            return Err(Error::SingularFactor { index: i });
        }
    }
    match uplo {
        Uplo::Lower => {
            for i in 0..n {
                for r in 0..nrhs {
                    let mut s = b.get(i, r);
                    for j in 0..i {
                        s = s - factor.get(i, j) * b.get(j, r);
                    }
                    b.set(i, r, s / factor.get(i, i));
                }
            }
            for i in (0..n).rev() {
                for r in 0..nrhs {
                    let mut s = b.get(i, r);
                    for j in (i + 1)..n {
                        s = s - factor.get(j, i).conj() * b.get(j, r);
                    }
                    b.set(i, r, s / factor.get(i, i).conj());
                }
            }
        }
        Uplo::Upper => {
            for i in 0..n {
                for r in 0..nrhs {
                    let mut s = b.get(i, r);
                    for j in 0..i {
                        s = s - factor.get(j, i).conj() * b.get(j, r);
                    }
                    b.set(i, r, s / factor.get(i, i).conj());
                }
            }
            for i in (0..n).rev() {
                for r in 0..nrhs {
                    let mut s = b.get(i, r);
                    for j in (i + 1)..n {
                        s = s - factor.get(i, j) * b.get(j, r);
                    }
                    b.set(i, r, s / factor.get(i, i));
                }
            }
        }
    }
    Ok(())
}

/// Copy the stored triangle into a fresh matrix, conjugate-transposing when
/// the requested half differs. The dead triangle of the output is zero.
pub(crate) fn extract_triangle<T: Scalar>(
    storage: &Matrix<T>,
    stored: Uplo,
    want: Uplo,
) -> Matrix<T> {
    let n = storage.rows();
    let mut out = Matrix::zeros(n, n);
    match (stored, want) {
        (Uplo::Upper, Uplo::Upper) => {
            for i in 0..n {
                for j in i..n {
                    out.set(i, j, storage.get(i, j));
                }
            }
        }
        (Uplo::Lower, Uplo::Lower) => {
            for i in 0..n {
                for j in 0..=i {
                    out.set(i, j, storage.get(i, j));
                }
            }
        }
        (Uplo::Upper, Uplo::Lower) => {
            for i in 0..n {
                for j in i..n {
                    out.set(j, i, storage.get(i, j).conj());
                }
            }
        }
        (Uplo::Lower, Uplo::Upper) => {
            for i in 0..n {
                for j in 0..=i {
                    out.set(j, i, storage.get(i, j).conj());
                }
            }
        }
    }
    out
}

/// Mirror the stored half of a Hermitian matrix into its dead triangle.
pub(crate) fn mirror_half<T: Scalar>(a: &mut Matrix<T>, stored: Uplo) {
    let n = a.rows();
    for i in 0..n {
        for j in (i + 1)..n {
            match stored {
                Uplo::Upper => a.set(j, i, a.get(i, j).conj()),
                Uplo::Lower => a.set(i, j, a.get(j, i).conj()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_square() {
        let a = Matrix::from_vec(vec![1.0_f64; 6], 2, 3).unwrap();
        assert!(matches!(
            Cholesky::new(a, Uplo::Upper),
            Err(Error::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_empty_matrix_factors() {
        let a = Matrix::<f64>::zeros(0, 0);
        let chol = Cholesky::new(a, Uplo::Upper).unwrap();
        assert_eq!(chol.order(), 0);
        assert_eq!(chol.det(), 1.0);
    }

    #[test]
    fn test_extract_rejects_pivot_selectors() {
        let a = Matrix::from_vec(vec![4.0_f64, 2.0, 2.0, 3.0], 2, 2).unwrap();
        let chol = Cholesky::new(a, Uplo::Upper).unwrap();
        assert!(matches!(
            chol.extract(Selector::Permutation),
            Err(Error::InvalidSelector {
                selector: Selector::Permutation
            })
        ));
        assert!(matches!(
            chol.extract(Selector::Pivot),
            Err(Error::InvalidSelector {
                selector: Selector::Pivot
            })
        ));
    }

    #[test]
    fn test_extract_triangle_transposes() {
        let a = Matrix::from_vec(vec![4.0_f64, 2.0, 2.0, 3.0], 2, 2).unwrap();
        let chol = Cholesky::new(a, Uplo::Upper).unwrap();
        let upper = chol.extract(Selector::Upper).unwrap().into_factor().unwrap();
        let lower = chol.extract(Selector::Lower).unwrap().into_factor().unwrap();
        assert_eq!(lower, upper.conj_transpose());
        assert_eq!(upper.get(1, 0), 0.0);
    }
}
