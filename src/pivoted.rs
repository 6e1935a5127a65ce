//! Pivoted Cholesky factorization with rank detection
//!
//! [`CholeskyPivoted`] factors `P * A * P^H` for a diagonal-pivoting
//! permutation chosen greedily by the kernel, recording the numerically
//! detected rank and the tolerance that decided it. Unlike the plain
//! variant, a rank-deficient matrix factors without error; consumers must
//! pass [`CholeskyPivoted::check_full_rank`] before solving or inverting,
//! or accept that storage past the rank is meaningless.
//!
//! Pivoting is a kernel capability: element types without a native kernel
//! cannot request it (the generic element-wise algorithm does not pivot).

use crate::cholesky::{
    extract_triangle, mirror_half, solve_triangular, Extracted, Selector, Uplo,
};
use crate::error::{Error, Result};
use crate::matrix::{validate_rhs, validate_square, Matrix};
use crate::permutation;
use crate::scalar::Scalar;
use num_traits::{Float, One, Zero};

/// Pivoted Cholesky factorization result.
///
/// Carries the triangular factor of the permuted matrix, the pivot
/// permutation, the detected rank, the rank tolerance, and the kernel's
/// diagnostic status.
///
/// # Example
///
/// ```
/// use cholr::prelude::*;
///
/// // v * v^T has rank 1 in dimension 2
/// let a = Matrix::from_vec(vec![1.0, 2.0, 2.0, 4.0], 2, 2)?;
/// let chol = CholeskyPivoted::new(a, Uplo::Upper, None)?;
///
/// assert_eq!(chol.rank(), 1);
/// assert!(chol.check_full_rank().is_err());
/// assert_eq!(chol.det(), 0.0);
/// # Ok::<(), cholr::error::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct CholeskyPivoted<T: Scalar> {
    storage: Matrix<T>,
    uplo: Uplo,
    pivot: Vec<usize>,
    rank: usize,
    tolerance: T::Real,
    status: i32,
}

impl<T: Scalar> CholeskyPivoted<T> {
    /// Factor with diagonal pivoting, consuming the buffer.
    ///
    /// `tol` is the rank threshold; `None` applies the kernel default
    /// (machine epsilon scaled by the dimension and the largest diagonal).
    /// Rank deficiency is not an error here: it is recorded on the result
    /// and enforced by [`Self::check_full_rank`] at use sites.
    ///
    /// # Errors
    ///
    /// - `NotSquare` if `a` is not square
    /// - `UnsupportedElement` if the element type has no pivoting kernel
    pub fn new(mut a: Matrix<T>, uplo: Uplo, tol: Option<T::Real>) -> Result<Self> {
        let n = validate_square(&a)?;
        let mut pivot = vec![0usize; n];
        match T::kernel_factor_pivoted(uplo, n, a.data_mut(), &mut pivot, tol) {
            Some(info) => Ok(Self {
                storage: a,
                uplo,
                pivot,
                rank: info.rank,
                tolerance: info.tolerance,
                status: info.status,
            }),
            None => Err(Error::UnsupportedElement {
                op: "pivoted cholesky",
            }),
        }
    }

    /// Non-destructive entry point: copies the input before factoring.
    pub fn from_ref(a: &Matrix<T>, uplo: Uplo, tol: Option<T::Real>) -> Result<Self> {
        Self::new(a.clone(), uplo, tol)
    }

    /// Order of the factored matrix
    pub fn order(&self) -> usize {
        self.storage.rows()
    }

    /// The stored half
    pub fn uplo(&self) -> Uplo {
        self.uplo
    }

    /// The raw storage; meaningful only up to [`Self::rank`] and only in
    /// the [`Self::uplo`] triangle
    pub fn storage(&self) -> &Matrix<T> {
        &self.storage
    }

    /// The pivot permutation: `pivot[i]` is the source row and column of
    /// position `i` in the permuted matrix
    pub fn pivot(&self) -> &[usize] {
        &self.pivot
    }

    /// Numerically detected rank
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Tolerance that decided the rank
    pub fn tolerance(&self) -> T::Real {
        self.tolerance
    }

    /// Kernel diagnostic status (0 full rank, 1 stopped early)
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Fail unless the factorization is full rank.
    ///
    /// # Errors
    ///
    /// `RankDeficient` carrying the kernel status when `rank < order`.
    pub fn check_full_rank(&self) -> Result<()> {
        if self.rank < self.order() {
            return Err(Error::RankDeficient {
                status: self.status,
            });
        }
        Ok(())
    }

    /// Materialize a factor, the permutation matrix, or the pivot vector.
    ///
    /// Factor selectors behave as on the plain result. `Permutation` builds
    /// the matrix `P` with `P[i, pivot[i]] = 1`, so `P * A * P^H`
    /// reconstructs from the stored factor; `Pivot` returns the raw index
    /// vector.
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
            Selector::Permutation => Ok(Extracted::Permutation(permutation::permutation_matrix(
                &self.pivot,
            ))),
            Selector::Pivot => Ok(Extracted::Pivot(self.pivot.clone())),
        }
    }

    /// Solve `A * X = B` in place on a caller-owned right-hand side.
    ///
    /// Gathers the right-hand side rows through the pivot permutation,
    /// solves against the stored factor, and scatters the solution back
    /// through the inverse index array (built once, never re-sorted).
    ///
    /// # Errors
    ///
    /// - `RankDeficient` unless the factorization is full rank
    /// - `ShapeMismatch` if `b` does not have `order()` rows
    /// - `SingularFactor` if the factor diagonal has a zero entry
    pub fn solve_in_place(&self, b: &mut Matrix<T>) -> Result<()> {
        self.check_full_rank()?;
        let n = self.order();
        validate_rhs(n, b)?;
        let mut pb = permutation::gather_rows(b, &self.pivot);
        match T::kernel_solve(self.uplo, n, self.storage.data(), pb.cols(), pb.data_mut()) {
            Some(0) => {}
            Some(k) => {
                return Err(Error::SingularFactor {
                    index: k as usize - 1,
                })
            }
            None => solve_triangular(&self.storage, self.uplo, &mut pb)?,
        }
        let inv = permutation::invert(&self.pivot);
        *b = permutation::gather_rows(&pb, &inv);
        Ok(())
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

    /// Determinant: exactly zero when rank deficient, otherwise the product
    /// of squared diagonal magnitudes.
    ///
    /// The permutation contributes no sign: it is applied to rows and
    /// columns simultaneously, and the factorization certifies the
    /// eigenvalues non-negative.
    pub fn det(&self) -> T::Real {
        let n = self.order();
        if self.rank < n {
            return T::Real::zero();
        }
        let mut acc = T::Real::one();
        for i in 0..n {
            acc = acc * self.storage.get(i, i).norm_sqr();
        }
        acc
    }

    /// Log-determinant: negative infinity when rank deficient, otherwise a
    /// single accumulated sum of diagonal logs doubled at the end.
    pub fn log_det(&self) -> T::Real {
        let n = self.order();
        if self.rank < n {
            return T::Real::neg_infinity();
        }
        let mut acc = T::Real::zero();
        for i in 0..n {
            acc = acc + self.storage.get(i, i).real().ln();
        }
        acc + acc
    }

    /// Inverse of the original matrix, undoing the pivoting.
    ///
    /// Inverts the permuted matrix from its factor, then permutes rows and
    /// columns back simultaneously through the inverse index array.
    ///
    /// # Errors
    ///
    /// - `RankDeficient` unless the factorization is full rank
    /// - `SingularFactor` if the factor diagonal has a zero entry
    pub fn invert(&self) -> Result<Matrix<T>> {
        self.check_full_rank()?;
        let n = self.order();
        let mut inv_p = self.storage.clone();
        match T::kernel_invert(self.uplo, n, inv_p.data_mut()) {
            Some(0) => mirror_half(&mut inv_p, self.uplo),
            Some(k) => {
                return Err(Error::SingularFactor {
                    index: k as usize - 1,
                })
            }
            None => {
                let mut eye = Matrix::identity(n);
                solve_triangular(&self.storage, self.uplo, &mut eye)?;
                inv_p = eye;
            }
        }
        let inv = permutation::invert(&self.pivot);
        let mut out = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                out.set(i, j, inv_p.get(inv[i], inv[j]));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_square() {
        let a = Matrix::from_vec(vec![1.0_f64; 6], 3, 2).unwrap();
        assert!(matches!(
            CholeskyPivoted::new(a, Uplo::Upper, None),
            Err(Error::NotSquare { rows: 3, cols: 2 })
        ));
    }

    #[test]
    fn test_empty_matrix_is_full_rank() {
        let a = Matrix::<f64>::zeros(0, 0);
        let chol = CholeskyPivoted::new(a, Uplo::Upper, None).unwrap();
        assert_eq!(chol.rank(), 0);
        assert!(chol.check_full_rank().is_ok());
        assert_eq!(chol.det(), 1.0);
    }

    #[test]
    fn test_rank_deficient_solve_is_rejected() {
        let a = Matrix::from_vec(vec![1.0_f64, 2.0, 2.0, 4.0], 2, 2).unwrap();
        let chol = CholeskyPivoted::new(a, Uplo::Upper, None).unwrap();
        let b = Matrix::from_vec(vec![1.0_f64, 1.0], 2, 1).unwrap();
        assert!(matches!(
            chol.solve(&b),
            Err(Error::RankDeficient { status: 1 })
        ));
        assert!(matches!(
            chol.invert(),
            Err(Error::RankDeficient { status: 1 })
        ));
    }

    #[test]
    fn test_extract_pivot_selectors() {
        let a = Matrix::from_vec(vec![1.0_f64, 0.5, 0.5, 4.0], 2, 2).unwrap();
        let chol = CholeskyPivoted::new(a, Uplo::Upper, None).unwrap();
        match chol.extract(Selector::Pivot).unwrap() {
            Extracted::Pivot(p) => assert_eq!(p, vec![1, 0]),
            other => panic!("expected pivot vector, got {other:?}"),
        }
        match chol.extract(Selector::Permutation).unwrap() {
            Extracted::Permutation(p) => {
                assert_eq!(p.get(0, 1), 1.0);
                assert_eq!(p.get(1, 0), 1.0);
            }
            other => panic!("expected permutation matrix, got {other:?}"),
        }
    }
}
