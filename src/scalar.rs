//! Element abstraction for factorization over real and complex fields
//!
//! The [`Scalar`] trait is the contract every element type must satisfy:
//! field arithmetic, conjugation, and a checked square root. The four
//! machine types (`f32`, `f64`, `Complex<f32>`, `Complex<f64>`) additionally
//! wire in the optimized native kernels; any other type falls back to the
//! generic element-wise algorithm through the defaulted kernel hooks.

use crate::cholesky::Uplo;
use crate::error::{Error, Result};
use crate::kernel::{self, PivotedInfo};
use num_complex::Complex;
use num_traits::Float;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Element type usable by the factorization algorithms.
///
/// A `Scalar` models a field with a conjugation involution and a square
/// root on its non-negative real axis. Real types are their own conjugate;
/// complex types conjugate the imaginary part.
///
/// # Native kernels
///
/// The `kernel_*` hooks report whether an optimized in-place kernel exists
/// for the type. The default implementations return `None`, which routes
/// callers to the generic element-wise algorithm. The pivoted factorization
/// has no generic counterpart, so element types without `kernel_factor_pivoted`
/// cannot be pivoted.
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// The underlying real field (the type of magnitudes and determinants)
    type Real: Float + Debug + Send + Sync + 'static;

    /// Additive identity
    fn zero() -> Self;

    /// Multiplicative identity
    fn one() -> Self;

    /// Embed a real value
    fn from_real(re: Self::Real) -> Self;

    /// Convert an `f64` constant into the real field
    fn real_from_f64(x: f64) -> Self::Real;

    /// Real part
    fn real(&self) -> Self::Real;

    /// Imaginary part (zero for real types)
    fn imag(&self) -> Self::Real;

    /// Complex conjugate
    fn conj(&self) -> Self;

    /// Magnitude `|x|`
    fn modulus(&self) -> Self::Real;

    /// Squared magnitude `|x|^2`
    fn norm_sqr(&self) -> Self::Real;

    /// Machine epsilon of the real field
    fn epsilon() -> Self::Real;

    /// Square root where one exists for a Cholesky diagonal.
    ///
    /// Returns `None` for a negative or non-finite real part, or for a
    /// complex value whose imaginary residue exceeds the Hermitian
    /// tolerance. Zero is accepted: the semidefinite boundary factors, and
    /// singularity is reported by the solve path instead.
    fn sqrt_checked(&self) -> Option<Self>;

    /// Optimized in-place factorization kernel, if the type has one.
    ///
    /// Returns `Some(status)` with the kernel status code (0 success,
    /// k > 0 when the leading minor of order k is not positive definite),
    /// or `None` when no kernel applies.
    fn kernel_factor(uplo: Uplo, n: usize, a: &mut [Self]) -> Option<i32> {
        let _ = (uplo, n, a);
        None
    }

    /// Optimized pivoted factorization kernel, if the type has one.
    fn kernel_factor_pivoted(
        uplo: Uplo,
        n: usize,
        a: &mut [Self],
        pivot: &mut [usize],
        tol: Option<Self::Real>,
    ) -> Option<PivotedInfo<Self::Real>> {
        let _ = (uplo, n, a, pivot, tol);
        None
    }

    /// Optimized triangular solve kernel, if the type has one.
    fn kernel_solve(
        uplo: Uplo,
        n: usize,
        factor: &[Self],
        nrhs: usize,
        b: &mut [Self],
    ) -> Option<i32> {
        let _ = (uplo, n, factor, nrhs, b);
        None
    }

    /// Optimized factor-to-inverse kernel, if the type has one.
    fn kernel_invert(uplo: Uplo, n: usize, a: &mut [Self]) -> Option<i32> {
        let _ = (uplo, n, a);
        None
    }
}

macro_rules! impl_scalar_real {
    ($t:ty) => {
        impl Scalar for $t {
            type Real = $t;

            #[inline]
            fn zero() -> Self {
                0.0
            }
            #[inline]
            fn one() -> Self {
                1.0
            }
            #[inline]
            fn from_real(re: Self::Real) -> Self {
                re
            }
            #[inline]
            fn real_from_f64(x: f64) -> Self::Real {
                x as $t
            }
            #[inline]
            fn real(&self) -> Self::Real {
                *self
            }
            #[inline]
            fn imag(&self) -> Self::Real {
                0.0
            }
            #[inline]
            fn conj(&self) -> Self {
                *self
            }
            #[inline]
            fn modulus(&self) -> Self::Real {
                self.abs()
            }
            #[inline]
            fn norm_sqr(&self) -> Self::Real {
                self * self
            }
            #[inline]
            fn epsilon() -> Self::Real {
                <$t>::EPSILON
            }

            #[inline]
            fn sqrt_checked(&self) -> Option<Self> {
                if self.is_finite() && *self >= 0.0 {
                    Some(self.sqrt())
                } else {
                    None
                }
            }

            fn kernel_factor(uplo: Uplo, n: usize, a: &mut [Self]) -> Option<i32> {
                Some(kernel::factor(uplo, n, a))
            }

            fn kernel_factor_pivoted(
                uplo: Uplo,
                n: usize,
                a: &mut [Self],
                pivot: &mut [usize],
                tol: Option<Self::Real>,
            ) -> Option<PivotedInfo<Self::Real>> {
                Some(kernel::factor_pivoted(uplo, n, a, pivot, tol))
            }

            fn kernel_solve(
                uplo: Uplo,
                n: usize,
                factor: &[Self],
                nrhs: usize,
                b: &mut [Self],
            ) -> Option<i32> {
                Some(kernel::solve(uplo, n, factor, nrhs, b))
            }

            fn kernel_invert(uplo: Uplo, n: usize, a: &mut [Self]) -> Option<i32> {
                Some(kernel::invert(uplo, n, a))
            }
        }
    };
}

macro_rules! impl_scalar_complex {
    ($f:ty, $herm_tol:expr) => {
        impl Scalar for Complex<$f> {
            type Real = $f;

            #[inline]
            fn zero() -> Self {
                Complex::new(0.0, 0.0)
            }
            #[inline]
            fn one() -> Self {
                Complex::new(1.0, 0.0)
            }
            #[inline]
            fn from_real(re: Self::Real) -> Self {
                Complex::new(re, 0.0)
            }
            #[inline]
            fn real_from_f64(x: f64) -> Self::Real {
                x as $f
            }
            #[inline]
            fn real(&self) -> Self::Real {
                self.re
            }
            #[inline]
            fn imag(&self) -> Self::Real {
                self.im
            }
            #[inline]
            fn conj(&self) -> Self {
                Complex::new(self.re, -self.im)
            }
            #[inline]
            fn modulus(&self) -> Self::Real {
                self.re.hypot(self.im)
            }
            #[inline]
            fn norm_sqr(&self) -> Self::Real {
                self.re * self.re + self.im * self.im
            }
            #[inline]
            fn epsilon() -> Self::Real {
                <$f>::EPSILON
            }

            fn sqrt_checked(&self) -> Option<Self> {
                // A Hermitian diagonal is mathematically real; tolerate the
                // floating-point residue left by accumulated products.
                let scale = self.re.abs().max(1.0);
                if self.re.is_finite() && self.re >= 0.0 && self.im.abs() <= $herm_tol * scale {
                    Some(Complex::new(self.re.sqrt(), 0.0))
                } else {
                    None
                }
            }

            fn kernel_factor(uplo: Uplo, n: usize, a: &mut [Self]) -> Option<i32> {
                Some(kernel::factor(uplo, n, a))
            }

            fn kernel_factor_pivoted(
                uplo: Uplo,
                n: usize,
                a: &mut [Self],
                pivot: &mut [usize],
                tol: Option<Self::Real>,
            ) -> Option<PivotedInfo<Self::Real>> {
                Some(kernel::factor_pivoted(uplo, n, a, pivot, tol))
            }

            fn kernel_solve(
                uplo: Uplo,
                n: usize,
                factor: &[Self],
                nrhs: usize,
                b: &mut [Self],
            ) -> Option<i32> {
                Some(kernel::solve(uplo, n, factor, nrhs, b))
            }

            fn kernel_invert(uplo: Uplo, n: usize, a: &mut [Self]) -> Option<i32> {
                Some(kernel::invert(uplo, n, a))
            }
        }
    };
}

impl_scalar_real!(f32);
impl_scalar_real!(f64);
impl_scalar_complex!(f32, 1.0e-5);
impl_scalar_complex!(f64, 1.0e-12);

/// Cholesky factorization of a scalar: the 1x1 specialization.
///
/// `cholesky_scalar(4.0)` is `2.0`. A negative real or a complex value with
/// a genuine imaginary part has no Cholesky factor and fails with
/// [`Error::Domain`].
pub fn cholesky_scalar<T: Scalar>(x: T) -> Result<T> {
    x.sqrt_checked().ok_or(Error::Domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_cholesky_real() {
        assert_eq!(cholesky_scalar(4.0_f64).unwrap(), 2.0);
        assert!(matches!(cholesky_scalar(-4.0_f64), Err(Error::Domain)));
    }

    #[test]
    fn test_scalar_cholesky_complex() {
        let z = Complex::new(9.0_f64, 0.0);
        assert_eq!(cholesky_scalar(z).unwrap(), Complex::new(3.0, 0.0));
        let w = Complex::new(1.0_f64, 1.0);
        assert!(matches!(cholesky_scalar(w), Err(Error::Domain)));
    }

    #[test]
    fn test_sqrt_checked_accepts_zero() {
        assert_eq!(0.0_f64.sqrt_checked(), Some(0.0));
    }

    #[test]
    fn test_sqrt_checked_rejects_nan() {
        assert_eq!(f64::NAN.sqrt_checked(), None);
    }
}
