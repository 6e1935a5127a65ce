//! Native factorization kernels
//!
//! In-place routines behind the optimized path of the factorization entry
//! points. Vendor libraries are deliberately not used; these are native
//! implementations of the same contracts, which keeps every element type on
//! identical algorithms and the crate free of FFI.
//!
//! All routines share the adapter status convention: `0` is success and a
//! positive value `k` reports that the leading minor of order `k` is not
//! positive definite (for the solve and invert routines, that the factor
//! diagonal at index `k - 1` is zero). Buffers are caller-owned, row-major,
//! and overwritten in place.

use crate::cholesky::Uplo;
use crate::scalar::Scalar;
use num_traits::{Float, Zero};

/// Outcome of a pivoted factorization kernel call
#[derive(Clone, Copy, Debug)]
pub struct PivotedInfo<R> {
    /// Number of diagonal pivots accepted
    pub rank: usize,
    /// Rank tolerance that was applied
    pub tolerance: R,
    /// Diagnostic status: 0 full rank, 1 stopped below the tolerance
    pub status: i32,
}

/// Factor a Hermitian positive-definite matrix in place.
///
/// Only the `uplo` triangle of `a` is read and written; the other triangle
/// is left untouched. Returns 0 on success, or `k > 0` when the leading
/// minor of order `k` is not positive definite (the factorization stops at
/// that column and the buffer beyond it is unspecified).
pub fn factor<T: Scalar>(uplo: Uplo, n: usize, a: &mut [T]) -> i32 {
    match uplo {
        Uplo::Upper => {
            for k in 0..n {
                let mut s = a[k * n + k];
                for i in 0..k {
                    let aik = a[i * n + k];
                    s = s - aik.conj() * aik;
                }
                let d = s.real();
                if !(d > T::Real::zero()) || !d.is_finite() {
                    return (k + 1) as i32;
                }
                let d = d.sqrt();
                a[k * n + k] = T::from_real(d);
                let diag = T::from_real(d);
                for j in (k + 1)..n {
                    let mut t = a[k * n + j];
                    for i in 0..k {
                        t = t - a[i * n + k].conj() * a[i * n + j];
                    }
                    a[k * n + j] = t / diag;
                }
            }
        }
        Uplo::Lower => {
            for k in 0..n {
                let mut s = a[k * n + k];
                for i in 0..k {
                    let aki = a[k * n + i];
                    s = s - aki * aki.conj();
                }
                let d = s.real();
                if !(d > T::Real::zero()) || !d.is_finite() {
                    return (k + 1) as i32;
                }
                let d = d.sqrt();
                a[k * n + k] = T::from_real(d);
                let diag = T::from_real(d);
                for j in (k + 1)..n {
                    let mut t = a[j * n + k];
                    for i in 0..k {
                        t = t - a[j * n + i] * a[k * n + i].conj();
                    }
                    a[j * n + k] = t / diag;
                }
            }
        }
    }
    0
}

/// Factor with greedy diagonal pivoting, detecting rank deficiency.
///
/// At every step the largest remaining diagonal entry is swapped into pivot
/// position; the sweep stops once that maximum falls below the tolerance.
/// `pivot` receives the composed permutation (`pivot[k]` is the source index
/// of the row and column factored at step `k`; trailing entries hold the
/// remaining order). When `tol` is `None` the applied tolerance is
/// `n * epsilon * max(diag)`. Storage past the returned rank is left as-is
/// and is not meaningful for solves.
pub fn factor_pivoted<T: Scalar>(
    uplo: Uplo,
    n: usize,
    a: &mut [T],
    pivot: &mut [usize],
    tol: Option<T::Real>,
) -> PivotedInfo<T::Real> {
    for (i, p) in pivot.iter_mut().enumerate() {
        *p = i;
    }
    if n == 0 {
        return PivotedInfo {
            rank: 0,
            tolerance: tol.unwrap_or_else(T::Real::zero),
            status: 0,
        };
    }

    let mut diag: Vec<T::Real> = (0..n).map(|i| a[i * n + i].real()).collect();
    let max0 = diag
        .iter()
        .cloned()
        .fold(T::Real::neg_infinity(), T::Real::max);
    let tolerance = tol.unwrap_or_else(|| {
        T::real_from_f64(n as f64) * T::epsilon() * max0.max(T::Real::zero())
    });

    for k in 0..n {
        let mut q = k;
        for i in (k + 1)..n {
            if diag[i] > diag[q] {
                q = i;
            }
        }
        let dq = diag[q];
        if !(dq > tolerance) || !dq.is_finite() {
            return PivotedInfo {
                rank: k,
                tolerance,
                status: 1,
            };
        }
        if q != k {
            swap_hermitian(uplo, n, a, k, q);
            diag.swap(k, q);
            pivot.swap(k, q);
        }

        let d = diag[k].sqrt();
        a[k * n + k] = T::from_real(d);
        let diag_elem = T::from_real(d);
        match uplo {
            Uplo::Upper => {
                for j in (k + 1)..n {
                    let mut t = a[k * n + j];
                    for i in 0..k {
                        t = t - a[i * n + k].conj() * a[i * n + j];
                    }
                    let v = t / diag_elem;
                    a[k * n + j] = v;
                    diag[j] = diag[j] - v.norm_sqr();
                }
            }
            Uplo::Lower => {
                for j in (k + 1)..n {
                    let mut t = a[j * n + k];
                    for i in 0..k {
                        t = t - a[j * n + i] * a[k * n + i].conj();
                    }
                    let v = t / diag_elem;
                    a[j * n + k] = v;
                    diag[j] = diag[j] - v.norm_sqr();
                }
            }
        }
    }

    PivotedInfo {
        rank: n,
        tolerance,
        status: 0,
    }
}

/// Swap rows and columns `k < q` of a Hermitian matrix stored in one triangle.
///
/// The segment between the two indices crosses the diagonal, so those
/// entries exchange with their mirrored, conjugated counterparts.
fn swap_hermitian<T: Scalar>(uplo: Uplo, n: usize, a: &mut [T], k: usize, q: usize) {
    debug_assert!(k < q && q < n);
    match uplo {
        Uplo::Upper => {
            for i in 0..k {
                a.swap(i * n + k, i * n + q);
            }
            a.swap(k * n + k, q * n + q);
            for j in (k + 1)..q {
                let t = a[k * n + j];
                a[k * n + j] = a[j * n + q].conj();
                a[j * n + q] = t.conj();
            }
            for j in (q + 1)..n {
                a.swap(k * n + j, q * n + j);
            }
            a[k * n + q] = a[k * n + q].conj();
        }
        Uplo::Lower => {
            for i in 0..k {
                a.swap(k * n + i, q * n + i);
            }
            a.swap(k * n + k, q * n + q);
            for j in (k + 1)..q {
                let t = a[j * n + k];
                a[j * n + k] = a[q * n + j].conj();
                a[q * n + j] = t.conj();
            }
            for j in (q + 1)..n {
                a.swap(j * n + k, j * n + q);
            }
            a[q * n + k] = a[q * n + k].conj();
        }
    }
}

/// Solve `A * X = B` in place on `B` through a stored triangular factor.
///
/// `factor` is the output of [`factor`] with the same `uplo`; `b` holds
/// `nrhs` right-hand side columns in row-major order and is overwritten
/// with the solution. The two substitution sweeps run forward with the
/// stored triangle (or its conjugate transpose) and backward with the
/// other, so the dead triangle of `factor` is never read.
pub fn solve<T: Scalar>(uplo: Uplo, n: usize, factor: &[T], nrhs: usize, b: &mut [T]) -> i32 {
    for i in 0..n {
        if factor[i * n + i].norm_sqr() == T::Real::zero() {
            return (i + 1) as i32;
        }
    }
    match uplo {
        Uplo::Lower => {
            // forward: L y = b
            for i in 0..n {
                for r in 0..nrhs {
                    let mut s = b[i * nrhs + r];
                    for j in 0..i {
                        s = s - factor[i * n + j] * b[j * nrhs + r];
                    }
                    b[i * nrhs + r] = s / factor[i * n + i];
                }
            }
            // backward: L^H x = y
            for i in (0..n).rev() {
                for r in 0..nrhs {
                    let mut s = b[i * nrhs + r];
                    for j in (i + 1)..n {
                        s = s - factor[j * n + i].conj() * b[j * nrhs + r];
                    }
                    b[i * nrhs + r] = s / factor[i * n + i].conj();
                }
            }
        }
        Uplo::Upper => {
            // forward: U^H y = b
            for i in 0..n {
                for r in 0..nrhs {
                    let mut s = b[i * nrhs + r];
                    for j in 0..i {
                        s = s - factor[j * n + i].conj() * b[j * nrhs + r];
                    }
                    b[i * nrhs + r] = s / factor[i * n + i].conj();
                }
            }
            // backward: U x = y
            for i in (0..n).rev() {
                for r in 0..nrhs {
                    let mut s = b[i * nrhs + r];
                    for j in (i + 1)..n {
                        s = s - factor[i * n + j] * b[j * nrhs + r];
                    }
                    b[i * nrhs + r] = s / factor[i * n + i];
                }
            }
        }
    }
    0
}

/// Replace a stored triangular factor with the same half of `A^{-1}`.
///
/// Only the `uplo` triangle of `a` is rewritten; callers mirror it into the
/// full Hermitian inverse. Returns the singular-diagonal status of the
/// underlying solves.
pub fn invert<T: Scalar>(uplo: Uplo, n: usize, a: &mut [T]) -> i32 {
    let mut inv = vec![T::zero(); n * n];
    for i in 0..n {
        inv[i * n + i] = T::one();
    }
    let status = solve(uplo, n, a, n, &mut inv);
    if status != 0 {
        return status;
    }
    match uplo {
        Uplo::Upper => {
            for i in 0..n {
                for j in i..n {
                    a[i * n + j] = inv[i * n + j];
                }
            }
        }
        Uplo::Lower => {
            for i in 0..n {
                for j in 0..=i {
                    a[i * n + j] = inv[i * n + j];
                }
            }
        }
    }
    0
}
