//! Common test utilities
#![allow(dead_code)]

use cholr::matrix::Matrix;
use num_complex::Complex;

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two complex slices are close within tolerance
pub fn assert_allclose_c64(
    a: &[Complex<f64>],
    b: &[Complex<f64>],
    rtol: f64,
    atol: f64,
    msg: &str,
) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).norm();
        let tol = atol + rtol * y.norm();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two real matrices are elementwise close
pub fn assert_mat_allclose(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64, msg: &str) {
    assert_eq!(a.shape(), b.shape(), "{}: shape mismatch", msg);
    assert_allclose_f64(a.data(), b.data(), 0.0, tol, msg);
}

/// Assert two complex matrices are elementwise close
pub fn assert_cmat_allclose(
    a: &Matrix<Complex<f64>>,
    b: &Matrix<Complex<f64>>,
    tol: f64,
    msg: &str,
) {
    assert_eq!(a.shape(), b.shape(), "{}: shape mismatch", msg);
    assert_allclose_c64(a.data(), b.data(), 0.0, tol, msg);
}

/// Hermitian matrix from complex (re, im) pairs in row-major order
pub fn cmatrix(entries: &[(f64, f64)], n: usize) -> Matrix<Complex<f64>> {
    let data: Vec<Complex<f64>> = entries.iter().map(|&(re, im)| Complex::new(re, im)).collect();
    Matrix::from_vec(data, n, n).expect("square complex matrix")
}
