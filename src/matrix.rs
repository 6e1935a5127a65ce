//! Dense row-major matrix storage
//!
//! [`Matrix`] is the owned buffer the factorizations consume and the shape
//! all derived operations speak. Storage is row-major: element `(i, j)`
//! lives at `data[i * cols + j]`.

use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Dense row-major matrix
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Scalar> Matrix<T> {
    /// Create a matrix from a row-major element vector.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: vec![rows, cols],
                got: vec![data.len()],
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::zero(); rows * cols],
            rows,
            cols,
        }
    }

    /// Identity matrix of order `n`
    pub fn identity(n: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            out.set(i, i, T::one());
        }
        out
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as `[rows, cols]`
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// True when the matrix is square
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Element at `(row, col)`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Overwrite the element at `(row, col)`
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Row-major element slice
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major element slice
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the matrix and return its element vector
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Conjugate transpose `A^H`
    pub fn conj_transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(j, i, self.get(i, j).conj());
            }
        }
        out
    }

    /// Matrix product `self * other`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the inner dimensions disagree.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(Error::ShapeMismatch {
                expected: vec![self.cols, other.cols],
                got: vec![other.rows, other.cols],
            });
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = T::zero();
                for k in 0..self.cols {
                    sum = sum + self.get(i, k) * other.get(k, j);
                }
                out.set(i, j, sum);
            }
        }
        Ok(out)
    }
}

/// Validate the matrix is square and return its order
pub(crate) fn validate_square<T: Scalar>(a: &Matrix<T>) -> Result<usize> {
    if !a.is_square() {
        return Err(Error::NotSquare {
            rows: a.rows(),
            cols: a.cols(),
        });
    }
    Ok(a.rows())
}

/// Validate a right-hand side has `n` rows
pub(crate) fn validate_rhs<T: Scalar>(n: usize, b: &Matrix<T>) -> Result<()> {
    if b.rows() != n {
        return Err(Error::ShapeMismatch {
            expected: vec![n, b.cols()],
            got: vec![b.rows(), b.cols()],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_validates_length() {
        assert!(Matrix::from_vec(vec![1.0_f64, 2.0, 3.0], 2, 2).is_err());
        assert!(Matrix::from_vec(vec![1.0_f64; 4], 2, 2).is_ok());
    }

    #[test]
    fn test_identity() {
        let eye = Matrix::<f64>::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(eye.get(i, j), expected);
            }
        }
    }

    #[test]
    fn test_matmul() {
        let a = Matrix::from_vec(vec![1.0_f64, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::from_vec(vec![5.0_f64, 6.0, 7.0, 8.0], 2, 2).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_conj_transpose_complex() {
        use num_complex::Complex;
        let a = Matrix::from_vec(
            vec![
                Complex::new(1.0_f64, 2.0),
                Complex::new(3.0, -1.0),
                Complex::new(0.0, 4.0),
                Complex::new(5.0, 0.0),
            ],
            2,
            2,
        )
        .unwrap();
        let at = a.conj_transpose();
        assert_eq!(at.get(0, 0), Complex::new(1.0, -2.0));
        assert_eq!(at.get(0, 1), Complex::new(0.0, -4.0));
        assert_eq!(at.get(1, 0), Complex::new(3.0, 1.0));
    }
}
