//! Decryption of matrices and regression results for the secret-key holder.
//!
//! A wrong key is not detected; it yields meaningless plaintexts.
use crate::errors::{EvalError, EvalResult};
use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::regression::RegressionResult;
use crate::scalar::EncryptedScalar;
use crate::scheme::SchemeEngine;
use num_integer::Integer;
use std::fmt;

/// One decrypted slot vector per cell.
pub type PlainMatrix = Matrix<Vec<i64>>;

pub fn decrypt_matrix<E: SchemeEngine>(
    secret_key: &E::SecretKey,
    matrix: &Matrix<EncryptedScalar<E>>,
) -> EvalResult<PlainMatrix> {
    matrix.try_map(|cell| cell.decrypt(secret_key))
}

/// Decrypted `(numerators, denominators)`.
pub fn decrypt_rational_matrix<E: SchemeEngine>(
    secret_key: &E::SecretKey,
    matrix: &Matrix<Rational<E>>,
) -> EvalResult<(PlainMatrix, PlainMatrix)> {
    let numerators = matrix.try_map(|cell| cell.numerator().decrypt(secret_key))?;
    let denominators = matrix.try_map(|cell| cell.denominator().decrypt(secret_key))?;
    Ok((numerators, denominators))
}

pub fn decrypt_result<E: SchemeEngine>(
    secret_key: &E::SecretKey,
    result: &RegressionResult<E>,
) -> EvalResult<PlainRegression> {
    Ok(PlainRegression {
        numerator: decrypt_matrix(secret_key, result.numerator())?,
        denominator: decrypt_matrix(secret_key, result.denominator())?,
    })
}

/// Reduced fraction with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

impl Fraction {
    /// `None` when `denominator` is zero.
    pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let gcd = numerator.gcd(&denominator);
        let sign = denominator.signum();
        Some(Self {
            numerator: sign * numerator / gcd,
            denominator: sign * denominator / gcd,
        })
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Decrypted regression output; `β[row][col]` in slot `s` is
/// `numerator[row][col][s] / denominator[row][col][s]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainRegression {
    pub numerator: PlainMatrix,
    pub denominator: PlainMatrix,
}

impl PlainRegression {
    pub fn shape(&self) -> (usize, usize) {
        self.numerator.shape()
    }

    pub fn ratio(&self, row: usize, col: usize, slot: usize) -> EvalResult<Fraction> {
        let numerators = self.numerator.get(row, col)?;
        let denominators = self.denominator.get(row, col)?;
        let slots = numerators.len().min(denominators.len());
        if slot >= slots {
            return Err(EvalError::SlotOutOfRange { slot, slots });
        }
        Fraction::new(numerators[slot], denominators[slot])
            .ok_or(EvalError::ZeroDenominator { row, col, slot })
    }

    /// Every coefficient of the problem stored at `slot`.
    pub fn ratios_at(&self, slot: usize) -> EvalResult<Matrix<Fraction>> {
        let (rows, cols) = self.shape();
        Matrix::try_from_fn(rows, cols, |i, j| self.ratio(i, j, slot))
    }

    pub fn coefficients_at(&self, slot: usize) -> EvalResult<Matrix<f64>> {
        Ok(self.ratios_at(slot)?.map(|f| f.to_f64()))
    }
}
