//! Closed-form least squares under encryption.
//!
//! Computes `β = (XᵀX)⁻¹ Xᵀy` for an encrypted design matrix `X` and target
//! matrix `y`. The inverse is the adjugate over the determinant, kept as a
//! rational with one shared denominator, so the result comes back as two
//! matrices whose entrywise quotient (after decryption) is `β`.
use crate::errors::{EvalError, EvalResult};
use crate::matrix::Matrix;
use crate::projection::{self, PlainMatrix, PlainRegression};
use crate::rational::Rational;
use crate::scalar::EncryptedScalar;
use crate::scheme::SchemeEngine;
use rand::Rng;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Fewest features (intercept column included) the evaluator accepts.
pub const MIN_FEATURES: usize = 2;

/// Cofactor expansion grows factorially, so larger systems are refused.
pub const MAX_FEATURES: usize = 3;

pub type DesignMatrix<E> = Matrix<EncryptedScalar<E>>;
pub type TargetMatrix<E> = Matrix<EncryptedScalar<E>>;

/// `β` as encrypted numerator and denominator matrices, both
/// `features × targets`.
pub struct RegressionResult<E: SchemeEngine> {
    numerator: Matrix<EncryptedScalar<E>>,
    denominator: Matrix<EncryptedScalar<E>>,
}

impl<E: SchemeEngine> Clone for RegressionResult<E> {
    fn clone(&self) -> Self {
        Self {
            numerator: self.numerator.clone(),
            denominator: self.denominator.clone(),
        }
    }
}

impl<E: SchemeEngine> fmt::Debug for RegressionResult<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegressionResult")
            .field("shape", &self.shape())
            .field("depth", &self.depth())
            .finish()
    }
}

impl<E: SchemeEngine> RegressionResult<E> {
    pub fn from_rational(beta: &Matrix<Rational<E>>) -> Self {
        Self {
            numerator: beta.map(|r| r.numerator().clone()),
            denominator: beta.map(|r| (**r.denominator()).clone()),
        }
    }

    pub fn numerator(&self) -> &Matrix<EncryptedScalar<E>> {
        &self.numerator
    }

    pub fn denominator(&self) -> &Matrix<EncryptedScalar<E>> {
        &self.denominator
    }

    pub fn shape(&self) -> (usize, usize) {
        self.numerator.shape()
    }

    /// Deepest cell of either matrix.
    pub fn depth(&self) -> usize {
        self.numerator
            .iter()
            .chain(self.denominator.iter())
            .map(EncryptedScalar::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn into_parts(self) -> (Matrix<EncryptedScalar<E>>, Matrix<EncryptedScalar<E>>) {
        (self.numerator, self.denominator)
    }
}

/// Splits the slots of a ciphertext into independent problems of `width`
/// consecutive slots; problem `k` reads its answer at slot `k · width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLayout {
    width: usize,
    slots: usize,
}

impl BatchLayout {
    pub fn new(width: usize, slots: usize) -> EvalResult<Self> {
        if !width.is_power_of_two() || width > slots || slots % width != 0 {
            return Err(EvalError::InvalidBatchWidth { width, slots });
        }
        Ok(Self { width, slots })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn problem_count(&self) -> usize {
        self.slots / self.width
    }

    pub fn slot_of(&self, problem: usize) -> usize {
        problem * self.width
    }

    pub fn problem_slots(&self, problem: usize) -> Range<usize> {
        let start = self.slot_of(problem);
        start..start + self.width
    }
}

/// Entry point for encrypted regression, bound to one engine instance.
pub struct LinearRegression<E: SchemeEngine> {
    engine: Arc<E>,
}

impl<E: SchemeEngine> LinearRegression<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// A `rows × cols` matrix of transparent zeros spanning every slot.
    pub fn build_design_matrix(&self, rows: usize, cols: usize) -> EvalResult<DesignMatrix<E>> {
        let slots = self.engine.slot_count();
        Matrix::try_from_fn(rows, cols, |_, _| EncryptedScalar::zero(&self.engine, slots))
    }

    /// Encrypts every cell of a plaintext matrix.
    pub fn encrypt_matrix<R: Rng + ?Sized>(
        &self,
        public_key: &E::PublicKey,
        plain: &PlainMatrix,
        rng: &mut R,
    ) -> EvalResult<Matrix<EncryptedScalar<E>>> {
        plain.try_map(|values| EncryptedScalar::encrypt(&self.engine, public_key, values, rng))
    }

    /// One regression problem per slot: every slot of the cells carries an
    /// independent sample set.
    #[instrument(skip_all, fields(samples = x.rows(), features = x.cols(), targets = y.cols()))]
    pub fn eval_lin_regression(
        &self,
        x: &DesignMatrix<E>,
        y: &TargetMatrix<E>,
    ) -> EvalResult<RegressionResult<E>> {
        self.validate(x, y)?;
        self.solve(x, y, |a, b| a.multiply(b))
    }

    /// Samples packed along the slots: each block of `width` slots is one
    /// problem, folded by inner products wherever `Xᵀ` multiplies.
    #[instrument(skip_all, fields(rows = x.rows(), features = x.cols(), width = width))]
    pub fn eval_lin_regression_batched(
        &self,
        x: &DesignMatrix<E>,
        y: &TargetMatrix<E>,
        width: usize,
    ) -> EvalResult<RegressionResult<E>> {
        let layout = BatchLayout::new(width, self.engine.slot_count())?;
        self.validate(x, y)?;
        debug!(problems = layout.problem_count(), "batched layout");
        self.solve(x, y, move |a, b| a.inner_product(b, width))
    }

    pub fn decrypt_result(
        &self,
        secret_key: &E::SecretKey,
        result: &RegressionResult<E>,
    ) -> EvalResult<PlainRegression> {
        projection::decrypt_result(secret_key, result)
    }

    fn validate(&self, x: &DesignMatrix<E>, y: &TargetMatrix<E>) -> EvalResult<()> {
        let features = x.cols();
        if !(MIN_FEATURES..=MAX_FEATURES).contains(&features) {
            return Err(EvalError::UnsupportedFeatureCount {
                features,
                min: MIN_FEATURES,
                max: MAX_FEATURES,
            });
        }
        if x.rows() != y.rows() {
            return Err(EvalError::ShapeMismatch {
                operation: "eval_lin_regression",
                left: x.shape(),
                right: y.shape(),
            });
        }
        if !x.iter().chain(y.iter()).all(|c| c.belongs_to(&self.engine)) {
            return Err(EvalError::ContextMismatch);
        }
        let mut keys = x.iter().chain(y.iter()).filter_map(EncryptedScalar::key_id);
        if let Some(first) = keys.next() {
            if keys.any(|key| key != first) {
                return Err(EvalError::ContextMismatch);
            }
        }

        // One level for XᵀX, f - 1 for the determinant expansion
        let input_depth = x
            .iter()
            .chain(y.iter())
            .map(EncryptedScalar::depth)
            .max()
            .unwrap_or(0);
        let required = input_depth + features;
        let budget = self.engine.max_depth();
        if required > budget {
            warn!(required, budget, "regression does not fit the depth budget");
            return Err(EvalError::DepthExceeded { required, budget });
        }
        Ok(())
    }

    fn solve<F>(
        &self,
        x: &DesignMatrix<E>,
        y: &TargetMatrix<E>,
        inner: F,
    ) -> EvalResult<RegressionResult<E>>
    where
        F: Fn(&EncryptedScalar<E>, &EncryptedScalar<E>) -> EvalResult<EncryptedScalar<E>>
            + Send
            + Sync,
    {
        let xt = x.transpose();
        let xtx = xt.multiply_with(x, &inner)?;
        let xty = xt.multiply_with(y, &inner)?;
        debug!(xtx = ?xtx.shape(), xty = ?xty.shape(), "normal equations");

        let cofactors = xtx.cofactor_matrix()?;
        let det = Arc::new(xtx.determinant_with_cofactors(&cofactors)?);
        debug!(depth = det.depth(), "determinant");

        let inverse = cofactors
            .transpose()
            .try_map(|c| Rational::with_denominator(c.clone(), &det))?;
        let lifted = xty.try_map(|c| Rational::from_scalar(c.clone()))?;
        let beta = inverse.multiply(&lifted)?;

        let result = RegressionResult::from_rational(&beta);
        debug!(shape = ?result.shape(), depth = result.depth(), "solved");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::IntegerEngine;

    fn engine(depth: usize) -> Arc<IntegerEngine> {
        Arc::new(
            IntegerEngine::builder()
                .slot_count(8)
                .max_depth(depth)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_batch_layout() {
        let layout = BatchLayout::new(4, 16).unwrap();
        assert_eq!(layout.problem_count(), 4);
        assert_eq!(layout.slot_of(3), 12);
        assert_eq!(layout.problem_slots(1), 4..8);

        assert_eq!(BatchLayout::new(16, 16).unwrap().problem_count(), 1);
        for width in [0, 3, 6, 32] {
            assert_eq!(
                BatchLayout::new(width, 16).unwrap_err(),
                EvalError::InvalidBatchWidth { width, slots: 16 }
            );
        }
    }

    #[test]
    fn test_build_design_matrix() {
        let lr = LinearRegression::new(engine(2));
        let x = lr.build_design_matrix(4, 2).unwrap();
        assert_eq!(x.shape(), (4, 2));
        assert!(x.iter().all(|c| c.slot_count() == 8 && c.depth() == 0));
        assert!(lr.build_design_matrix(0, 2).is_err());
    }

    #[test]
    fn test_feature_count_bounds() {
        let lr = LinearRegression::new(engine(4));
        let y = lr.build_design_matrix(4, 1).unwrap();
        for features in [1, 4] {
            let x = lr.build_design_matrix(4, features).unwrap();
            assert_eq!(
                lr.eval_lin_regression(&x, &y).unwrap_err(),
                EvalError::UnsupportedFeatureCount {
                    features,
                    min: 2,
                    max: 3
                }
            );
        }
    }

    #[test]
    fn test_row_mismatch() {
        let lr = LinearRegression::new(engine(4));
        let x = lr.build_design_matrix(4, 2).unwrap();
        let y = lr.build_design_matrix(3, 1).unwrap();
        assert!(matches!(
            lr.eval_lin_regression(&x, &y),
            Err(EvalError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_depth_checked_before_evaluation() {
        let lr = LinearRegression::new(engine(2));
        let x = lr.build_design_matrix(4, 3).unwrap();
        let y = lr.build_design_matrix(4, 1).unwrap();
        assert_eq!(
            lr.eval_lin_regression(&x, &y).unwrap_err(),
            EvalError::DepthExceeded {
                required: 3,
                budget: 2
            }
        );
    }

    #[test]
    fn test_foreign_engine_rejected() {
        let lr = LinearRegression::new(engine(4));
        let other = LinearRegression::new(engine(4));
        let x = lr.build_design_matrix(4, 2).unwrap();
        let y = other.build_design_matrix(4, 1).unwrap();
        assert_eq!(
            lr.eval_lin_regression(&x, &y).unwrap_err(),
            EvalError::ContextMismatch
        );
    }

    #[test]
    fn test_zero_inputs_give_zero_result_shape() {
        let lr = LinearRegression::new(engine(3));
        let x = lr.build_design_matrix(4, 3).unwrap();
        let y = lr.build_design_matrix(4, 2).unwrap();
        let result = lr.eval_lin_regression(&x, &y).unwrap();
        assert_eq!(result.shape(), (3, 2));
        assert_eq!(result.depth(), 3);
    }
}
