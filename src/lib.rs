//! Encrypted linear algebra and closed-form least squares over a packed,
//! exact homomorphic scheme.
//!
//! ```no_run
//! use std::sync::Arc;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//! use toy_he_regression::{IntegerEngine, LinearRegression, Matrix, SchemeEngine};
//!
//! let engine = Arc::new(IntegerEngine::builder().slot_count(8).build().unwrap());
//! let mut rng = ChaCha20Rng::seed_from_u64(0);
//! let (pk, sk) = engine.generate_keys(&mut rng).unwrap().into_parts();
//!
//! let lr = LinearRegression::new(Arc::clone(&engine));
//! let x = Matrix::from_fn(8, 2, |i, j| if j == 0 { vec![i as i64] } else { vec![1] }).unwrap();
//! let y = Matrix::from_fn(8, 1, |i, _| vec![i as i64]).unwrap();
//!
//! let x = lr.encrypt_matrix(&pk, &x, &mut rng).unwrap();
//! let y = lr.encrypt_matrix(&pk, &y, &mut rng).unwrap();
//! let beta = lr.eval_lin_regression(&x, &y).unwrap();
//! let plain = lr.decrypt_result(&sk, &beta).unwrap();
//! assert_eq!(plain.ratio(0, 0, 0).unwrap().to_string(), "1");
//! ```
pub mod errors;
pub mod math;
pub mod matrix;
pub mod projection;
pub mod rational;
pub mod regression;
pub mod scalar;
pub mod scheme;

pub use errors::{EvalError, EvalResult};
pub use matrix::{Matrix, MatrixCell};
pub use projection::{
    Fraction, PlainMatrix, PlainRegression, decrypt_matrix, decrypt_rational_matrix,
    decrypt_result,
};
pub use rational::Rational;
pub use regression::{
    BatchLayout, DesignMatrix, LinearRegression, MAX_FEATURES, MIN_FEATURES, RegressionResult,
    TargetMatrix,
};
pub use scalar::EncryptedScalar;
pub use scheme::{
    IntegerEngine, IntegerEngineBuilder, IntegerParams, KeyPair, SchemeEngine, SchemeError,
    SchemeResult,
};
