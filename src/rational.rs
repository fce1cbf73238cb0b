//! Encrypted fractions.
//!
//! The schemes behind [`SchemeEngine`] only offer ring arithmetic, so a
//! quotient is carried as a numerator/denominator pair and divided after
//! decryption. Denominators sit behind an [`Arc`]: every entry of an
//! inverse matrix points at the same determinant ciphertext, and sums of
//! values sharing a denominator only add numerators.
use crate::errors::EvalResult;
use crate::matrix::MatrixCell;
use crate::scalar::EncryptedScalar;
use crate::scheme::SchemeEngine;
use std::fmt;
use std::sync::Arc;

pub struct Rational<E: SchemeEngine> {
    numerator: EncryptedScalar<E>,
    denominator: Arc<EncryptedScalar<E>>,
    unit: bool,
}

impl<E: SchemeEngine> Clone for Rational<E> {
    fn clone(&self) -> Self {
        Self {
            numerator: self.numerator.clone(),
            denominator: Arc::clone(&self.denominator),
            unit: self.unit,
        }
    }
}

impl<E: SchemeEngine> fmt::Debug for Rational<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rational")
            .field("numerator", &self.numerator)
            .field("denominator", &self.denominator)
            .field("unit", &self.unit)
            .finish()
    }
}

impl<E: SchemeEngine> Rational<E> {
    pub fn new(numerator: EncryptedScalar<E>, denominator: EncryptedScalar<E>) -> EvalResult<Self> {
        Self::with_denominator(numerator, &Arc::new(denominator))
    }

    /// `numerator / denominator` where `denominator` may be shared with
    /// other rationals.
    pub fn with_denominator(
        numerator: EncryptedScalar<E>,
        denominator: &Arc<EncryptedScalar<E>>,
    ) -> EvalResult<Self> {
        numerator.check_compatible(denominator)?;
        Ok(Self {
            numerator,
            denominator: Arc::clone(denominator),
            unit: false,
        })
    }

    /// `scalar / 1`, the denominator being a transparent encryption of one.
    pub fn from_scalar(scalar: EncryptedScalar<E>) -> EvalResult<Self> {
        let one = EncryptedScalar::one(scalar.engine(), scalar.slot_count())?;
        Ok(Self {
            numerator: scalar,
            denominator: Arc::new(one),
            unit: true,
        })
    }

    pub fn numerator(&self) -> &EncryptedScalar<E> {
        &self.numerator
    }

    pub fn denominator(&self) -> &Arc<EncryptedScalar<E>> {
        &self.denominator
    }

    pub fn has_unit_denominator(&self) -> bool {
        self.unit
    }

    pub fn shares_denominator(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.denominator, &other.denominator)
    }

    pub fn depth(&self) -> usize {
        self.numerator.depth().max(self.denominator.depth())
    }

    pub fn into_parts(self) -> (EncryptedScalar<E>, Arc<EncryptedScalar<E>>) {
        (self.numerator, self.denominator)
    }

    pub fn add(&self, rhs: &Self) -> EvalResult<Self> {
        if (self.unit && rhs.unit) || self.shares_denominator(rhs) {
            return Ok(Self {
                numerator: self.numerator.add(&rhs.numerator)?,
                denominator: Arc::clone(&self.denominator),
                unit: self.unit,
            });
        }
        if self.unit {
            // n1 + n2/d2 = (n1·d2 + n2) / d2
            let scaled = self.numerator.multiply(&rhs.denominator)?;
            return Ok(Self {
                numerator: scaled.add(&rhs.numerator)?,
                denominator: Arc::clone(&rhs.denominator),
                unit: false,
            });
        }
        if rhs.unit {
            let scaled = rhs.numerator.multiply(&self.denominator)?;
            return Ok(Self {
                numerator: self.numerator.add(&scaled)?,
                denominator: Arc::clone(&self.denominator),
                unit: false,
            });
        }

        let left = self.numerator.multiply(&rhs.denominator)?;
        let right = rhs.numerator.multiply(&self.denominator)?;
        Ok(Self {
            numerator: left.add(&right)?,
            denominator: Arc::new(self.denominator.multiply(&rhs.denominator)?),
            unit: false,
        })
    }

    pub fn negate(&self) -> Self {
        Self {
            numerator: self.numerator.negate(),
            denominator: Arc::clone(&self.denominator),
            unit: self.unit,
        }
    }

    pub fn subtract(&self, rhs: &Self) -> EvalResult<Self> {
        self.add(&rhs.negate())
    }

    pub fn multiply(&self, rhs: &Self) -> EvalResult<Self> {
        let numerator = self.numerator.multiply(&rhs.numerator)?;
        let (denominator, unit) = match (self.unit, rhs.unit) {
            (true, true) => (Arc::clone(&self.denominator), true),
            (true, false) => (Arc::clone(&rhs.denominator), false),
            (false, true) => (Arc::clone(&self.denominator), false),
            (false, false) => (
                Arc::new(self.denominator.multiply(&rhs.denominator)?),
                false,
            ),
        };
        Ok(Self {
            numerator,
            denominator,
            unit,
        })
    }

    /// Decrypted `(numerators, denominators)` of the logical slots.
    pub fn decrypt(&self, secret_key: &E::SecretKey) -> EvalResult<(Vec<i64>, Vec<i64>)> {
        Ok((
            self.numerator.decrypt(secret_key)?,
            self.denominator.decrypt(secret_key)?,
        ))
    }
}

impl<E: SchemeEngine> MatrixCell for Rational<E> {
    fn add(&self, rhs: &Self) -> EvalResult<Self> {
        Rational::add(self, rhs)
    }

    fn subtract(&self, rhs: &Self) -> EvalResult<Self> {
        Rational::subtract(self, rhs)
    }

    fn multiply(&self, rhs: &Self) -> EvalResult<Self> {
        Rational::multiply(self, rhs)
    }

    fn negate(&self) -> Self {
        Rational::negate(self)
    }
}
