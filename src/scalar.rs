//! Encrypted slot vectors with depth and engine bookkeeping.
use crate::errors::{EvalError, EvalResult};
use crate::matrix::MatrixCell;
use crate::scheme::SchemeEngine;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A ciphertext packing `slot_count` values, tagged with the engine that
/// produced it and the number of sequential multiplications behind it.
///
/// Operations never mutate their operands. Every binary operation first
/// checks that both sides share the same engine instance and key pair, then
/// that their logical slot counts agree. Transparent values carry no key and
/// combine with any key pair of their engine.
pub struct EncryptedScalar<E: SchemeEngine> {
    engine: Arc<E>,
    ciphertext: E::Ciphertext,
    key: Option<u64>,
    slots: usize,
    depth: usize,
}

impl<E: SchemeEngine> Clone for EncryptedScalar<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            ciphertext: self.ciphertext.clone(),
            key: self.key,
            slots: self.slots,
            depth: self.depth,
        }
    }
}

impl<E: SchemeEngine> fmt::Debug for EncryptedScalar<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedScalar")
            .field("key", &self.key)
            .field("slots", &self.slots)
            .field("depth", &self.depth)
            .field("ciphertext", &self.ciphertext)
            .finish()
    }
}

impl<E: SchemeEngine> EncryptedScalar<E> {
    pub fn encrypt<R: Rng + ?Sized>(
        engine: &Arc<E>,
        public_key: &E::PublicKey,
        values: &[i64],
        rng: &mut R,
    ) -> EvalResult<Self> {
        let plaintext = engine.encode(values)?;
        let ciphertext = engine.encrypt(public_key, &plaintext, rng)?;
        Ok(Self {
            engine: Arc::clone(engine),
            ciphertext,
            key: Some(engine.key_id(public_key)),
            slots: values.len(),
            depth: 0,
        })
    }

    /// Noise-free encryption of `slots` zeros.
    pub fn zero(engine: &Arc<E>, slots: usize) -> EvalResult<Self> {
        Self::transparent(engine, &vec![0; slots])
    }

    /// Noise-free encryption of `slots` ones.
    pub fn one(engine: &Arc<E>, slots: usize) -> EvalResult<Self> {
        Self::transparent(engine, &vec![1; slots])
    }

    pub fn transparent(engine: &Arc<E>, values: &[i64]) -> EvalResult<Self> {
        let plaintext = engine.encode(values)?;
        Ok(Self {
            engine: Arc::clone(engine),
            ciphertext: engine.encrypt_transparent(&plaintext),
            key: None,
            slots: values.len(),
            depth: 0,
        })
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn ciphertext(&self) -> &E::Ciphertext {
        &self.ciphertext
    }

    /// Number of values packed when this scalar was created.
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Key pair this value was encrypted under; `None` for transparent values.
    pub fn key_id(&self) -> Option<u64> {
        self.key
    }

    pub fn belongs_to(&self, engine: &Arc<E>) -> bool {
        Arc::ptr_eq(&self.engine, engine)
    }

    pub(crate) fn check_compatible(&self, rhs: &Self) -> EvalResult<()> {
        if !Arc::ptr_eq(&self.engine, &rhs.engine) {
            return Err(EvalError::ContextMismatch);
        }
        if let (Some(left), Some(right)) = (self.key, rhs.key) {
            if left != right {
                return Err(EvalError::ContextMismatch);
            }
        }
        if self.slots != rhs.slots {
            return Err(EvalError::SlotCountMismatch {
                left: self.slots,
                right: rhs.slots,
            });
        }
        Ok(())
    }

    fn check_depth(&self, required: usize) -> EvalResult<usize> {
        let budget = self.engine.max_depth();
        if required > budget {
            warn!(required, budget, "multiplicative depth budget exhausted");
            return Err(EvalError::DepthExceeded { required, budget });
        }
        Ok(required)
    }

    fn check_plain_len(&self, values: &[i64]) -> EvalResult<()> {
        if values.len() != self.slots {
            return Err(EvalError::SlotCountMismatch {
                left: self.slots,
                right: values.len(),
            });
        }
        Ok(())
    }

    fn derive(&self, ciphertext: E::Ciphertext, depth: usize) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            ciphertext,
            key: self.key,
            slots: self.slots,
            depth,
        }
    }

    fn derive_binary(&self, rhs: &Self, ciphertext: E::Ciphertext, depth: usize) -> Self {
        Self {
            key: self.key.or(rhs.key),
            ..self.derive(ciphertext, depth)
        }
    }

    pub fn add(&self, rhs: &Self) -> EvalResult<Self> {
        self.check_compatible(rhs)?;
        let ct = self.engine.add(&self.ciphertext, &rhs.ciphertext);
        Ok(self.derive_binary(rhs, ct, self.depth.max(rhs.depth)))
    }

    pub fn subtract(&self, rhs: &Self) -> EvalResult<Self> {
        self.check_compatible(rhs)?;
        let ct = self.engine.subtract(&self.ciphertext, &rhs.ciphertext);
        Ok(self.derive_binary(rhs, ct, self.depth.max(rhs.depth)))
    }

    pub fn negate(&self) -> Self {
        self.derive(self.engine.negate(&self.ciphertext), self.depth)
    }

    pub fn multiply(&self, rhs: &Self) -> EvalResult<Self> {
        self.check_compatible(rhs)?;
        let depth = self.check_depth(self.depth.max(rhs.depth) + 1)?;
        let ct = self.engine.multiply(&self.ciphertext, &rhs.ciphertext);
        Ok(self.derive_binary(rhs, ct, depth))
    }

    pub fn add_plain(&self, values: &[i64]) -> EvalResult<Self> {
        self.check_plain_len(values)?;
        let plaintext = self.engine.encode(values)?;
        let ct = self.engine.add_plain(&self.ciphertext, &plaintext);
        Ok(self.derive(ct, self.depth))
    }

    /// Slot-wise product with plaintext values; consumes one level.
    pub fn multiply_plain(&self, values: &[i64]) -> EvalResult<Self> {
        self.check_plain_len(values)?;
        let depth = self.check_depth(self.depth + 1)?;
        let plaintext = self.engine.encode(values)?;
        let ct = self.engine.multiply_plain(&self.ciphertext, &plaintext);
        Ok(self.derive(ct, depth))
    }

    /// Slot `j` of the result holds slot `j + offset`, cyclic over the
    /// engine's physical slots.
    pub fn rotate(&self, offset: usize) -> Self {
        self.derive(self.engine.rotate(&self.ciphertext, offset), self.depth)
    }

    /// Slot `j` of the result holds `Σ_{l < length} slot[j + l]`; slot 0 is
    /// the sum of the first `length` values.
    pub fn sum_reduce(&self, length: usize) -> EvalResult<Self> {
        let slots = self.engine.slot_count();
        if !length.is_power_of_two() || length > slots {
            return Err(EvalError::InvalidBatchWidth {
                width: length,
                slots,
            });
        }
        let ct = self.engine.sum_reduce(&self.ciphertext, length)?;
        Ok(self.derive(ct, self.depth))
    }

    pub fn inner_product(&self, rhs: &Self, length: usize) -> EvalResult<Self> {
        self.multiply(rhs)?.sum_reduce(length)
    }

    /// Decrypts and returns the logical slots.
    pub fn decrypt(&self, secret_key: &E::SecretKey) -> EvalResult<Vec<i64>> {
        let plaintext = self.engine.decrypt(secret_key, &self.ciphertext)?;
        let mut values = self.engine.decode(&plaintext);
        values.truncate(self.slots);
        Ok(values)
    }
}

impl<E: SchemeEngine> MatrixCell for EncryptedScalar<E> {
    fn add(&self, rhs: &Self) -> EvalResult<Self> {
        EncryptedScalar::add(self, rhs)
    }

    fn subtract(&self, rhs: &Self) -> EvalResult<Self> {
        EncryptedScalar::subtract(self, rhs)
    }

    fn multiply(&self, rhs: &Self) -> EvalResult<Self> {
        EncryptedScalar::multiply(self, rhs)
    }

    fn negate(&self) -> Self {
        EncryptedScalar::negate(self)
    }
}
