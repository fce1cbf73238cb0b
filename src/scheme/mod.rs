//! Scheme engine boundary
//!
//! The regression core never touches ring arithmetic itself. Everything it
//! needs from a homomorphic scheme is expressed by [`SchemeEngine`]: key
//! generation, slot encoding, encryption and the evaluation operations.
//! Parameters (plaintext modulus, slot count, depth budget) are fixed when an
//! engine is built and never change afterwards.

pub mod errors;
pub mod integer;
pub mod types;

pub use errors::{SchemeError, SchemeResult};
pub use integer::{IntegerEngine, IntegerEngineBuilder, IntegerParams};
pub use types::KeyPair;

use rand::Rng;
use std::fmt::Debug;

/// Capability object of a packed, exact-arithmetic homomorphic scheme.
///
/// Ciphertexts pack [`slot_count`](SchemeEngine::slot_count) values of
/// `Z_t`, `t` being the plaintext modulus. All evaluation operations act
/// slot-wise except [`rotate`](SchemeEngine::rotate), which moves slot
/// `j + offset` into slot `j`.
///
/// Depth bookkeeping lives with the caller: the engine only advertises its
/// budget through [`max_depth`](SchemeEngine::max_depth) and guarantees
/// correct decryption for any value that stays within it.
pub trait SchemeEngine: Send + Sync + 'static {
    type Plaintext: Clone + Debug + Send + Sync;
    type Ciphertext: Clone + Debug + Send + Sync;
    type PublicKey: Send + Sync;
    type SecretKey: Send + Sync;

    /// Number of physical slots in one ciphertext.
    fn slot_count(&self) -> usize;

    fn plaintext_modulus(&self) -> u64;

    /// Number of sequential ciphertext multiplications a value may accumulate.
    fn max_depth(&self) -> usize;

    fn generate_keys<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> SchemeResult<KeyPair<Self::PublicKey, Self::SecretKey>>;

    /// Identity of the key pair a public key belongs to. Ciphertexts
    /// encrypted under different key pairs must never be combined.
    fn key_id(&self, public_key: &Self::PublicKey) -> u64;

    /// Packs `values` into the first slots, zero padding the rest.
    fn encode(&self, values: &[i64]) -> SchemeResult<Self::Plaintext>;

    /// Returns every slot, centered in `(-t/2, t/2]`.
    fn decode(&self, plaintext: &Self::Plaintext) -> Vec<i64>;

    fn encrypt<R: Rng + ?Sized>(
        &self,
        public_key: &Self::PublicKey,
        plaintext: &Self::Plaintext,
        rng: &mut R,
    ) -> SchemeResult<Self::Ciphertext>;

    fn decrypt(
        &self,
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
    ) -> SchemeResult<Self::Plaintext>;

    /// Noise-free encryption of a plaintext, usable without any key.
    fn encrypt_transparent(&self, plaintext: &Self::Plaintext) -> Self::Ciphertext;

    fn add(&self, lhs: &Self::Ciphertext, rhs: &Self::Ciphertext) -> Self::Ciphertext;

    fn negate(&self, ciphertext: &Self::Ciphertext) -> Self::Ciphertext;

    fn subtract(
        &self,
        lhs: &Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Self::Ciphertext {
        self.add(lhs, &self.negate(rhs))
    }

    fn multiply(
        &self,
        lhs: &Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Self::Ciphertext;

    fn add_plain(
        &self,
        ciphertext: &Self::Ciphertext,
        plaintext: &Self::Plaintext,
    ) -> Self::Ciphertext;

    fn multiply_plain(
        &self,
        ciphertext: &Self::Ciphertext,
        plaintext: &Self::Plaintext,
    ) -> Self::Ciphertext;

    fn rotate(&self, ciphertext: &Self::Ciphertext, offset: usize) -> Self::Ciphertext;

    /// Rotate-and-add tree: slot `j` of the result holds
    /// `Σ_{l < length} slot[j + l]`, so slot 0 is the sum of the first
    /// `length` slots.
    fn sum_reduce(
        &self,
        ciphertext: &Self::Ciphertext,
        length: usize,
    ) -> SchemeResult<Self::Ciphertext> {
        let slots = self.slot_count();
        if !length.is_power_of_two() || length > slots {
            return Err(SchemeError::InvalidReduceLength { length, slots });
        }

        let mut acc = ciphertext.clone();
        let mut step = 1;
        while step < length {
            acc = self.add(&acc, &self.rotate(&acc, step));
            step <<= 1;
        }
        Ok(acc)
    }
}
