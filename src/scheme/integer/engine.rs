use super::keys::{IntegerPublicKey, IntegerSecretKey};
use super::{IntegerEngineBuilder, IntegerParams};
use crate::math::{bounded_gaussian, center, random_subset};
use crate::scheme::{KeyPair, SchemeEngine, SchemeError, SchemeResult};
use num_bigint::BigInt;
use num_integer::Integer;
use rand::Rng;
use std::fmt;
use tracing::{debug, info, instrument};

/// Slot residues in `[0, t)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerPlaintext {
    pub(crate) slots: Vec<u64>,
}

impl IntegerPlaintext {
    pub fn residues(&self) -> &[u64] {
        &self.slots
    }
}

/// One integer per slot. Operations never reduce, so the integers grow
/// with multiplicative depth.
#[derive(Clone, PartialEq, Eq)]
pub struct IntegerCiphertext {
    pub(crate) slots: Vec<BigInt>,
}

impl IntegerCiphertext {
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Size of the largest slot integer.
    pub fn max_bits(&self) -> u64 {
        self.slots.iter().map(BigInt::bits).max().unwrap_or(0)
    }
}

impl fmt::Debug for IntegerCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegerCiphertext")
            .field("slots", &self.slots.len())
            .field("max_bits", &self.max_bits())
            .finish()
    }
}

/// Slot-wise somewhat homomorphic scheme over the integers.
///
/// Each slot is encrypted independently as `c = m + t·r + Σ_{i∈S} x_i`
/// where the `x_i` are public encryptions of zero. Decryption computes
/// `(c mod p) mod t` with centered reductions. Arithmetic is exact for
/// every computation that stays within [`IntegerParams::max_depth`].
///
/// This is a teaching backend: it offers no meaningful security at the
/// default sizes.
pub struct IntegerEngine {
    params: IntegerParams,
}

impl IntegerEngine {
    pub fn builder() -> IntegerEngineBuilder {
        IntegerEngineBuilder::new()
    }

    pub fn new(params: IntegerParams) -> SchemeResult<Self> {
        params.validate()?;
        info!(
            plaintext_modulus = params.plaintext_modulus,
            slots = params.slot_count,
            max_depth = params.max_depth,
            secret_bits = params.secret_bits(),
            "integer engine ready"
        );
        Ok(Self { params })
    }

    pub fn params(&self) -> &IntegerParams {
        &self.params
    }

    fn modulus(&self) -> BigInt {
        BigInt::from(self.params.plaintext_modulus)
    }

    fn zip_slots(
        lhs: &IntegerCiphertext,
        rhs: &IntegerCiphertext,
        op: impl Fn(&BigInt, &BigInt) -> BigInt,
    ) -> IntegerCiphertext {
        IntegerCiphertext {
            slots: lhs
                .slots
                .iter()
                .zip(&rhs.slots)
                .map(|(a, b)| op(a, b))
                .collect(),
        }
    }

    fn check_width(&self, got: usize) -> SchemeResult<()> {
        if got != self.params.slot_count {
            return Err(SchemeError::Decryption {
                message: format!(
                    "ciphertext has {got} slots, engine expects {}",
                    self.params.slot_count
                ),
            });
        }
        Ok(())
    }
}

impl SchemeEngine for IntegerEngine {
    type Plaintext = IntegerPlaintext;
    type Ciphertext = IntegerCiphertext;
    type PublicKey = IntegerPublicKey;
    type SecretKey = IntegerSecretKey;

    fn slot_count(&self) -> usize {
        self.params.slot_count
    }

    fn plaintext_modulus(&self) -> u64 {
        self.params.plaintext_modulus
    }

    fn max_depth(&self) -> usize {
        self.params.max_depth
    }

    #[instrument(skip_all, fields(secret_bits = self.params.secret_bits()))]
    fn generate_keys<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> SchemeResult<KeyPair<IntegerPublicKey, IntegerSecretKey>> {
        let secret_key = IntegerSecretKey::generate(&self.params, rng);
        let public_key = IntegerPublicKey::generate(&secret_key, &self.params, rng)?;
        debug!(public_key = ?public_key, "generated key pair");
        Ok(KeyPair::new(public_key, secret_key))
    }

    fn key_id(&self, public_key: &IntegerPublicKey) -> u64 {
        public_key.id()
    }

    fn encode(&self, values: &[i64]) -> SchemeResult<IntegerPlaintext> {
        if values.is_empty() {
            return Err(SchemeError::EmptyInput);
        }
        if values.len() > self.params.slot_count {
            return Err(SchemeError::InputTooLong {
                got: values.len(),
                max: self.params.slot_count,
            });
        }

        let t = self.params.plaintext_modulus as i128;
        let mut slots: Vec<u64> = values
            .iter()
            .map(|&v| (v as i128).rem_euclid(t) as u64)
            .collect();
        slots.resize(self.params.slot_count, 0);
        Ok(IntegerPlaintext { slots })
    }

    fn decode(&self, plaintext: &IntegerPlaintext) -> Vec<i64> {
        let t = self.params.plaintext_modulus;
        plaintext.slots.iter().map(|&r| center(r, t)).collect()
    }

    fn encrypt<R: Rng + ?Sized>(
        &self,
        public_key: &IntegerPublicKey,
        plaintext: &IntegerPlaintext,
        rng: &mut R,
    ) -> SchemeResult<IntegerCiphertext> {
        let t = self.modulus();
        let bound = self.params.noise_bound();

        let slots = plaintext
            .slots
            .iter()
            .map(|&m| {
                let r = bounded_gaussian(self.params.noise_std, bound, rng).map_err(|e| {
                    SchemeError::InvalidParameter {
                        message: e.to_string(),
                    }
                })?;
                let mut c = BigInt::from(m) + &t * r;
                for i in random_subset(public_key.samples.len(), rng) {
                    c += &public_key.samples[i];
                }
                Ok(c)
            })
            .collect::<SchemeResult<Vec<_>>>()?;

        Ok(IntegerCiphertext { slots })
    }

    fn decrypt(
        &self,
        secret_key: &IntegerSecretKey,
        ciphertext: &IntegerCiphertext,
    ) -> SchemeResult<IntegerPlaintext> {
        self.check_width(ciphertext.slot_count())?;

        let p = BigInt::from(secret_key.p.clone());
        let half_p: BigInt = &p >> 1usize;
        let t = self.modulus();

        let slots = ciphertext
            .slots
            .iter()
            .map(|c| {
                let mut noise = c.mod_floor(&p);
                if noise > half_p {
                    noise -= &p;
                }
                let residue = noise.mod_floor(&t);
                // `residue` lies in [0, t) and t fits a u64
                let (_, digits) = residue.to_u64_digits();
                digits.first().copied().unwrap_or(0)
            })
            .collect();

        Ok(IntegerPlaintext { slots })
    }

    fn encrypt_transparent(&self, plaintext: &IntegerPlaintext) -> IntegerCiphertext {
        IntegerCiphertext {
            slots: plaintext.slots.iter().map(|&m| BigInt::from(m)).collect(),
        }
    }

    fn add(&self, lhs: &IntegerCiphertext, rhs: &IntegerCiphertext) -> IntegerCiphertext {
        Self::zip_slots(lhs, rhs, |a, b| a + b)
    }

    fn negate(&self, ciphertext: &IntegerCiphertext) -> IntegerCiphertext {
        IntegerCiphertext {
            slots: ciphertext.slots.iter().map(|c| -c).collect(),
        }
    }

    fn subtract(&self, lhs: &IntegerCiphertext, rhs: &IntegerCiphertext) -> IntegerCiphertext {
        Self::zip_slots(lhs, rhs, |a, b| a - b)
    }

    fn multiply(&self, lhs: &IntegerCiphertext, rhs: &IntegerCiphertext) -> IntegerCiphertext {
        Self::zip_slots(lhs, rhs, |a, b| a * b)
    }

    fn add_plain(
        &self,
        ciphertext: &IntegerCiphertext,
        plaintext: &IntegerPlaintext,
    ) -> IntegerCiphertext {
        IntegerCiphertext {
            slots: ciphertext
                .slots
                .iter()
                .zip(&plaintext.slots)
                .map(|(c, &m)| c + m)
                .collect(),
        }
    }

    fn multiply_plain(
        &self,
        ciphertext: &IntegerCiphertext,
        plaintext: &IntegerPlaintext,
    ) -> IntegerCiphertext {
        IntegerCiphertext {
            slots: ciphertext
                .slots
                .iter()
                .zip(&plaintext.slots)
                .map(|(c, &m)| c * m)
                .collect(),
        }
    }

    fn rotate(&self, ciphertext: &IntegerCiphertext, offset: usize) -> IntegerCiphertext {
        let mut slots = ciphertext.slots.clone();
        if !slots.is_empty() {
            let shift = offset % slots.len();
            slots.rotate_left(shift);
        }
        IntegerCiphertext { slots }
    }
}
