//! Keys of the integer scheme.
//!
//! Secret key: an odd integer `p` of `secret_bits` bits.
//! Public key: encryptions of zero `x_i = p·q_i + t·r_i`, with `q_i` random of
//! `cofactor_bits` bits and `r_i` small Gaussian noise.
use super::IntegerParams;
use crate::math::{bounded_gaussian, odd_with_exact_bits, uniform_bits};
use crate::scheme::{SchemeError, SchemeResult};
use num_bigint::{BigInt, BigUint};
use rand::Rng;
use std::fmt;

#[derive(Clone)]
pub struct IntegerSecretKey {
    pub(crate) p: BigUint,
    id: u64,
}

impl IntegerSecretKey {
    pub fn generate<R: Rng + ?Sized>(params: &IntegerParams, rng: &mut R) -> Self {
        let id = rng.random();
        Self {
            p: odd_with_exact_bits(params.secret_bits(), rng),
            id,
        }
    }

    /// Random tag shared with the matching public key.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bits(&self) -> u64 {
        self.p.bits()
    }
}

// Never print the secret itself
impl fmt::Debug for IntegerSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegerSecretKey")
            .field("id", &self.id)
            .field("bits", &self.bits())
            .finish()
    }
}

#[derive(Clone)]
pub struct IntegerPublicKey {
    pub(crate) samples: Vec<BigInt>,
    id: u64,
}

impl IntegerPublicKey {
    pub fn generate<R: Rng + ?Sized>(
        secret_key: &IntegerSecretKey,
        params: &IntegerParams,
        rng: &mut R,
    ) -> SchemeResult<Self> {
        let p = BigInt::from(secret_key.p.clone());
        let t = BigInt::from(params.plaintext_modulus);
        let bound = params.noise_bound();

        let samples = (0..params.public_key_size)
            .map(|_| {
                let q = BigInt::from(uniform_bits(params.cofactor_bits(), rng));
                let r = bounded_gaussian(params.noise_std, bound, rng).map_err(|e| {
                    SchemeError::InvalidParameter {
                        message: e.to_string(),
                    }
                })?;
                Ok(&p * q + &t * r)
            })
            .collect::<SchemeResult<Vec<_>>>()?;

        Ok(Self {
            samples,
            id: secret_key.id,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl fmt::Debug for IntegerPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max_bits = self.samples.iter().map(BigInt::bits).max().unwrap_or(0);
        f.debug_struct("IntegerPublicKey")
            .field("id", &self.id)
            .field("samples", &self.samples.len())
            .field("max_bits", &max_bits)
            .finish()
    }
}
