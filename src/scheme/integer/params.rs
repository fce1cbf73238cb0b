use crate::math::bit_length;
use crate::scheme::{SchemeError, SchemeResult};

/// Samples beyond this many standard deviations are rejected.
pub const NOISE_TAIL_CUT: f64 = 12.0;

/// Bits of growth reserved for additions, rotations and sums at each level.
pub const ADDITION_HEADROOM_BITS: u64 = 24;

/// Largest plaintext modulus accepted; decoded slots must fit an `i64`.
pub const MAX_PLAINTEXT_MODULUS: u64 = 1 << 62;

/// The secret modulus doubles per level, so the budget is kept small.
pub const MAX_DEPTH_BUDGET: usize = 10;

/// Parameters of the integer scheme. Everything else (key sizes, noise
/// capacity) is derived from these and fixed once the engine exists.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerParams {
    /// Plaintext modulus `t`; slots hold values of `Z_t`.
    pub plaintext_modulus: u64,
    /// Physical slots per ciphertext, a power of two.
    pub slot_count: usize,
    /// Multiplicative depth budget.
    pub max_depth: usize,
    /// Standard deviation of the encryption noise.
    pub noise_std: f64,
    /// Number of encryptions of zero in the public key.
    pub public_key_size: usize,
}

impl IntegerParams {
    pub fn validate(&self) -> SchemeResult<()> {
        if self.plaintext_modulus < 2 || self.plaintext_modulus > MAX_PLAINTEXT_MODULUS {
            return Err(invalid(format!(
                "plaintext modulus must lie in [2, 2^62], got {}",
                self.plaintext_modulus
            )));
        }
        if !self.slot_count.is_power_of_two() {
            return Err(invalid(format!(
                "slot count must be a power of two, got {}",
                self.slot_count
            )));
        }
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_BUDGET {
            return Err(invalid(format!(
                "depth budget must lie in [1, {MAX_DEPTH_BUDGET}], got {}",
                self.max_depth
            )));
        }
        if !(self.noise_std.is_finite() && self.noise_std > 0.0) {
            return Err(invalid(format!(
                "noise standard deviation must be positive, got {}",
                self.noise_std
            )));
        }
        if self.public_key_size == 0 {
            return Err(invalid("public key needs at least one sample".into()));
        }
        Ok(())
    }

    /// Largest absolute value of a single noise sample.
    pub fn noise_bound(&self) -> i64 {
        (self.noise_std * NOISE_TAIL_CUT).ceil().max(1.0) as i64
    }

    /// Bit bound on the noise `m + t·(r + Σ r_i)` of a fresh encryption.
    pub fn fresh_noise_bits(&self) -> u64 {
        bit_length(self.plaintext_modulus)
            + bit_length(self.noise_bound() as u64)
            + bit_length(self.public_key_size as u64 + 2)
    }

    /// Bit bound on the noise of a value at `depth`, after additions.
    pub fn level_noise_bits(&self, depth: usize) -> u64 {
        let mut bits = self.fresh_noise_bits() + ADDITION_HEADROOM_BITS;
        for _ in 0..depth {
            bits = 2 * bits + ADDITION_HEADROOM_BITS;
        }
        bits
    }

    /// Bit length of the secret modulus `p`, large enough that every value
    /// within the depth budget decrypts correctly.
    pub fn secret_bits(&self) -> u64 {
        self.level_noise_bits(self.max_depth) + 2
    }

    /// Bit length of the random multiples `q_i` in the public key.
    pub fn cofactor_bits(&self) -> u64 {
        self.secret_bits()
    }
}

impl Default for IntegerParams {
    fn default() -> Self {
        Self {
            plaintext_modulus: 65537,
            slot_count: 16,
            max_depth: 4,
            noise_std: 3.2,
            public_key_size: 16,
        }
    }
}

fn invalid(message: String) -> SchemeError {
    SchemeError::InvalidParameter { message }
}
