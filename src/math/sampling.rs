use num_bigint::BigUint;
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

/// Sample a uniformly random integer in `[0, 2^bits)`.
pub fn uniform_bits<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> BigUint {
    if bits == 0 {
        return BigUint::default();
    }
    let byte_len = bits.div_ceil(8) as usize;
    let mut bytes = vec![0u8; byte_len];
    rng.fill(&mut bytes[..]);

    // Clear the bits above `bits` in the most significant byte
    let excess = (byte_len as u64) * 8 - bits;
    bytes[byte_len - 1] &= 0xffu8 >> excess;

    BigUint::from_bytes_le(&bytes)
}

/// Sample an odd integer with exactly `bits` bits (top and bottom bits set).
pub fn odd_with_exact_bits<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> BigUint {
    assert!(bits >= 2, "an odd integer with a fixed top bit needs 2+ bits");
    let middle = uniform_bits(bits - 2, rng) << 1usize;
    (BigUint::from(1u8) << (bits - 1) as usize) + middle + 1u8
}

/// Sample a rounded Gaussian integer, rejecting samples with `|x| > bound`.
pub fn bounded_gaussian<R: Rng + ?Sized>(
    std_dev: f64,
    bound: i64,
    rng: &mut R,
) -> Result<i64, NormalError> {
    let normal = Normal::new(0.0, std_dev)?;
    loop {
        let sample = normal.sample(rng).round() as i64;
        if sample.abs() <= bound {
            return Ok(sample);
        }
    }
}

/// Sample a random subset of `0..len`, each index kept with probability 1/2.
pub fn random_subset<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    (0..len).filter(|_| rng.random_bool(0.5)).collect()
}
