pub mod sampling;

pub use sampling::{bounded_gaussian, odd_with_exact_bits, random_subset, uniform_bits};

/// Number of bits needed to represent `value` (0 for 0).
pub const fn bit_length(value: u64) -> u64 {
    (u64::BITS - value.leading_zeros()) as u64
}

/// Map a residue of `Z_t` to its centered representative in `(-t/2, t/2]`.
pub fn center(residue: u64, modulus: u64) -> i64 {
    if residue > modulus / 2 {
        residue as i64 - modulus as i64
    } else {
        residue as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(2), 2);
        assert_eq!(bit_length(65537), 17);
        assert_eq!(bit_length(u64::MAX), 64);
    }

    #[test]
    fn test_center() {
        assert_eq!(center(0, 17), 0);
        assert_eq!(center(8, 17), 8);
        assert_eq!(center(9, 17), -8);
        assert_eq!(center(16, 17), -1);
        assert_eq!(center(5, 10), 5);
        assert_eq!(center(6, 10), -4);
    }
}
