use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::{Arc, OnceLock};
use toy_he_regression::scheme::integer::{IntegerPublicKey, IntegerSecretKey};
use toy_he_regression::{EncryptedScalar, IntegerEngine, SchemeEngine, SchemeError};

const T: i64 = 65537;

struct Keys {
    engine: Arc<IntegerEngine>,
    pk: IntegerPublicKey,
    sk: IntegerSecretKey,
}

// Key generation dominates, so the proptests share one key pair
fn keys() -> &'static Keys {
    static KEYS: OnceLock<Keys> = OnceLock::new();
    KEYS.get_or_init(|| {
        let engine = Arc::new(
            IntegerEngine::builder()
                .slot_count(8)
                .max_depth(2)
                .build()
                .unwrap(),
        );
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let (pk, sk) = engine.generate_keys(&mut rng).unwrap().into_parts();
        Keys { engine, pk, sk }
    })
}

fn centered(value: i64) -> i64 {
    let r = value.rem_euclid(T);
    if r > T / 2 { r - T } else { r }
}

fn slots() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-300i64..300, 1..=8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_roundtrip(values in slots(), seed in any::<u64>()) {
        let k = keys();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let ct = EncryptedScalar::encrypt(&k.engine, &k.pk, &values, &mut rng).unwrap();
        prop_assert_eq!(ct.decrypt(&k.sk).unwrap(), values);
    }

    #[test]
    fn test_homomorphic_ring_operations(
        (a, b) in (1usize..=8).prop_flat_map(|n| (
            prop::collection::vec(-300i64..300, n),
            prop::collection::vec(-300i64..300, n),
        )),
        seed in any::<u64>(),
    ) {
        let k = keys();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let ea = EncryptedScalar::encrypt(&k.engine, &k.pk, &a, &mut rng).unwrap();
        let eb = EncryptedScalar::encrypt(&k.engine, &k.pk, &b, &mut rng).unwrap();

        let zip = |f: fn(i64, i64) -> i64| -> Vec<i64> {
            a.iter().zip(&b).map(|(&x, &y)| centered(f(x, y))).collect()
        };

        prop_assert_eq!(ea.add(&eb).unwrap().decrypt(&k.sk).unwrap(), zip(|x, y| x + y));
        prop_assert_eq!(ea.subtract(&eb).unwrap().decrypt(&k.sk).unwrap(), zip(|x, y| x - y));
        prop_assert_eq!(ea.multiply(&eb).unwrap().decrypt(&k.sk).unwrap(), zip(|x, y| x * y));

        // Two levels: (a·b)·b
        let twice = ea.multiply(&eb).unwrap().multiply(&eb).unwrap();
        prop_assert_eq!(twice.decrypt(&k.sk).unwrap(), zip(|x, y| x * y * y));
    }

    #[test]
    fn test_sum_reduce_prefix(values in prop::collection::vec(-300i64..300, 8), seed in any::<u64>()) {
        let k = keys();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let ct = EncryptedScalar::encrypt(&k.engine, &k.pk, &values, &mut rng).unwrap();
        for length in [1usize, 2, 4, 8] {
            let summed = ct.sum_reduce(length).unwrap().decrypt(&k.sk).unwrap();
            prop_assert_eq!(summed[0], values[..length].iter().sum::<i64>());
        }
    }
}

#[test]
fn test_wraps_modulo_plaintext_modulus() {
    let k = keys();
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let big = EncryptedScalar::encrypt(&k.engine, &k.pk, &[300, -300], &mut rng).unwrap();
    let squared = big.multiply(&big).unwrap();
    assert_eq!(squared.decrypt(&k.sk).unwrap(), vec![centered(90000); 2]);
    assert_eq!(centered(90000), 90000 - T);
}

#[test]
fn test_engine_errors_surface() {
    let k = keys();
    assert_eq!(k.engine.encode(&[]).unwrap_err(), SchemeError::EmptyInput);
    assert_eq!(
        k.engine.encode(&[0; 9]).unwrap_err(),
        SchemeError::InputTooLong { got: 9, max: 8 }
    );
    assert!(matches!(
        IntegerEngine::builder().plaintext_modulus(1).build(),
        Err(SchemeError::InvalidParameter { .. })
    ));
}
