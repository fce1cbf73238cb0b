use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::{Arc, OnceLock};
use toy_he_regression::scheme::integer::{IntegerPublicKey, IntegerSecretKey};
use toy_he_regression::{
    EncryptedScalar, EvalError, IntegerEngine, LinearRegression, Matrix, PlainMatrix,
    SchemeEngine, decrypt_matrix,
};

const SLOTS: usize = 4;

struct Keys {
    lr: LinearRegression<IntegerEngine>,
    pk: IntegerPublicKey,
    sk: IntegerSecretKey,
}

fn keys() -> &'static Keys {
    static KEYS: OnceLock<Keys> = OnceLock::new();
    KEYS.get_or_init(|| {
        let engine = Arc::new(
            IntegerEngine::builder()
                .slot_count(SLOTS)
                .max_depth(1)
                .build()
                .unwrap(),
        );
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let (pk, sk) = engine.generate_keys(&mut rng).unwrap().into_parts();
        Keys {
            lr: LinearRegression::new(engine),
            pk,
            sk,
        }
    })
}

fn plain_strategy(rows: usize, cols: usize) -> impl Strategy<Value = PlainMatrix> {
    prop::collection::vec(prop::collection::vec(-50i64..50, SLOTS), rows * cols).prop_map(
        move |cells| {
            let mut cells = cells.into_iter();
            Matrix::from_fn(rows, cols, |_, _| cells.next().unwrap_or_default()).unwrap()
        },
    )
}

fn encrypt(plain: &PlainMatrix, seed: u64) -> Matrix<EncryptedScalar<IntegerEngine>> {
    let k = keys();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    k.lr.encrypt_matrix(&k.pk, plain, &mut rng).unwrap()
}

fn matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = Matrix<i64>> {
    prop::collection::vec(-20i64..20, rows * cols).prop_map(move |cells| {
        let mut cells = cells.into_iter();
        Matrix::from_fn(rows, cols, |_, _| cells.next().unwrap_or(0)).unwrap()
    })
}

fn shape_strategy() -> impl Strategy<Value = (usize, usize)> {
    (1usize..5, 1usize..5)
}

fn square_strategy(max_order: usize) -> impl Strategy<Value = Matrix<i64>> {
    (1..=max_order).prop_flat_map(|n| matrix_strategy(n, n))
}

proptest! {
    #[test]
    fn test_transpose_is_an_involution(
        m in shape_strategy().prop_flat_map(|(r, c)| matrix_strategy(r, c)),
    ) {
        prop_assert_eq!(m.transpose().transpose(), m.clone());
        let (rows, cols) = m.shape();
        prop_assert_eq!(m.transpose().shape(), (cols, rows));
    }

    #[test]
    fn test_identity_is_neutral(
        m in shape_strategy().prop_flat_map(|(r, c)| matrix_strategy(r, c)),
    ) {
        let right = Matrix::identity(m.cols(), 0, 1).unwrap();
        let left = Matrix::identity(m.rows(), 0, 1).unwrap();
        prop_assert_eq!(m.multiply(&right).unwrap(), m.clone());
        prop_assert_eq!(left.multiply(&m).unwrap(), m);
    }

    #[test]
    fn test_transpose_reverses_products(
        a in matrix_strategy(2, 3),
        b in matrix_strategy(3, 4),
    ) {
        let ab_t = a.multiply(&b).unwrap().transpose();
        let bt_at = b.transpose().multiply(&a.transpose()).unwrap();
        prop_assert_eq!(ab_t, bt_at);
    }

    #[test]
    fn test_addition_commutes(
        a in matrix_strategy(3, 2),
        b in matrix_strategy(3, 2),
    ) {
        prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
        prop_assert_eq!(a.add(&b).unwrap().subtract(&b).unwrap(), a);
    }

    #[test]
    fn test_determinant_is_multiplicative(
        (a, b) in (2usize..=3).prop_flat_map(|n| (matrix_strategy(n, n), matrix_strategy(n, n))),
    ) {
        let ab = a.multiply(&b).unwrap();
        prop_assert_eq!(
            ab.determinant().unwrap(),
            a.determinant().unwrap() * b.determinant().unwrap()
        );
    }

    #[test]
    fn test_adjugate_scales_identity(m in square_strategy(3).prop_filter("order 2+", |m| m.rows() >= 2)) {
        let det = m.determinant().unwrap();
        let scaled = Matrix::identity(m.rows(), 0, det).unwrap();
        prop_assert_eq!(m.multiply(&m.adjugate().unwrap()).unwrap(), scaled);

        let cofactors = m.cofactor_matrix().unwrap();
        prop_assert_eq!(m.determinant_with_cofactors(&cofactors).unwrap(), det);
    }

    #[test]
    fn test_determinant_of_transpose(m in square_strategy(3)) {
        prop_assert_eq!(m.transpose().determinant().unwrap(), m.determinant().unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_encrypted_transpose_is_an_involution(
        plain in (1usize..4, 1usize..4).prop_flat_map(|(r, c)| plain_strategy(r, c)),
        seed in any::<u64>(),
    ) {
        let k = keys();
        let m = encrypt(&plain, seed);
        let twice = m.transpose().transpose();
        prop_assert_eq!(decrypt_matrix(&k.sk, &twice).unwrap(), plain.clone());
        prop_assert_eq!(decrypt_matrix(&k.sk, &m.transpose()).unwrap(), plain.transpose());
    }

    #[test]
    fn test_encrypted_identity_is_neutral(
        plain in (1usize..4, 1usize..4).prop_flat_map(|(r, c)| plain_strategy(r, c)),
        seed in any::<u64>(),
    ) {
        let k = keys();
        let m = encrypt(&plain, seed);
        let engine = k.lr.engine();
        let zero = EncryptedScalar::zero(engine, SLOTS).unwrap();
        let one = EncryptedScalar::one(engine, SLOTS).unwrap();

        let right = Matrix::identity(m.cols(), zero.clone(), one.clone()).unwrap();
        let left = Matrix::identity(m.rows(), zero, one).unwrap();
        let mr = m.multiply(&right).unwrap();
        let lm = left.multiply(&m).unwrap();
        prop_assert_eq!(decrypt_matrix(&k.sk, &mr).unwrap(), plain.clone());
        prop_assert_eq!(decrypt_matrix(&k.sk, &lm).unwrap(), plain);
        prop_assert!(mr.iter().all(|c| c.depth() == 1));
    }
}

#[test]
fn test_mismatched_products_report_shapes() {
    let a = Matrix::new(2, 3, || 1i64).unwrap();
    let b = Matrix::new(2, 3, || 1i64).unwrap();
    assert_eq!(
        a.multiply(&b).unwrap_err(),
        EvalError::ShapeMismatch {
            operation: "multiply",
            left: (2, 3),
            right: (2, 3)
        }
    );
    assert!(matches!(
        a.determinant(),
        Err(EvalError::InvalidShape { .. })
    ));
}
