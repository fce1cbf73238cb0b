#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::error::Error;
use std::sync::Arc;
use toy_he_regression::{IntegerEngine, LinearRegression, Matrix, SchemeEngine};

const WIDTH: usize = 8;

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "dhat-heap")]
    let _dhat = dhat::Profiler::new_heap();

    let engine = Arc::new(
        IntegerEngine::builder()
            .plaintext_modulus(65537)
            .slot_count(2 * WIDTH)
            .max_depth(2)
            .build()?,
    );
    println!(
        "Engine: t = {}, {} slots, depth {}, secret {} bits",
        engine.plaintext_modulus(),
        engine.slot_count(),
        engine.max_depth(),
        engine.params().secret_bits()
    );

    let mut rng = ChaCha20Rng::seed_from_u64(2333);
    println!("Generating keys...");
    let (public_key, secret_key) = engine.generate_keys(&mut rng)?.into_parts();

    // Two problems of eight samples each, packed side by side:
    //   slots 0..8:  x = 0, 2, ..., 14 and y = 0..7   (slope 1/2)
    //   slots 8..16: x = 0, 1, ..., 7  and y = 3x + 2
    let xs: Vec<i64> = (0..8).map(|i| 2 * i).chain(0..8).collect();
    let ones = vec![1; 2 * WIDTH];
    let ys: Vec<i64> = (0..8).chain((0..8).map(|i| 3 * i + 2)).collect();
    println!("Input x: {xs:?}");
    println!("Input y: {ys:?}");

    let x_plain = Matrix::from_rows(vec![vec![xs, ones]])?;
    let y_plain = Matrix::from_rows(vec![vec![ys]])?;

    let lr = LinearRegression::new(Arc::clone(&engine));
    let x = lr.encrypt_matrix(&public_key, &x_plain, &mut rng)?;
    let y = lr.encrypt_matrix(&public_key, &y_plain, &mut rng)?;

    println!("Evaluating (XᵀX)⁻¹ Xᵀy under encryption...");
    let result = lr.eval_lin_regression_batched(&x, &y, WIDTH)?;
    println!("Result: {result:?}");

    let plain = lr.decrypt_result(&secret_key, &result)?;
    for problem in 0..2 {
        let slot = problem * WIDTH;
        let ratios = plain.ratios_at(slot)?;
        let coefficients = plain.coefficients_at(slot)?;
        println!("Problem {problem} (slot {slot}):");
        for (name, row) in ["slope", "intercept"].iter().zip(0..) {
            println!(
                "  {name:>9} = {:>8}  ({:.4})  raw {}/{}",
                ratios.get(row, 0)?.to_string(),
                coefficients.get(row, 0)?,
                plain.numerator.get(row, 0)?[slot],
                plain.denominator.get(row, 0)?[slot]
            );
        }
    }

    Ok(())
}
