#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::error::Error;
use std::sync::Arc;
use toy_he_regression::{EncryptedScalar, IntegerEngine, SchemeEngine};

const N: usize = 64;

fn sample(rng: &mut ChaCha20Rng) -> Vec<i64> {
    (0..N).map(|_| rng.random_range(1..=500)).collect()
}

/// Final velocity `v_f = v_i + a·t` on packed slots, then its total, its
/// squared norm and its inner product with the times.
fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "dhat-heap")]
    let _dhat = dhat::Profiler::new_heap();

    let engine = Arc::new(
        IntegerEngine::builder()
            .plaintext_modulus(1 << 50)
            .slot_count(N)
            .max_depth(2)
            .build()?,
    );
    let mut rng = ChaCha20Rng::seed_from_u64(1032193);
    println!("Generating keys...");
    let (public_key, secret_key) = engine.generate_keys(&mut rng)?.into_parts();

    let acc = sample(&mut rng);
    let initial_velocity = sample(&mut rng);
    let times = sample(&mut rng);

    println!("Encrypting {N} samples...");
    let enc_acc = EncryptedScalar::encrypt(&engine, &public_key, &acc, &mut rng)?;
    let enc_vi = EncryptedScalar::encrypt(&engine, &public_key, &initial_velocity, &mut rng)?;
    let enc_times = EncryptedScalar::encrypt(&engine, &public_key, &times, &mut rng)?;

    let enc_final = enc_vi.add(&enc_acc.multiply(&enc_times)?)?;
    let enc_sum = enc_final.sum_reduce(N)?;
    let enc_norm = enc_final.inner_product(&enc_final, N)?;
    let enc_ip = enc_final.inner_product(&enc_times, N)?;

    let expected: Vec<i64> = (0..N)
        .map(|i| initial_velocity[i] + acc[i] * times[i])
        .collect();
    let final_velocity = enc_final.decrypt(&secret_key)?;
    println!("v_f[..8] = {:?}", &final_velocity[..8]);
    assert_eq!(final_velocity, expected);

    let total = enc_sum.decrypt(&secret_key)?[0];
    println!("Σ v_f = {total} (expected {})", expected.iter().sum::<i64>());

    let norm = enc_norm.decrypt(&secret_key)?[0];
    let expected_norm: i64 = expected.iter().map(|v| v * v).sum();
    println!("⟨v_f, v_f⟩ = {norm} (expected {expected_norm})");

    let ip = enc_ip.decrypt(&secret_key)?[0];
    let expected_ip: i64 = expected.iter().zip(&times).map(|(v, t)| v * t).sum();
    println!("⟨v_f, t⟩ = {ip} (expected {expected_ip}), depth {}", enc_ip.depth());

    Ok(())
}
