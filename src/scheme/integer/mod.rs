//! Exact slot-wise backend over the integers.
pub mod builder;
pub mod engine;
pub mod keys;
pub mod params;

pub use builder::IntegerEngineBuilder;
pub use engine::{IntegerCiphertext, IntegerEngine, IntegerPlaintext};
pub use keys::{IntegerPublicKey, IntegerSecretKey};
pub use params::IntegerParams;
