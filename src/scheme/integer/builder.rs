use super::{IntegerEngine, IntegerParams};
use crate::scheme::SchemeResult;

/// Builder for [`IntegerEngine`]; unset fields fall back to
/// [`IntegerParams::default`].
pub struct IntegerEngineBuilder {
    plaintext_modulus: Option<u64>,
    slot_count: Option<usize>,
    max_depth: Option<usize>,
    noise_std: Option<f64>,
    public_key_size: Option<usize>,
}

impl Default for IntegerEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerEngineBuilder {
    pub fn new() -> Self {
        Self {
            plaintext_modulus: None,
            slot_count: None,
            max_depth: None,
            noise_std: None,
            public_key_size: None,
        }
    }

    pub fn plaintext_modulus(mut self, modulus: u64) -> Self {
        self.plaintext_modulus = Some(modulus);
        self
    }

    pub fn slot_count(mut self, slots: usize) -> Self {
        self.slot_count = Some(slots);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn noise_std(mut self, std_dev: f64) -> Self {
        self.noise_std = Some(std_dev);
        self
    }

    pub fn public_key_size(mut self, size: usize) -> Self {
        self.public_key_size = Some(size);
        self
    }

    pub fn params(&self) -> IntegerParams {
        let defaults = IntegerParams::default();
        IntegerParams {
            plaintext_modulus: self
                .plaintext_modulus
                .unwrap_or(defaults.plaintext_modulus),
            slot_count: self.slot_count.unwrap_or(defaults.slot_count),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            noise_std: self.noise_std.unwrap_or(defaults.noise_std),
            public_key_size: self.public_key_size.unwrap_or(defaults.public_key_size),
        }
    }

    pub fn build(self) -> SchemeResult<IntegerEngine> {
        IntegerEngine::new(self.params())
    }
}
