/// Public/secret key pair produced by [`SchemeEngine::generate_keys`].
///
/// [`SchemeEngine::generate_keys`]: super::SchemeEngine::generate_keys
#[derive(Debug, Clone)]
pub struct KeyPair<PK, SK> {
    pub public_key: PK,
    pub secret_key: SK,
}

impl<PK, SK> KeyPair<PK, SK> {
    pub fn new(public_key: PK, secret_key: SK) -> Self {
        Self {
            public_key,
            secret_key,
        }
    }

    pub fn into_parts(self) -> (PK, SK) {
        (self.public_key, self.secret_key)
    }
}
