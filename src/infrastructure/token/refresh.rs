//! Opaque refresh token generation
//!
//! A refresh token is an unpredictable credential with no embedded claims:
//! CSPRNG entropy combined with the issuance timestamp and run through the
//! keyed hash, yielding a fixed-length hex string. Mapping tokens to
//! identities and lifetimes is the job of a server-side store.

use chrono::Utc;
use rand::RngCore;

use crate::infrastructure::codec::base64url_encode;
use crate::infrastructure::signer::{Algorithm, HmacSigner};

/// Number of random bytes feeding each token.
const ENTROPY_BYTES: usize = 32;

/// Generator for opaque refresh tokens.
#[derive(Debug, Clone)]
pub struct RefreshTokenGenerator {
    signer: HmacSigner,
}

impl RefreshTokenGenerator {
    pub fn new(algorithm: Algorithm, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            signer: HmacSigner::new(algorithm, secret),
        }
    }

    /// Generate a fresh token from 32 bytes of CSPRNG entropy and the
    /// current time.
    pub fn generate(&self) -> String {
        let mut entropy = [0u8; ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut entropy);

        self.derive(&entropy, Utc::now().timestamp())
    }

    /// Length in characters of every token this generator produces.
    pub fn token_length(&self) -> usize {
        self.signer.algorithm().digest_length() * 2
    }

    fn derive(&self, entropy: &[u8], issued_at: i64) -> String {
        let material = format!("{}{}", hex::encode(entropy), issued_at);
        self.signer.sign_hex(&base64url_encode(material.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn create_generator() -> RefreshTokenGenerator {
        RefreshTokenGenerator::new(Algorithm::HS256, b"refresh-secret".to_vec())
    }

    #[test]
    fn test_tokens_are_pairwise_distinct() {
        let generator = create_generator();
        let tokens: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();

        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_token_has_fixed_length() {
        let generator = create_generator();

        assert_eq!(generator.token_length(), 64);
        assert_eq!(generator.generate().len(), 64);

        let wide = RefreshTokenGenerator::new(Algorithm::HS512, b"refresh-secret".to_vec());
        assert_eq!(wide.generate().len(), 128);
    }

    #[test]
    fn test_token_is_lowercase_hex() {
        let token = create_generator().generate();
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_derivation_is_deterministic_for_fixed_inputs() {
        let generator = create_generator();
        let entropy = [7u8; ENTROPY_BYTES];

        assert_eq!(generator.derive(&entropy, 1700000000), generator.derive(&entropy, 1700000000));
        assert_ne!(generator.derive(&entropy, 1700000000), generator.derive(&entropy, 1700000001));
        assert_ne!(
            generator.derive(&[7u8; ENTROPY_BYTES], 1700000000),
            generator.derive(&[8u8; ENTROPY_BYTES], 1700000000)
        );
    }

    #[test]
    fn test_derivation_depends_on_secret() {
        let entropy = [7u8; ENTROPY_BYTES];
        let one = RefreshTokenGenerator::new(Algorithm::HS256, b"secret-1".to_vec());
        let two = RefreshTokenGenerator::new(Algorithm::HS256, b"secret-2".to_vec());

        assert_ne!(one.derive(&entropy, 1700000000), two.derive(&entropy, 1700000000));
    }
}
