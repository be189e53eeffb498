//! Keyed-hash signing
//!
//! Computes and verifies the HMAC signature covering `header.payload`. The
//! algorithm is fixed at construction from trusted configuration; a
//! presented token's own `alg` header never selects the hash function.

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Supported keyed-hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    HS256,
    HS512,
}

impl Algorithm {
    /// Parse a configured algorithm name.
    ///
    /// Accepts the JWT identifiers (`HS256`, `HS512`) as well as the plain
    /// hash names (`sha256`, `sha512`), case-insensitively.
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hs256" | "sha256" | "sha-256" => Some(Self::HS256),
            "hs512" | "sha512" | "sha-512" => Some(Self::HS512),
            _ => None,
        }
    }

    /// The identifier written into the token header.
    pub fn header_value(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS512 => "HS512",
        }
    }

    /// Raw digest size in bytes.
    pub fn digest_length(&self) -> usize {
        match self {
            Self::HS256 => 32,
            Self::HS512 => 64,
        }
    }

    /// Length of a base64url-encoded signature segment.
    pub fn encoded_signature_length(&self) -> usize {
        match self {
            Self::HS256 => 43,
            Self::HS512 => 86,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_value())
    }
}

/// HMAC signer over a fixed algorithm and secret.
#[derive(Clone)]
pub struct HmacSigner {
    algorithm: Algorithm,
    secret: Vec<u8>,
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("algorithm", &self.algorithm)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl HmacSigner {
    pub fn new(algorithm: Algorithm, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            secret: secret.into(),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Sign the input and encode the raw digest bytes as base64url.
    ///
    /// Pure function of (input, secret, algorithm): no randomness, no clock.
    pub fn sign(&self, signing_input: &str) -> String {
        URL_SAFE_NO_PAD.encode(self.raw_digest(signing_input))
    }

    /// Sign the input and return the digest as lowercase hex.
    pub fn sign_hex(&self, signing_input: &str) -> String {
        hex::encode(self.raw_digest(signing_input))
    }

    /// Recompute the signature and compare it to the presented one in
    /// constant time.
    pub fn verify(&self, signing_input: &str, presented: &str) -> bool {
        constant_time_eq(&self.sign(signing_input), presented)
    }

    fn raw_digest(&self, signing_input: &str) -> Vec<u8> {
        match self.algorithm {
            Algorithm::HS256 => {
                let mut mac = HmacSha256::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(signing_input.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
            Algorithm::HS512 => {
                let mut mac = HmacSha512::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(signing_input.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;

    for i in 0..a_bytes.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}
