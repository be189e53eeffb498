//! Token wire-format entities

use serde::{Deserialize, Serialize};

use crate::domain::error::TokenError;

/// Token header: algorithm identifier and token type.
///
/// Derived entirely from configuration at service construction and immutable
/// afterwards. Field order is the serialization order. The `alg` value in a
/// presented token is informational only and never drives verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    alg: String,
    typ: String,
}

impl Header {
    pub fn new(alg: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            typ: typ.into(),
        }
    }

    pub fn alg(&self) -> &str {
        &self.alg
    }

    pub fn typ(&self) -> &str {
        &self.typ
    }
}

/// The three segments of a presented token, borrowed from the input.
///
/// Built per validation call and dropped with it, so concurrent validations
/// never share parse state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> TokenParts<'a> {
    /// Split a token into its three segments.
    ///
    /// Anything other than exactly three non-empty dot-separated segments is
    /// a malformed token.
    pub fn split(token: &'a str) -> Result<Self, TokenError> {
        let mut segments = token.split('.');

        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(header), Some(payload), Some(signature), None)
                if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
            {
                Ok(Self {
                    header,
                    payload,
                    signature,
                })
            }
            _ => Err(TokenError::MalformedToken),
        }
    }

    /// The byte sequence the signature covers: `header.payload`.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }

    /// Assemble the wire form from its three encoded segments.
    pub fn join(header: &str, payload: &str, signature: &str) -> String {
        format!("{header}.{payload}.{signature}")
    }
}
