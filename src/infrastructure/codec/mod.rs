//! Wire codec
//!
//! Canonical JSON serialization of header and claim-set objects, wrapped in
//! padding-free URL-safe base64. Encoding is pure and deterministic for a
//! given input; decoding reports any failure as a malformed payload.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::domain::claims::ClaimSet;
use crate::domain::error::TokenError;
use crate::domain::token::Header;

/// Encode bytes as URL-safe base64 without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode padding-free URL-safe base64.
pub fn base64url_decode(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(encoded)
}

/// Serialize and encode a token header.
pub fn encode_header(header: &Header) -> Result<String, TokenError> {
    let bytes = serde_json::to_vec(header)
        .map_err(|e| TokenError::serialization(format!("Failed to serialize header: {e}")))?;
    Ok(base64url_encode(&bytes))
}

/// Serialize and encode a claim set.
pub fn encode_claims(claims: &ClaimSet) -> Result<String, TokenError> {
    let bytes = serde_json::to_vec(claims)
        .map_err(|e| TokenError::serialization(format!("Failed to serialize claims: {e}")))?;
    Ok(base64url_encode(&bytes))
}

/// Decode a payload segment back into a claim set.
///
/// Fails with `MalformedPayload` when the segment is not valid base64url or
/// the decoded bytes are not a claims object with supported value types.
pub fn decode_claims(encoded: &str) -> Result<ClaimSet, TokenError> {
    let bytes = base64url_decode(encoded)
        .map_err(|e| TokenError::malformed_payload(format!("Invalid base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::malformed_payload(format!("Invalid claims object: {e}")))
}
