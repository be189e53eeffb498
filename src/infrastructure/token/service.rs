//! Access token issuance and validation

use chrono::{DateTime, Utc};
use tracing::debug;

use super::refresh::RefreshTokenGenerator;
use crate::config::{TokenConfig, TokenConfigError};
use crate::domain::claims::{ClaimSet, validate_timestamps};
use crate::domain::error::TokenError;
use crate::domain::token::{Header, TokenParts};
use crate::infrastructure::codec;
use crate::infrastructure::signer::{Algorithm, HmacSigner};

/// Issues and validates signed bearer tokens.
///
/// Holds only configuration-derived state (header, lifetime, signer);
/// everything parsed from a presented token lives in per-call locals, so a
/// shared service instance is reentrant and safe across threads.
pub struct TokenService {
    header: Header,
    lifetime: i64,
    signature_length: Option<usize>,
    signer: HmacSigner,
    refresh: RefreshTokenGenerator,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("header", &self.header)
            .field("lifetime", &self.lifetime)
            .field("signature_length", &self.signature_length)
            .field("signer", &self.signer)
            .finish()
    }
}

impl TokenService {
    /// Build a service from configuration.
    ///
    /// Fails fast on a missing secret or an unknown algorithm name so that
    /// misconfiguration never surfaces as a per-validation error.
    pub fn new(config: TokenConfig) -> Result<Self, TokenConfigError> {
        let algorithm = Algorithm::from_config_name(&config.algorithm).ok_or_else(|| {
            TokenConfigError::UnsupportedAlgorithm {
                name: config.algorithm.clone(),
            }
        })?;

        if config.secret.is_empty() {
            return Err(TokenConfigError::MissingSecret);
        }

        Ok(Self {
            header: Header::new(algorithm.header_value(), config.token_type),
            lifetime: config.lifetime,
            signature_length: config.signature_length,
            signer: HmacSigner::new(algorithm, config.secret.as_bytes()),
            refresh: RefreshTokenGenerator::new(algorithm, config.secret.as_bytes()),
        })
    }

    /// Issue an access token for the given claim set at the current time.
    pub fn issue_access_token(&self, claims: &ClaimSet) -> Result<String, TokenError> {
        self.issue_access_token_at(claims, Utc::now())
    }

    /// Issue an access token with an explicit issuance instant.
    ///
    /// When the claim set carries no `exp`, it is set to the issuance time
    /// (the claim set's `iat` if present, otherwise `issued_at`) plus the
    /// configured lifetime. With every time-based claim supplied by the
    /// caller this is a pure function of its inputs.
    pub fn issue_access_token_at(
        &self,
        claims: &ClaimSet,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = self.finalize_claims(claims, issued_at);

        let header = codec::encode_header(&self.header)?;
        let payload = codec::encode_claims(&claims)?;
        let signature = self.signer.sign(&format!("{header}.{payload}"));

        debug!(exp = ?claims.expires_at(), "issued access token");

        Ok(TokenParts::join(&header, &payload, &signature))
    }

    /// Issue an opaque refresh token.
    pub fn issue_refresh_token(&self) -> String {
        self.refresh.generate()
    }

    /// Validate a presented token against the current time.
    pub fn validate_token(&self, token: &str) -> Result<ClaimSet, TokenError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Validate a presented token against an explicit instant.
    ///
    /// Checks run in order and stop at the first failure: structure,
    /// optional signature-length fast path, constant-time signature
    /// comparison, then payload decode and `exp`/`nbf`. A token without
    /// `exp` never expires; confirm that posture fits the deployment before
    /// relying on it.
    pub fn validate_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, TokenError> {
        let parts = TokenParts::split(token)?;

        if let Some(expected) = self.signature_length {
            if parts.signature.len() != expected {
                debug!(
                    length = parts.signature.len(),
                    expected, "rejected token: unexpected signature length"
                );
                return Err(TokenError::InvalidSignature);
            }
        }

        if !self.signer.verify(&parts.signing_input(), parts.signature) {
            debug!("rejected token: signature mismatch");
            return Err(TokenError::InvalidSignature);
        }

        let claims = codec::decode_claims(parts.payload)?;
        validate_timestamps(&claims, now)?;

        Ok(claims)
    }

    /// Decode the payload segment without verifying anything.
    ///
    /// For inspection only: the result carries no integrity guarantee and
    /// must never feed a trust decision. Use [`TokenService::validate_token`]
    /// for that.
    pub fn decode_payload(&self, token: &str) -> Result<ClaimSet, TokenError> {
        let parts = TokenParts::split(token)?;
        codec::decode_claims(parts.payload)
    }

    fn finalize_claims(&self, claims: &ClaimSet, issued_at: DateTime<Utc>) -> ClaimSet {
        let mut claims = claims.clone();

        if claims.expires_at().is_none() {
            let reference = claims.issued_at().unwrap_or_else(|| issued_at.timestamp());
            claims = claims.with_expires_at(reference + self.lifetime);
        }

        claims
    }
}
