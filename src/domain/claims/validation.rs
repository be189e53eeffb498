//! Temporal validation of a decoded claim set

use chrono::{DateTime, Utc};

use super::entity::ClaimSet;
use crate::domain::error::TokenError;

/// Check `exp` and `nbf` against the supplied instant.
///
/// A claim set without `exp` never expires; without `nbf` it is valid
/// immediately. `exp == now` is still accepted: a token expires strictly
/// after its expiration second has passed.
pub fn validate_timestamps(claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), TokenError> {
    let now = now.timestamp();

    if let Some(expired_at) = claims.expires_at().filter(|exp| *exp < now) {
        return Err(TokenError::TokenExpired { expired_at });
    }

    if let Some(not_before) = claims.not_before().filter(|nbf| *nbf > now) {
        return Err(TokenError::TokenNotYetValid { not_before });
    }

    Ok(())
}
