//! tokenmint
//!
//! Compact, signed bearer tokens with symmetric keyed-hash integrity:
//! - Access token issuance: claim set to `header.payload.signature` wire form
//! - Validation: constant-time signature check, then `exp`/`nbf`
//! - Opaque refresh token generation from CSPRNG entropy
//!
//! The verifying algorithm always comes from trusted configuration, never
//! from a presented token's header.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, TokenConfig, TokenConfigError};
pub use domain::claims::{ClaimSet, ClaimValue, RESERVED_CLAIMS};
pub use domain::error::TokenError;
pub use domain::token::{Header, TokenParts};
pub use infrastructure::signer::{Algorithm, HmacSigner};
pub use infrastructure::token::{RefreshTokenGenerator, TokenService};
