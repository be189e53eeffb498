use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub token: TokenConfig,
}

/// Token issuance and validation configuration
#[derive(Clone, Deserialize)]
pub struct TokenConfig {
    /// Keyed-hash algorithm identifier ("HS256"/"sha256" or "HS512"/"sha512")
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Header `typ` value
    #[serde(rename = "type", default = "default_token_type")]
    pub token_type: String,

    /// HMAC key material; never logged or printed
    #[serde(default)]
    pub secret: String,

    /// Expected encoded-signature length for fast rejection, when set
    #[serde(default)]
    pub signature_length: Option<usize>,

    /// Default token lifetime in seconds
    #[serde(default = "default_lifetime")]
    pub lifetime: i64,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("algorithm", &self.algorithm)
            .field("token_type", &self.token_type)
            .field("secret", &"[hidden]")
            .field("signature_length", &self.signature_length)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            token_type: default_token_type(),
            secret: String::new(),
            signature_length: None,
            lifetime: default_lifetime(),
        }
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_token_type() -> String {
    "JWT".to_string()
}

fn default_lifetime() -> i64 {
    3600
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// Errors raised when the token configuration cannot produce a working
/// service. These fail fast at construction; they are never surfaced
/// per-validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenConfigError {
    #[error("Token secret is not configured")]
    MissingSecret,

    #[error("Unsupported algorithm '{name}': use HS256/sha256 or HS512/sha512")]
    UnsupportedAlgorithm { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_config() {
        let config = TokenConfig::default();

        assert_eq!(config.algorithm, "HS256");
        assert_eq!(config.token_type, "JWT");
        assert!(config.secret.is_empty());
        assert_eq!(config.signature_length, None);
        assert_eq!(config.lifetime, 3600);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = TokenConfig {
            secret: "s3cr3t".to_string(),
            ..TokenConfig::default()
        };
        let debug = format!("{config:?}");

        assert!(debug.contains("[hidden]"));
        assert!(!debug.contains("s3cr3t"));
    }

    #[test]
    fn test_deserialize_with_type_alias() {
        let config: TokenConfig = serde_json::from_str(
            r#"{"algorithm":"sha256","type":"JWT","secret":"s3cr3t","signature_length":43,"lifetime":360}"#,
        )
        .unwrap();

        assert_eq!(config.algorithm, "sha256");
        assert_eq!(config.token_type, "JWT");
        assert_eq!(config.secret, "s3cr3t");
        assert_eq!(config.signature_length, Some(43));
        assert_eq!(config.lifetime, 360);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: TokenConfig = serde_json::from_str(r#"{"secret":"k"}"#).unwrap();

        assert_eq!(config.algorithm, "HS256");
        assert_eq!(config.token_type, "JWT");
        assert_eq!(config.lifetime, 3600);
    }

    #[test]
    fn test_unsupported_algorithm_message() {
        let error = TokenConfigError::UnsupportedAlgorithm {
            name: "none".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported algorithm 'none': use HS256/sha256 or HS512/sha512"
        );
    }
}
