use thiserror::Error;

/// Errors surfaced while handling presented or outgoing tokens.
///
/// Every variant is recoverable and returned to the caller; nothing here
/// aborts the process. Misconfiguration is caught earlier, at service
/// construction (see `TokenConfigError`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    #[error("Malformed token: expected three non-empty dot-separated segments")]
    MalformedToken,

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired at {expired_at}")]
    TokenExpired { expired_at: i64 },

    #[error("Token not valid before {not_before}")]
    TokenNotYetValid { not_before: i64 },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl TokenError {
    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_payload_message() {
        let error = TokenError::malformed_payload("not a JSON object");
        assert_eq!(error.to_string(), "Malformed payload: not a JSON object");
    }

    #[test]
    fn test_expired_message_carries_timestamp() {
        let error = TokenError::TokenExpired {
            expired_at: 1700000000,
        };
        assert_eq!(error.to_string(), "Token expired at 1700000000");
    }

    #[test]
    fn test_malformed_token_message() {
        assert_eq!(
            TokenError::MalformedToken.to_string(),
            "Malformed token: expected three non-empty dot-separated segments"
        );
    }
}
