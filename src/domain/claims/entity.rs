//! Claim set entity and claim value model

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Claim names the issuer manages through typed fields.
///
/// Custom claims registered under one of these names are ignored: the typed
/// value always wins, so an issued payload never carries duplicate keys.
pub const RESERVED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// A single claim value: string, 64-bit integer, or array of strings.
///
/// Any other JSON type in a presented payload fails deserialization and is
/// reported as a malformed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    String(String),
    Integer(i64),
    StringArray(Vec<String>),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str_array(&self) -> Option<&[String]> {
        match self {
            Self::StringArray(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Vec<String>> for ClaimValue {
    fn from(values: Vec<String>) -> Self {
        Self::StringArray(values)
    }
}

/// The payload of an access token: reserved claims plus application claims.
///
/// Reserved claims serialize first, in fixed order; custom claims follow in
/// sorted key order. Both orders are stable, so encoding the same claim set
/// twice yields identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClaimSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<String>,

    /// Expiration time, Unix seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,

    /// Not-before time, Unix seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    nbf: Option<i64>,

    /// Issued-at time, Unix seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    jti: Option<String>,

    #[serde(flatten)]
    custom: BTreeMap<String, ClaimValue>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.sub = Some(subject.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.aud = Some(audience.into());
        self
    }

    pub fn with_expires_at(mut self, expires_at: i64) -> Self {
        self.exp = Some(expires_at);
        self
    }

    pub fn with_not_before(mut self, not_before: i64) -> Self {
        self.nbf = Some(not_before);
        self
    }

    pub fn with_issued_at(mut self, issued_at: i64) -> Self {
        self.iat = Some(issued_at);
        self
    }

    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.jti = Some(token_id.into());
        self
    }

    /// Register an application claim.
    ///
    /// Names in [`RESERVED_CLAIMS`] are ignored; reserved claims are set
    /// through their typed builders and take precedence on collision.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        let name = name.into();
        if !RESERVED_CLAIMS.contains(&name.as_str()) {
            self.custom.insert(name, value.into());
        }
        self
    }

    /// Register several application claims at once.
    pub fn with_claims(
        mut self,
        claims: impl IntoIterator<Item = (String, ClaimValue)>,
    ) -> Self {
        for (name, value) in claims {
            self = self.with_claim(name, value);
        }
        self
    }

    pub fn issuer(&self) -> Option<&str> {
        self.iss.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    pub fn audience(&self) -> Option<&str> {
        self.aud.as_deref()
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.exp
    }

    pub fn not_before(&self) -> Option<i64> {
        self.nbf
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.iat
    }

    pub fn token_id(&self) -> Option<&str> {
        self.jti.as_deref()
    }

    /// Look up an application claim by name.
    pub fn claim(&self, name: &str) -> Option<&ClaimValue> {
        self.custom.get(name)
    }

    /// All application claims, in serialization order.
    pub fn custom_claims(&self) -> &BTreeMap<String, ClaimValue> {
        &self.custom
    }

    /// Check against the wall clock. A claim set without `exp` never expires.
    pub fn is_expired(&self) -> bool {
        self.exp.is_some_and(|exp| exp < Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_reserved_fields() {
        let claims = ClaimSet::new()
            .with_issuer("issuer")
            .with_subject("user-42")
            .with_audience("api")
            .with_expires_at(2000)
            .with_not_before(500)
            .with_issued_at(1000)
            .with_token_id("id-1");

        assert_eq!(claims.issuer(), Some("issuer"));
        assert_eq!(claims.subject(), Some("user-42"));
        assert_eq!(claims.audience(), Some("api"));
        assert_eq!(claims.expires_at(), Some(2000));
        assert_eq!(claims.not_before(), Some(500));
        assert_eq!(claims.issued_at(), Some(1000));
        assert_eq!(claims.token_id(), Some("id-1"));
    }

    #[test]
    fn test_custom_claims_round_trip() {
        let claims = ClaimSet::new()
            .with_subject("42")
            .with_claim("client_id", 7)
            .with_claim("scopes", vec!["read".to_string(), "write".to_string()]);

        let json = serde_json::to_string(&claims).unwrap();
        let decoded: ClaimSet = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, claims);
        assert_eq!(decoded.claim("client_id").and_then(ClaimValue::as_i64), Some(7));
        assert_eq!(
            decoded.claim("scopes").and_then(ClaimValue::as_str_array),
            Some(&["read".to_string(), "write".to_string()][..])
        );
    }

    #[test]
    fn test_reserved_fields_serialize_before_custom_claims() {
        let claims = ClaimSet::new()
            .with_subject("42")
            .with_expires_at(1234)
            .with_claim("aaa", "first-alphabetically");

        let json = serde_json::to_string(&claims).unwrap();
        assert_eq!(json, r#"{"sub":"42","exp":1234,"aaa":"first-alphabetically"}"#);
    }

    #[test]
    fn test_with_claims_registers_in_bulk() {
        let claims = ClaimSet::new().with_claims(vec![
            ("client_id".to_string(), ClaimValue::Integer(1)),
            ("tenant".to_string(), ClaimValue::String("acme".to_string())),
            ("sub".to_string(), ClaimValue::String("shadowed".to_string())),
        ]);

        assert_eq!(claims.claim("client_id"), Some(&ClaimValue::Integer(1)));
        assert_eq!(claims.custom_claims().len(), 2);
        assert_eq!(claims.subject(), None);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let json = serde_json::to_string(&ClaimSet::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_custom_claim_under_reserved_name_is_ignored() {
        let claims = ClaimSet::new()
            .with_subject("real-subject")
            .with_claim("sub", "shadowed")
            .with_claim("exp", 1);

        assert_eq!(claims.subject(), Some("real-subject"));
        assert_eq!(claims.expires_at(), None);
        assert!(claims.claim("sub").is_none());
        assert!(claims.claim("exp").is_none());
    }

    #[test]
    fn test_unsupported_value_type_fails_to_decode() {
        assert!(serde_json::from_str::<ClaimSet>(r#"{"flag":true}"#).is_err());
        assert!(serde_json::from_str::<ClaimSet>(r#"{"ratio":1.5}"#).is_err());
        assert!(serde_json::from_str::<ClaimSet>(r#"{"nested":{"a":1}}"#).is_err());
    }

    #[test]
    fn test_non_integer_exp_fails_to_decode() {
        assert!(serde_json::from_str::<ClaimSet>(r#"{"exp":"soon"}"#).is_err());
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now().timestamp();
        assert!(ClaimSet::new().with_expires_at(now - 100).is_expired());
        assert!(!ClaimSet::new().with_expires_at(now + 100).is_expired());
        assert!(!ClaimSet::new().is_expired());
    }
}
