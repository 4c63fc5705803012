use std::fmt;

use serde::{Deserialize, Serialize};

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertions are valid for one hour after issue.
pub const ASSERTION_LIFETIME_SECONDS: i64 = 3600;

#[derive(Clone)]
pub struct ServiceCredential {
    pub issuer: String,
    pub private_key_pem: String,
    pub audience: String,
    pub scope: String,
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredential")
            .field("issuer", &self.issuer)
            .field("private_key_pem", &"<redacted>")
            .field("audience", &self.audience)
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(credential: &ServiceCredential, issued_at: i64) -> Self {
        Self {
            iss: credential.issuer.clone(),
            scope: credential.scope.clone(),
            aud: credential.audience.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
