use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use crate::{
    error::DispatchError,
    models::oauth::{AssertionClaims, ServiceCredential},
};

/// Builds the signed `header.claims.signature` assertion presented to the
/// token endpoint. RS256 is RSASSA-PKCS1-v1_5 over SHA-256, so the result is
/// fully determined by the credential and `issued_at`.
pub fn build_assertion(
    credential: &ServiceCredential,
    issued_at: i64,
) -> Result<String, DispatchError> {
    let encoding_key = EncodingKey::from_rsa_pem(credential.private_key_pem.as_bytes())
        .map_err(|e| DispatchError::Credential(format!("Failed to parse private key: {}", e)))?;

    let claims = AssertionClaims::new(credential, issued_at);

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| DispatchError::Credential(format!("Failed to sign assertion: {}", e)))
}
