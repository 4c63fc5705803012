use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::{
    error::DispatchError,
    models::oauth::{AccessToken, JWT_BEARER_GRANT_TYPE, TokenResponse},
};

pub struct OAuthClient {
    http_client: Client,
    token_url: String,
}

impl OAuthClient {
    pub fn new(http_client: Client, token_url: impl Into<String>) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
        }
    }

    /// Trades a signed assertion for a bearer token. Single attempt.
    pub async fn exchange(&self, assertion: &str) -> Result<AccessToken, DispatchError> {
        debug!(token_url = %self.token_url, "Exchanging assertion for access token");

        let params = [("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion)];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DispatchError::TokenExchange(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError::TokenExchange(e.to_string()))?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Token endpoint rejected assertion");
            return Err(DispatchError::TokenExchange(body));
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            DispatchError::TokenExchange(format!("Unreadable token response ({}): {}", e, body))
        })?;

        let access_token = token_response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                DispatchError::TokenExchange(format!("Response missing access_token: {}", body))
            })?;

        info!(
            expires_in = token_response.expires_in,
            "Access token obtained"
        );

        Ok(AccessToken::new(access_token))
    }
}
