use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tracing::{info, warn};

use crate::{
    clients::{
        assertion::build_assertion, fcm::FcmClient, oauth::OAuthClient,
        recipients::RecipientStore,
    },
    config::Config,
    error::DispatchError,
    models::{
        request::NotificationRequest,
        response::{DispatchSummary, SendPushResponse},
    },
};

pub fn build_http_client(config: &Config) -> Result<Client, DispatchError> {
    Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .build()
        .map_err(|e| DispatchError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Runs one invocation end to end: recipients, assertion, token exchange,
/// fan-out, aggregation. Each stage completes before the next starts.
pub async fn process_send_request(
    config: &Config,
    request: &NotificationRequest,
) -> Result<SendPushResponse, DispatchError> {
    let http_client = build_http_client(config)?;

    let store = RecipientStore::from_config(config, http_client.clone())?;
    let tokens = store.fetch_tokens().await?;

    if tokens.is_empty() {
        info!("No recipient tokens, skipping dispatch");
        return Ok(SendPushResponse::no_recipients());
    }

    let assertion = build_assertion(&config.service_credential(), Utc::now().timestamp())?;

    let oauth_client = OAuthClient::new(http_client.clone(), config.oauth_token_url.clone());
    let access_token = oauth_client.exchange(&assertion).await?;

    let fcm_client = FcmClient::new(config, http_client);
    let outcomes = fcm_client.dispatch(&access_token, request, tokens).await;

    let summary = DispatchSummary::from_outcomes(outcomes);

    if summary.failed > 0 {
        warn!(
            sent = summary.sent,
            failed = summary.failed,
            "Dispatch finished with failures"
        );
    } else {
        info!(sent = summary.sent, "Dispatch finished");
    }

    Ok(SendPushResponse::dispatched(summary))
}
