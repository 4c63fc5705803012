use futures_util::{StreamExt, stream};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    models::{
        fcm::{FcmMessage, FcmRequest},
        oauth::AccessToken,
        request::NotificationRequest,
        response::{DeliveryOutcome, TRANSPORT_FAILURE_STATUS},
    },
};

pub struct FcmClient {
    http_client: Client,
    send_url: String,
    concurrency: usize,
}

impl FcmClient {
    pub fn new(config: &Config, http_client: Client) -> Self {
        debug!(project_id = %config.fcm_project_id, "FCM client initialized");

        Self {
            http_client,
            send_url: config.fcm_send_url(),
            concurrency: config.dispatch_concurrency(),
        }
    }

    /// Sends one message per token and returns one outcome per token, in
    /// completion order. A failure for one token never affects the others.
    pub async fn dispatch(
        &self,
        access_token: &AccessToken,
        request: &NotificationRequest,
        tokens: Vec<String>,
    ) -> Vec<DeliveryOutcome> {
        info!(
            recipients = tokens.len(),
            concurrency = self.concurrency,
            "Dispatching push notifications"
        );

        stream::iter(tokens)
            .map(|token| {
                let message = FcmRequest {
                    message: FcmMessage {
                        token: token.clone(),
                        notification: request.notification(),
                        data: request.data(),
                    },
                };
                self.send_one(access_token, token, message)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    async fn send_one(
        &self,
        access_token: &AccessToken,
        token: String,
        message: FcmRequest,
    ) -> DeliveryOutcome {
        let response = match self
            .http_client
            .post(&self.send_url)
            .bearer_auth(access_token.as_str())
            .json(&message)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(token = %token_prefix(&token), error = %e, "FCM request could not be sent");
                return DeliveryOutcome {
                    token,
                    status: TRANSPORT_FAILURE_STATUS,
                    response: Value::String(e.to_string()),
                };
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => parse_body(text),
            Err(e) => Value::String(e.to_string()),
        };

        if status == 200 {
            debug!(token = %token_prefix(&token), "FCM push notification sent");
        } else {
            warn!(token = %token_prefix(&token), status, "FCM rejected push notification");
        }

        DeliveryOutcome {
            token,
            status,
            response: body,
        }
    }
}

/// JSON when the provider sent JSON, the raw text otherwise.
fn parse_body(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn token_prefix(token: &str) -> &str {
    let end = token
        .char_indices()
        .nth(12)
        .map(|(index, _)| index)
        .unwrap_or(token.len());
    &token[..end]
}
