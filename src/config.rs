use std::fmt;

use dotenvy::dotenv;
use serde::Deserialize;

use crate::{error::DispatchError, models::oauth::ServiceCredential};

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_FCM_API_BASE_URL: &str = "https://fcm.googleapis.com";
pub const DEFAULT_FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

#[derive(Clone, Deserialize)]
pub struct Config {
    pub fcm_project_id: String,
    pub fcm_sa_client_email: String,
    pub fcm_sa_private_key: String,

    pub supabase_url: String,
    pub supabase_service_role_key: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_token_url")]
    pub oauth_token_url: String,
    #[serde(default = "default_fcm_api_base_url")]
    pub fcm_api_base_url: String,
    #[serde(default = "default_fcm_scope")]
    pub fcm_scope: String,

    #[serde(default = "default_recipient_table")]
    pub recipient_table: String,
    #[serde(default = "default_recipient_column")]
    pub recipient_column: String,

    #[serde(default = "default_dispatch_concurrency")]
    pub dispatch_concurrency: usize,
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("fcm_project_id", &self.fcm_project_id)
            .field("fcm_sa_client_email", &self.fcm_sa_client_email)
            .field("fcm_sa_private_key", &"<redacted>")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_service_role_key", &"<redacted>")
            .field("server_port", &self.server_port)
            .field("oauth_token_url", &self.oauth_token_url)
            .field("fcm_api_base_url", &self.fcm_api_base_url)
            .field("fcm_scope", &self.fcm_scope)
            .field("recipient_table", &self.recipient_table)
            .field("recipient_column", &self.recipient_column)
            .field("dispatch_concurrency", &self.dispatch_concurrency)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}

fn default_server_port() -> u16 {
    8080
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_fcm_api_base_url() -> String {
    DEFAULT_FCM_API_BASE_URL.to_string()
}

fn default_fcm_scope() -> String {
    DEFAULT_FCM_SCOPE.to_string()
}

fn default_recipient_table() -> String {
    "user_tokens".to_string()
}

fn default_recipient_column() -> String {
    "fcm_token".to_string()
}

fn default_dispatch_concurrency() -> usize {
    8
}

fn default_http_timeout_seconds() -> u64 {
    30
}

impl Config {
    pub fn load() -> Result<Self, DispatchError> {
        dotenv().ok();

        let config = envy::from_env::<Self>().map_err(|e| {
            DispatchError::Configuration(format!("Invalid or missing environmental variable: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        let required = [
            ("FCM_PROJECT_ID", &self.fcm_project_id),
            ("FCM_SA_CLIENT_EMAIL", &self.fcm_sa_client_email),
            ("FCM_SA_PRIVATE_KEY", &self.fcm_sa_private_key),
            ("SUPABASE_URL", &self.supabase_url),
            ("SUPABASE_SERVICE_ROLE_KEY", &self.supabase_service_role_key),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DispatchError::Configuration(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn service_credential(&self) -> ServiceCredential {
        ServiceCredential {
            issuer: self.fcm_sa_client_email.clone(),
            private_key_pem: self.fcm_sa_private_key.replace("\\n", "\n"),
            audience: self.oauth_token_url.clone(),
            scope: self.fcm_scope.clone(),
        }
    }

    pub fn fcm_send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.fcm_api_base_url.trim_end_matches('/'),
            self.fcm_project_id
        )
    }

    pub fn dispatch_concurrency(&self) -> usize {
        self.dispatch_concurrency.max(1)
    }
}

/// Where each invocation gets its configuration from.
#[derive(Clone, Debug)]
pub enum ConfigSource {
    Environment,
    Fixed(Box<Config>),
}

impl ConfigSource {
    pub fn resolve(&self) -> Result<Config, DispatchError> {
        match self {
            ConfigSource::Environment => Config::load(),
            ConfigSource::Fixed(config) => {
                config.validate()?;
                Ok(config.as_ref().clone())
            }
        }
    }
}
