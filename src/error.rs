use thiserror::Error;

/// Faults that abort a whole invocation.
///
/// Per-recipient delivery failures are not represented here; they are
/// recorded as [`DeliveryOutcome`](crate::models::response::DeliveryOutcome)s.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("Recipient store unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("OAuth token fetch failed: {0}")]
    TokenExchange(String),
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Configuration(_) => "configuration",
            DispatchError::InvalidRequest(_) => "invalid_request",
            DispatchError::SourceUnavailable(_) => "source_unavailable",
            DispatchError::Credential(_) => "credential",
            DispatchError::TokenExchange(_) => "token_exchange",
        }
    }
}
