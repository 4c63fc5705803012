use serde::Serialize;
use serde_json::Value;

/// Status recorded when a send never produced an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

pub const NO_RECIPIENTS_INFO: &str = "no FCM tokens to send";

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryOutcome {
    pub token: String,
    pub status: u16,
    pub response: Value,
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub results: Vec<DeliveryOutcome>,
}

impl DispatchSummary {
    pub fn from_outcomes(results: Vec<DeliveryOutcome>) -> Self {
        let sent = results.iter().filter(|outcome| outcome.is_sent()).count();
        let failed = results.len() - sent;

        Self {
            sent,
            failed,
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SendPushResponse {
    NoRecipients {
        success: bool,
        info: String,
    },
    Dispatched {
        success: bool,
        #[serde(flatten)]
        summary: DispatchSummary,
    },
}

impl SendPushResponse {
    pub fn no_recipients() -> Self {
        SendPushResponse::NoRecipients {
            success: true,
            info: NO_RECIPIENTS_INFO.to_string(),
        }
    }

    pub fn dispatched(summary: DispatchSummary) -> Self {
        SendPushResponse::Dispatched {
            success: true,
            summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
