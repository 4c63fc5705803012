use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FcmRequest {
    pub message: FcmMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FcmMessage {
    pub token: String,
    pub notification: FcmNotification,
    pub data: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FcmNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}
