use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::{error::DispatchError, models::fcm::FcmNotification};

/// Inbound body of a send request. Every field is optional; nothing is
/// validated before use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationRequest {
    #[serde(default)]
    pub title: Option<Value>,

    #[serde(default)]
    pub body: Option<Value>,

    #[serde(default, rename = "discountId")]
    pub discount_id: Option<Value>,
}

impl NotificationRequest {
    pub fn parse(raw: &[u8]) -> Result<Self, DispatchError> {
        serde_json::from_slice(raw).map_err(|e| DispatchError::InvalidRequest(e.to_string()))
    }

    pub fn notification(&self) -> FcmNotification {
        FcmNotification {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }

    /// Data payload for every message: `discountId` when it carries a usable
    /// value, empty otherwise.
    pub fn data(&self) -> HashMap<String, String> {
        let mut data = HashMap::new();

        let discount = match &self.discount_id {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(other) => Some(display_value(other)),
        };

        if let Some(discount) = discount {
            data.insert("discountId".to_string(), discount);
        }

        data
    }
}

/// Renders a value the way clients expect to read it back from `data`:
/// arrays join their elements with commas, objects collapse to
/// `[object Object]`, whole floats drop their fraction.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
                format!("{:.0}", f)
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
