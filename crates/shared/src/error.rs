use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the Document Service attaches to rejected requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ServiceErrorBody {
    /// Extracts the service message from a raw response body, falling back to the
    /// trimmed body text when it is not the expected JSON shape.
    pub fn message_from(raw: &str) -> Option<String> {
        if let Ok(body) = serde_json::from_str::<ServiceErrorBody>(raw) {
            if let Some(message) = body.error.filter(|m| !m.trim().is_empty()) {
                return Some(message);
            }
        }
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_error_field_over_raw_body() {
        assert_eq!(
            ServiceErrorBody::message_from(r#"{"error": "Invalid action"}"#).as_deref(),
            Some("Invalid action")
        );
        assert_eq!(
            ServiceErrorBody::message_from("  upstream exploded \n").as_deref(),
            Some("upstream exploded")
        );
        assert_eq!(ServiceErrorBody::message_from("   "), None);
    }
}
