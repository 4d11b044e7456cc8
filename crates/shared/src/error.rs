use serde::{Deserialize, Serialize};

/// Failure body returned by the advice service on any non-success status.
///
/// `detail` is a plain string for handled errors, but request validation
/// failures carry a structured list instead, so it is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: serde_json::Value::String(detail.into()),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.detail.as_str().filter(|detail| !detail.trim().is_empty())
    }
}
