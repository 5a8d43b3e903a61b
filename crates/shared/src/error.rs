use serde::{Deserialize, Serialize};

/// Error body returned by the listings API on non-2xx responses. Both shapes
/// (`{"detail": ...}` and `{"message": ...}`) occur in practice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn into_text(self) -> Option<String> {
        self.detail
            .or(self.message)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
