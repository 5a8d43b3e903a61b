use thiserror::Error;

/// Failure of a single remote call. Scoped to one fetch cycle; never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}{}", detail_suffix(.detail))]
    Server { status: u16, detail: Option<String> },
    #[error("malformed response body: {0}")]
    Body(String),
    #[error("record has no id")]
    MissingId,
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::MissingId)
    }

    /// Text shown next to the table while the last good page stays visible.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => {
                "Server unreachable; check your connection and retry.".to_string()
            }
            FetchError::Server { status, detail } => match detail {
                Some(detail) => format!("Request failed (status {status}): {detail}. Retry later."),
                None => format!("Request failed (status {status}). Retry later."),
            },
            FetchError::Body(_) => {
                "Server returned an unreadable response; retry later.".to_string()
            }
            FetchError::MissingId => "Record has no identifier.".to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::Server {
                status: status.as_u16(),
                detail: None,
            };
        }
        if err.is_decode() {
            return FetchError::Body(err.to_string());
        }
        FetchError::Network(err.to_string())
    }
}
