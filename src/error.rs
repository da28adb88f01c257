use thiserror::Error;

/// Failures surfaced by query construction and retrieval.
#[derive(Debug, Error)]
pub enum ArxivError {
    /// The envelope is not well-formed XML, or lacks the metadata retrieval needs.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The service answered with a well-formed error envelope.
    #[error("arXiv reported an error: {message}")]
    ServiceReported { message: String },

    /// Non-success response without a recognizable error envelope, or no response at all.
    #[error("transport failure{}: {detail}", status_suffix(.status))]
    Transport { status: Option<u16>, detail: String },

    #[error("invalid query: {0}")]
    InvalidQuerySpec(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArxivError {
    pub fn is_service_reported(&self) -> bool {
        matches!(self, ArxivError::ServiceReported { .. })
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {})", s)).unwrap_or_default()
}

impl From<quick_xml::Error> for ArxivError {
    fn from(err: quick_xml::Error) -> Self {
        ArxivError::MalformedResponse(err.to_string())
    }
}

impl From<reqwest::Error> for ArxivError {
    fn from(err: reqwest::Error) -> Self {
        ArxivError::Transport {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArxivError>;
