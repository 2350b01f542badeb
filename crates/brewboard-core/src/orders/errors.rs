use crate::errors::BrewError;

/// Why a fetch of the orders resource produced no data.
///
/// An empty but well-formed result is not an error; sources return
/// `Ok(vec![])` for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Request to '{url}' failed: {message}")]
    Network { url: String, message: String },

    #[error("Fetch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("'{url}' responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed orders payload: {message}")]
    Parse { message: String },

    #[error("Failed to read orders from '{path}': {message}")]
    Io { path: String, message: String },
}

impl BrewError for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "FETCH_NETWORK_ERROR",
            FetchError::Timeout { .. } => "FETCH_TIMEOUT",
            FetchError::HttpStatus { .. } => "FETCH_HTTP_STATUS",
            FetchError::Parse { .. } => "FETCH_PARSE_ERROR",
            FetchError::Io { .. } => "FETCH_IO_ERROR",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse {
            message: e.to_string(),
        }
    }
}
