//! Error taxonomy for the upload → analysis flow.
//!
//! Two families:
//!   - `ValidationError`: local checks on the selected file. Reported
//!     immediately; the session never leaves Idle and no request is sent.
//!   - `AnalysisError`: anything that goes wrong around the remote call.
//!     The detail is logged; the user only sees `user_message()`.

use thiserror::Error;

/// Shown for every analysis failure except a missing credential.
pub const ANALYSIS_UNAVAILABLE_MESSAGE: &str =
    "Could not reach the analysis service. Please check your connection and try again.";

/// Shown when no API key was found at startup.
pub const ANALYSIS_DISABLED_MESSAGE: &str =
    "Analysis is disabled: no Gemini API key is configured. Set GEMINI_API_KEY and restart.";

/// Rejection of a selected file before any network I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please choose a valid image file (got {mime_type}).")]
    UnsupportedType { mime_type: String },

    #[error("The file is too large ({size_bytes} bytes). Maximum size is 10 MB.")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Could not read the selected file: {0}")]
    Unreadable(String),
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Failure of a single classify exchange.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("empty response from model")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("response violates schema: {0}")]
    SchemaViolation(String),
}

impl AnalysisError {
    /// Message safe to put in front of the user. Never echoes raw detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::MissingCredential => ANALYSIS_DISABLED_MESSAGE,
            _ => ANALYSIS_UNAVAILABLE_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::Timeout
        } else if err.is_decode() {
            AnalysisError::MalformedResponse(err.to_string())
        } else {
            AnalysisError::Network(err.to_string())
        }
    }
}
