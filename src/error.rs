//! Client error taxonomy
//!
//! Every failure degrades to a message confined to the view that triggered
//! it; nothing here is fatal to the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A call needed a session token and none is stored.
    #[error("You need to log in again.")]
    AuthRequired,

    /// Non-success HTTP response. `message` is the backend's `detail` field
    /// when the body parsed, otherwise a per-operation fallback.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Client-side field checks failed before any network call.
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this failure resolves by sending the user back to login.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired) || matches!(self, Self::Api { status: 401, .. })
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = Vec::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                match &err.message {
                    Some(msg) => parts.push(msg.to_string()),
                    None => parts.push(format!("{field} is invalid")),
                }
            }
        }
        parts.sort();
        Self::Validation(parts.join("; "))
    }
}
