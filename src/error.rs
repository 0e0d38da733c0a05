use std::sync::Arc;

use thiserror::Error;

/// Transport-level failures
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Reqwest(Arc<reqwest::Error>),

    #[error("response decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        HttpError::Reqwest(Arc::new(e))
    }
}

/// QQ SDK error types
#[derive(Debug, Error)]
pub enum QqError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("QQ API error (code={code}): {message}")]
    Api { code: i32, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for QqError {
    fn from(e: reqwest::Error) -> Self {
        QqError::Http(HttpError::from(e))
    }
}

impl QqError {
    /// Turn a provider `errcode` into a `Result`.
    ///
    /// `Some(0)` is success and any other code becomes [`QqError::Api`].
    /// A body without an `errcode` is not trusted as a success and becomes
    /// [`QqError::MalformedResponse`].
    pub fn check_api(code: Option<i32>, message: &str) -> Result<(), QqError> {
        match code {
            Some(0) => Ok(()),
            Some(code) => {
                log::warn!("[QqMp] API error {}: {}", code, message);
                Err(QqError::Api {
                    code,
                    message: message.to_string(),
                })
            }
            None => Err(QqError::MalformedResponse(format!(
                "response has no errcode (errmsg: {message:?})"
            ))),
        }
    }
}
