//! Mini Program code (CreateMiniCode) image generation

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::QqContext;
use crate::error::QqError;

/// Substring whose presence in a body marks it as an error payload
const ERROR_MARKER: &str = "errmsg";

#[derive(Debug, Clone, Serialize)]
struct CreateMiniCodeRequest<'a> {
    access_token: &'a str,
    path: &'a str,
    appid: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errcode: i32,
    errmsg: String,
}

/// QQ Mini Program code API
pub struct QrcodeApi {
    context: Arc<QqContext>,
}

impl QrcodeApi {
    pub fn new(context: Arc<QqContext>) -> Self {
        Self { context }
    }

    /// Generate a Mini Program code that opens `path`.
    ///
    /// POST /api/json/qqa/CreateMiniCode
    ///
    /// Returns the image bytes. An empty `path` is rejected before any
    /// request, including the token fetch.
    pub async fn create_mini_code(&self, path: &str) -> Result<Vec<u8>, QqError> {
        if path.is_empty() {
            return Err(QqError::InvalidArgument("path is empty".to_string()));
        }

        let access_token = self.context.token_manager.get_token().await?;
        let body = CreateMiniCodeRequest {
            access_token: &access_token,
            path,
            appid: self.context.client.appid(),
        };

        let raw = self
            .context
            .client
            .post_with_token("/api/json/qqa/CreateMiniCode", &access_token, &body)
            .await?;
        into_image(raw)
    }
}

/// The reply is an image unless its text contains the `errmsg` marker.
/// The content type is not consulted.
fn into_image(body: Vec<u8>) -> Result<Vec<u8>, QqError> {
    if !String::from_utf8_lossy(&body).contains(ERROR_MARKER) {
        return Ok(body);
    }

    match serde_json::from_slice::<ErrorResponse>(&body) {
        Ok(error) => {
            log::warn!(
                "[QqMp] CreateMiniCode failed {}: {}",
                error.errcode,
                error.errmsg
            );
            Err(QqError::Api {
                code: error.errcode,
                message: error.errmsg,
            })
        }
        Err(e) => Err(QqError::MalformedResponse(format!(
            "mini code response is neither an image nor an error body: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_image_passes_through() {
        let bytes = into_image(PNG_HEADER.to_vec()).unwrap();
        assert_eq!(bytes, PNG_HEADER);
    }

    #[test]
    fn test_json_like_bytes_without_marker_are_an_image() {
        let body = br#"{"errcode":0}"#.to_vec();
        assert_eq!(into_image(body.clone()).unwrap(), body);
    }

    #[test]
    fn test_error_body() {
        let body = br#"{"errcode":40001,"errmsg":"invalid access_token"}"#;
        let err = into_image(body.to_vec()).unwrap_err();
        match err {
            QqError::Api { code, message } => {
                assert_eq!(code, 40001);
                assert_eq!(message, "invalid access_token");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_body_without_errcode() {
        let body = br#"{"errmsg":"path not found"}"#;
        let err = into_image(body.to_vec()).unwrap_err();
        assert!(matches!(err, QqError::Api { code: 0, ref message } if message == "path not found"));
    }

    #[test]
    fn test_marker_in_unparseable_body() {
        let err = into_image(b"\x00errmsg\xff".to_vec()).unwrap_err();
        assert!(matches!(err, QqError::MalformedResponse(_)));
    }
}
