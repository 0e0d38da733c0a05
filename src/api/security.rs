//! Security API
//!
//! Text content moderation.
//!
//! # Endpoints
//!
//! - [`SecurityApi::msg_sec_check`] - Check text content for policy violations

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::QqContext;
use crate::client::decode_json;
use crate::error::QqError;

const CONTENT_OK: &str = "content ok";
const CONTENT_VIOLATION: &str = "content violates policy: ";

#[derive(Debug, Clone, Serialize)]
struct MsgSecCheckRequest<'a> {
    access_token: &'a str,
    content: &'a str,
    appid: &'a str,
}

/// Raw response from MsgSecCheck.
///
/// This endpoint spells its fields `errCode` / `errMsg`.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MsgSecCheckResponse {
    #[serde(rename = "errCode", default)]
    pub err_code: Option<i32>,
    #[serde(rename = "errMsg", default)]
    pub err_msg: Option<String>,
    /// Lower-case variant some gateway errors come back with
    #[serde(default)]
    errmsg: Option<String>,
}

impl MsgSecCheckResponse {
    pub fn is_pass(&self) -> bool {
        self.err_code == Some(0)
    }

    fn message(&self) -> &str {
        self.err_msg
            .as_deref()
            .or(self.errmsg.as_deref())
            .unwrap_or("")
    }
}

/// Outcome of a moderation check.
///
/// A flagged result is still a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentCheck {
    pub flagged: bool,
    pub message: String,
}

impl From<&MsgSecCheckResponse> for ContentCheck {
    fn from(response: &MsgSecCheckResponse) -> Self {
        if response.is_pass() {
            ContentCheck {
                flagged: false,
                message: CONTENT_OK.to_string(),
            }
        } else {
            ContentCheck {
                flagged: true,
                message: format!("{CONTENT_VIOLATION}{}", response.message()),
            }
        }
    }
}

/// Security API
pub struct SecurityApi {
    context: Arc<QqContext>,
}

impl SecurityApi {
    /// Create a new SecurityApi instance
    pub fn new(context: Arc<QqContext>) -> Self {
        Self { context }
    }

    /// Check text content for policy violations
    ///
    /// POST /api/json/security/MsgSecCheck?access_token=ACCESS_TOKEN
    ///
    /// # Arguments
    /// * `content` - UTF-8 text, at most 2500 characters (enforced remotely)
    pub async fn msg_sec_check(&self, content: &str) -> Result<ContentCheck, QqError> {
        let access_token = self.context.token_manager.get_token().await?;
        let body = MsgSecCheckRequest {
            access_token: &access_token,
            content,
            appid: self.context.client.appid(),
        };

        let raw = self
            .context
            .client
            .post_with_token("/api/json/security/MsgSecCheck", &access_token, &body)
            .await?;
        let response: MsgSecCheckResponse = decode_json(&raw)?;

        let check = ContentCheck::from(&response);
        if check.flagged {
            log::info!("[QqMp] content flagged: {}", check.message);
        }
        Ok(check)
    }
}
