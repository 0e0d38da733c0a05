//! QQ Authentication API
//!
//! Exchanges the code from `qq.login()` for the user's identifiers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::QqContext;
use crate::error::QqError;
use crate::types::OpenId;

/// Login response from the jscode2session API
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    /// User's unique ID under the Mini Program
    #[serde(default)]
    pub openid: String,
    /// Session key for decrypting user data
    #[serde(default)]
    pub session_key: String,
    /// User's unique ID across the QQ open platform (optional)
    #[serde(default)]
    pub unionid: Option<String>,
    /// Error code; `Some(0)` means success
    #[serde(default)]
    pub(crate) errcode: Option<i32>,
    /// Error message
    #[serde(default)]
    pub(crate) errmsg: String,
}

impl LoginResponse {
    /// Only an explicit `errcode` of 0 counts as success
    pub fn is_success(&self) -> bool {
        self.errcode == Some(0)
    }

    pub fn errcode(&self) -> Option<i32> {
        self.errcode
    }

    pub fn errmsg(&self) -> &str {
        &self.errmsg
    }

    /// The open id as a validated newtype
    pub fn open_id(&self) -> Result<OpenId, QqError> {
        OpenId::new(self.openid.clone()).map_err(QqError::MalformedResponse)
    }
}

/// QQ authentication API
pub struct AuthApi {
    context: Arc<QqContext>,
}

impl AuthApi {
    /// Create a new AuthApi instance
    pub fn new(context: Arc<QqContext>) -> Self {
        Self { context }
    }

    /// Login with code from qq.login()
    ///
    /// GET /sns/jscode2session
    ///
    /// Authenticates with appid + secret directly; no access token is used.
    ///
    /// # Arguments
    /// * `js_code` - The code obtained from qq.login() on the client
    pub async fn login(&self, js_code: &str) -> Result<LoginResponse, QqError> {
        let path = "/sns/jscode2session";
        let query = [
            ("appid", self.context.client.appid()),
            ("secret", self.context.client.secret()),
            ("js_code", js_code),
            ("grant_type", "authorization_code"),
        ];

        let response: LoginResponse = self.context.client.get_json(path, &query).await?;

        QqError::check_api(response.errcode, &response.errmsg)?;

        Ok(response)
    }
}
