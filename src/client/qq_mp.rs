//! Unified QQ Mini Program SDK client

use std::sync::Arc;

use crate::api::auth::{AuthApi, LoginResponse};
use crate::api::qrcode::QrcodeApi;
use crate::api::security::{ContentCheck, SecurityApi};
use crate::api::QqContext;
use crate::error::QqError;
use crate::types::{AppId, AppSecret};

/// Unified QQ Mini Program client
///
/// Each instance owns its own credentials and token cache. Cloning is
/// cheap and clones share the cache.
///
/// # Example
///
/// ```rust,ignore
/// use qq_mp_sdk::QqMp;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let qq = QqMp::new("1110797565", "your_secret")?;
///
///     let openid = qq.get_openid("code_from_qq_login").await?;
///     let check = qq.check_sensitive_content("hello").await?;
///     let image = qq.get_applet_qr_code("/pages/home").await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct QqMp {
    context: Arc<QqContext>,
}

impl std::fmt::Debug for QqMp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QqMp")
            .field("appid", &self.appid())
            .finish_non_exhaustive()
    }
}

impl QqMp {
    /// Client for `appid`/`secret` with every other setting at its default.
    pub fn new(appid: &str, secret: &str) -> Result<Self, QqError> {
        let appid = AppId::new(appid).map_err(QqError::Config)?;
        let secret = AppSecret::new(secret).map_err(QqError::Config)?;
        Self::builder().appid(appid).secret(secret).build()
    }

    pub fn builder() -> super::builder::QqMpBuilder {
        super::builder::QqMpBuilder::default()
    }

    pub fn appid(&self) -> &str {
        self.context.client.appid()
    }

    pub fn context(&self) -> &Arc<QqContext> {
        &self.context
    }

    // Token

    pub async fn get_access_token(&self) -> Result<String, QqError> {
        self.context.token_manager.get_token().await
    }

    pub async fn invalidate_token(&self) {
        self.context.token_manager.invalidate().await;
    }

    // Auth API

    /// Exchange a login code for the user's open id.
    ///
    /// A successful reply without an `openid` is a `MalformedResponse`.
    pub async fn get_openid(&self, code: &str) -> Result<String, QqError> {
        let response = self.login(code).await?;
        Ok(response.open_id()?.into_inner())
    }

    /// Exchange a login code for the full session payload.
    pub async fn login(&self, code: &str) -> Result<LoginResponse, QqError> {
        AuthApi::new(self.context.clone()).login(code).await
    }

    // Security API

    pub async fn check_sensitive_content(&self, content: &str) -> Result<ContentCheck, QqError> {
        SecurityApi::new(self.context.clone())
            .msg_sec_check(content)
            .await
    }

    // Mini code API

    pub async fn get_applet_qr_code(&self, path: &str) -> Result<Vec<u8>, QqError> {
        QrcodeApi::new(self.context.clone())
            .create_mini_code(path)
            .await
    }
}

impl From<Arc<QqContext>> for QqMp {
    fn from(context: Arc<QqContext>) -> Self {
        Self { context }
    }
}
