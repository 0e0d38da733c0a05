//! Transport for `api.q.qq.com`
//!
//! [`QqClient`] holds the app credentials and the reqwest connection pool.
//! QQ endpoints come in two shapes: a query-string GET answering JSON, and
//! a JSON POST authenticated by `?access_token=` whose reply may be JSON
//! or raw image bytes. Both check the HTTP status only; the `errcode` in a
//! body is interpreted by the API module that made the call.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

use crate::error::{HttpError, QqError};
use crate::types::{AppId, AppSecret};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.q.qq.com";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// HTTP client bound to one QQ Mini Program app.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct QqClient {
    http: Client,
    appid: AppId,
    secret: AppSecret,
    base_url: String,
    middleware: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for QqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QqClient")
            .field("appid", &self.appid)
            .field("base_url", &self.base_url)
            .field("middleware", &self.middleware.is_some())
            .finish_non_exhaustive()
    }
}

impl QqClient {
    /// Client against `base_url` with a 30 s request timeout and a 10 s
    /// connect timeout.
    ///
    /// ```rust
    /// use qq_mp_sdk::client::QqClient;
    /// use qq_mp_sdk::types::{AppId, AppSecret};
    ///
    /// let client = QqClient::new(
    ///     AppId::new("1110797565").unwrap(),
    ///     AppSecret::new("your_secret").unwrap(),
    ///     "https://api.q.qq.com",
    /// )
    /// .unwrap();
    /// assert_eq!(client.appid(), "1110797565");
    /// ```
    pub fn new(
        appid: AppId,
        secret: AppSecret,
        base_url: impl Into<String>,
    ) -> Result<Self, QqError> {
        Self::with_timeouts(
            appid,
            secret,
            base_url,
            DEFAULT_TIMEOUT,
            DEFAULT_CONNECT_TIMEOUT,
        )
    }

    /// # Errors
    /// - `QqError::Config` if `base_url` is not an `http://` or `https://` URL
    /// - `QqError::Http` if the TLS backend cannot be initialised
    pub fn with_timeouts(
        appid: AppId,
        secret: AppSecret,
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, QqError> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(QqError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            http,
            appid,
            secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            middleware: None,
        })
    }

    pub fn appid(&self) -> &str {
        self.appid.as_str()
    }

    pub(crate) fn secret(&self) -> &str {
        self.secret.as_str()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn with_middleware(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware = Some(executor);
        self
    }

    /// GET `path` with `query` and decode the JSON reply.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, QqError> {
        let request = self.http.get(self.url(path)).query(query).build()?;
        let body = self.send(request).await?.bytes().await?;
        decode_json(&body)
    }

    /// POST `body` as JSON to `path?access_token=...` and return the reply
    /// bytes as they came.
    pub(crate) async fn post_with_token<B: Serialize>(
        &self,
        path: &str,
        access_token: &str,
        body: &B,
    ) -> Result<Vec<u8>, QqError> {
        let url = format!(
            "{}?access_token={}",
            self.url(path),
            utf8_percent_encode(access_token, NON_ALPHANUMERIC)
        );
        let request = self.http.post(url).json(body).build()?;
        let body = self.send(request).await?.bytes().await?;
        Ok(body.to_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Runs the request through the middleware stack, if any. Non-2xx
    /// statuses are transport errors.
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, QqError> {
        let response = match &self.middleware {
            Some(executor) => (executor)(request).await?,
            None => self.http.execute(request).await?,
        };
        Ok(response.error_for_status()?)
    }
}

/// Decode a JSON reply; failures count as transport errors.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, QqError> {
    serde_json::from_slice(body).map_err(|e| QqError::Http(HttpError::Decode(e.to_string())))
}

/// Innermost service of a middleware stack: sends straight to the network.
impl Service<reqwest::Request> for QqClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let http = self.http.clone();
        Box::pin(async move { http.execute(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> QqClient {
        QqClient::new(
            AppId::new("1110797565").unwrap(),
            AppSecret::new("secret1234567890ab").unwrap(),
            base_url,
        )
        .unwrap()
    }

    #[test]
    fn test_new_keeps_credentials() {
        let client = client(DEFAULT_BASE_URL);
        assert_eq!(client.appid(), "1110797565");
        assert_eq!(client.secret(), "secret1234567890ab");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(client("http://127.0.0.1:8080/").base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let result = QqClient::with_timeouts(
            AppId::new("1110797565").unwrap(),
            AppSecret::new("secret1234567890ab").unwrap(),
            "api.q.qq.com",
            Duration::from_secs(60),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(QqError::Config(msg)) if msg.contains("base_url")));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", client(DEFAULT_BASE_URL));
        assert!(debug.contains("1110797565"));
        assert!(!debug.contains("secret1234567890ab"));
    }

    #[tokio::test]
    async fn test_post_with_token_encodes_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/qqa/CreateMiniCode"))
            .and(query_param("access_token", "tok/en+1"))
            .and(body_json(serde_json::json!({ "path": "/p" })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8, 8, 9]))
            .expect(1)
            .mount(&mock_server)
            .await;

        let bytes = client(&mock_server.uri())
            .post_with_token(
                "/api/json/qqa/CreateMiniCode",
                "tok/en+1",
                &serde_json::json!({ "path": "/p" }),
            )
            .await
            .unwrap();

        assert_eq!(bytes, vec![7u8, 8, 9]);
    }

    #[tokio::test]
    async fn test_get_json_leaves_errcode_to_caller() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sns/jscode2session"))
            .and(query_param("js_code", "c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errcode": 40029,
                "errmsg": "invalid code"
            })))
            .mount(&mock_server)
            .await;

        let value: serde_json::Value = client(&mock_server.uri())
            .get_json("/sns/jscode2session", &[("js_code", "c")])
            .await
            .unwrap();

        assert_eq!(value["errcode"], 40029);
    }

    #[tokio::test]
    async fn test_get_json_status_and_decode_failures() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());

        let down = client.get_json::<serde_json::Value>("/down", &[]).await;
        assert!(matches!(down, Err(QqError::Http(HttpError::Reqwest(_)))));

        let html = client.get_json::<serde_json::Value>("/html", &[]).await;
        assert!(matches!(html, Err(QqError::Http(HttpError::Decode(_)))));
    }
}
