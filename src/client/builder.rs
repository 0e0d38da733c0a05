//! Configuration builder for [`QqMp`]

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Request as ReqwestRequest, Response as ReqwestResponse};
use tower::{Layer, Service};

use crate::api::QqContext;
use crate::clock::{Clock, ExpiryArithmetic, SystemClock};
use crate::error::QqError;
use crate::token::TokenManager;
use crate::types::{AppId, AppSecret};

use super::qq_client::{
    MiddlewareExecutor, MiddlewareFuture, QqClient, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_TIMEOUT,
};
use super::QqMp;

/// Builder for [`QqMp`]
///
/// Defaults: base URL `https://api.q.qq.com`, 30 s timeout, 10 s connect
/// timeout, system clock, literal expiry arithmetic, no middleware.
#[must_use]
#[derive(Default)]
pub struct QqMpBuilder<M = ()> {
    appid: Option<AppId>,
    secret: Option<AppSecret>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    clock: Option<Arc<dyn Clock>>,
    expiry_arithmetic: ExpiryArithmetic,
    middleware: Option<M>,
}

impl<M> std::fmt::Debug for QqMpBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QqMpBuilder")
            .field("appid", &self.appid)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("expiry_arithmetic", &self.expiry_arithmetic)
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

impl<M> QqMpBuilder<M> {
    pub fn appid(mut self, appid: AppId) -> Self {
        self.appid = Some(appid);
        self
    }

    pub fn secret(mut self, secret: AppSecret) -> Self {
        self.secret = Some(secret);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Time source for token expiry checks
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// How `expires_in` is added to the clock
    pub fn expiry_arithmetic(mut self, arithmetic: ExpiryArithmetic) -> Self {
        self.expiry_arithmetic = arithmetic;
        self
    }

    pub fn with_middleware<M2>(self, middleware: M2) -> QqMpBuilder<M2>
    where
        M2: Layer<QqClient> + Clone + Send + Sync + 'static,
    {
        QqMpBuilder {
            appid: self.appid,
            secret: self.secret,
            base_url: self.base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            clock: self.clock,
            expiry_arithmetic: self.expiry_arithmetic,
            middleware: Some(middleware),
        }
    }

    pub fn build(self) -> Result<QqMp, QqError>
    where
        M: Layer<QqClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let appid = self
            .appid
            .ok_or_else(|| QqError::Config("appid is required".to_string()))?;
        let secret = self
            .secret
            .ok_or_else(|| QqError::Config("secret is required".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut client = QqClient::with_timeouts(
            appid,
            secret,
            base_url,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        )?;

        if let Some(middleware) = self.middleware {
            let service = middleware.layer(client.clone());
            client = client.with_middleware(make_middleware_executor(service));
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let token_manager = Arc::new(TokenManager::with_clock(
            client.clone(),
            clock,
            self.expiry_arithmetic,
        ));
        let context = Arc::new(QqContext::new(Arc::new(client), token_manager));

        Ok(QqMp::from(context))
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| -> MiddlewareFuture {
        let mut service = (*service).clone();
        Box::pin(async move { service.call(request).await })
    })
}
