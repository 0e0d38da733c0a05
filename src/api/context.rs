//! State shared by the per-endpoint API structs

use std::sync::Arc;

use crate::client::QqClient;
use crate::token::TokenManager;

/// Credentials, transport and token cache of one app.
///
/// Every [`QqMp`](crate::QqMp) clone and every API struct it creates holds
/// the same `Arc<QqContext>`, so they all see one token cache.
#[derive(Debug, Clone)]
pub struct QqContext {
    pub(crate) client: Arc<QqClient>,
    pub(crate) token_manager: Arc<TokenManager>,
}

impl QqContext {
    pub fn new(client: Arc<QqClient>, token_manager: Arc<TokenManager>) -> Self {
        Self {
            client,
            token_manager,
        }
    }

    pub fn client(&self) -> &QqClient {
        &self.client
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }
}
