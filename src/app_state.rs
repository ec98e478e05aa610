use std::sync::Arc;

use crate::config::CallbackPolicy;
use crate::services::{store::ResultChain, webhook::WebhookClient};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub results: Arc<ResultChain>,
    pub webhook: Arc<WebhookClient>,
    pub callback_policy: CallbackPolicy,
}

impl AppState {
    pub fn new(results: ResultChain, webhook: WebhookClient, callback_policy: CallbackPolicy) -> Self {
        Self {
            results: Arc::new(results),
            webhook: Arc::new(webhook),
            callback_policy,
        }
    }
}
