use std::sync::Arc;

use crate::middleware::rate_limit::TokenBucketLimiter;
use crate::query::QueryEngine;
use crate::store::DocumentStore;

/// Shared application state. The bucket table inside the limiter is the only
/// cross-request mutable structure.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub engine: QueryEngine,
    pub limiter: Arc<TokenBucketLimiter>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_limiter(store, TokenBucketLimiter::from_config())
    }

    pub fn with_limiter(store: Arc<dyn DocumentStore>, limiter: TokenBucketLimiter) -> Self {
        Self {
            engine: QueryEngine::new(Arc::clone(&store)),
            store,
            limiter: Arc::new(limiter),
        }
    }
}
