use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config;
use crate::state::AppState;

/// Per-client token bucket state. `tokens` stays in `[0, capacity]`.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
    last_seen: Instant,
}

/// Token-bucket admission control over a concurrent per-client bucket table.
///
/// The DashMap entry guard covers the whole read-modify-write for one key,
/// so concurrent requests on the same key cannot both spend the same token.
/// Distinct keys live on independent shards and do not serialize each other.
pub struct TokenBucketLimiter {
    buckets: DashMap<String, Bucket>,
    capacity: u32,
    refill_per_sec: u32,
}

impl TokenBucketLimiter {
    pub fn new(capacity: u32, refill_per_sec: u32) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_per_sec,
        }
    }

    pub fn from_config() -> Self {
        let rl = &config::config().rate_limit;
        Self::new(rl.capacity, rl.refill_per_sec)
    }

    /// Charge one token for `key`. Returns whether the request is admitted.
    /// Refill bookkeeping is persisted on rejection too.
    pub fn admit(&self, key: &str) -> bool {
        self.admit_at(key, Instant::now())
    }

    fn admit_at(&self, key: &str, now: Instant) -> bool {
        let mut entry = self.buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_refill: now,
            last_seen: now,
        });
        let bucket = entry.value_mut();

        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        let refill = (elapsed * f64::from(self.refill_per_sec)) as u64;
        let tokens = (u64::from(bucket.tokens) + refill).min(u64::from(self.capacity)) as u32;

        // Only advance the refill mark when whole tokens were added, so
        // sub-second bursts cannot starve refill indefinitely.
        if refill > 0 {
            bucket.last_refill = now;
        }
        bucket.last_seen = now;

        if tokens > 0 {
            bucket.tokens = tokens - 1;
            true
        } else {
            bucket.tokens = tokens;
            false
        }
    }

    /// Drop buckets idle longer than `idle`. Keeps the table bounded under
    /// many distinct client keys.
    pub fn evict_idle(&self, idle: Duration) {
        let now = Instant::now();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_seen) < idle);
        let evicted = before.saturating_sub(self.buckets.len());
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.buckets.len(), "evicted idle buckets");
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}

/// Background sweep of idle buckets, interval and idle window from config.
pub fn spawn_sweeper(limiter: Arc<TokenBucketLimiter>) -> tokio::task::JoinHandle<()> {
    let rl = &config::config().rate_limit;
    let interval = Duration::from_secs(rl.sweep_interval_secs.max(1));
    let idle = Duration::from_secs(rl.idle_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick completes immediately
        loop {
            ticker.tick().await;
            limiter.evict_idle(idle);
        }
    })
}

/// Admission check for every inbound request. Rejections terminate the chain
/// with the fixed plain-text 429 body.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    if state.limiter.admit(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "rate limit exceeded");
        (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response()
    }
}

/// Remote IP of the caller; address-less clients all share one bucket.
fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "global".to_string())
}
