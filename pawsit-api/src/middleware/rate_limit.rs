/// Per-client rate limiting
///
/// Each remote address (`ip:port` from the connection, `"unknown"` when the
/// server was started without connect info) gets a token bucket. Buckets
/// refill continuously and every accepted request takes one token.
///
/// # Defaults
///
/// - Refill: 1 token per second
/// - Burst: 5 tokens
/// - Idle buckets are dropped after 10 minutes
/// - At most 10 000 clients are tracked; the least recently seen client is
///   evicted to make room
///
/// # Headers
///
/// - `X-RateLimit-Limit`: bucket capacity
/// - `X-RateLimit-Remaining`: tokens left after this request
/// - `Retry-After`: seconds to wait (429 responses only)
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{routing::get, Router};
/// use pawsit_api::config::RateLimitConfig;
/// use pawsit_api::middleware::rate_limit::{rate_limit_layer, RateLimiter};
///
/// let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
/// let app: Router = Router::new()
///     .route("/api/pets", get(|| async { "ok" }))
///     .layer(axum::middleware::from_fn_with_state(limiter, rate_limit_layer));
/// ```

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Token bucket for one client
#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,

    last_refill: Instant,

    /// Last request from this client, used for eviction
    last_seen: Instant,
}

impl TokenBucket {
    /// Creates a full bucket
    fn new(capacity: u32, now: Instant) -> Self {
        TokenBucket {
            tokens: f64::from(capacity),
            last_refill: now,
            last_seen: now,
        }
    }

    /// Refills tokens based on elapsed time
    fn refill(&mut self, rate: f64, capacity: u32, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(f64::from(capacity));
        self.last_refill = now;
    }

    /// Attempts to consume N tokens
    fn try_consume(&mut self, count: f64) -> bool {
        if self.tokens >= count {
            self.tokens -= count;
            true
        } else {
            false
        }
    }

    /// Calculates seconds until N tokens available
    fn seconds_until_available(&self, count: f64, rate: f64) -> u64 {
        let deficit = count - self.tokens;
        if deficit <= 0.0 || rate <= 0.0 {
            0
        } else {
            (deficit / rate).ceil() as u64
        }
    }
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

/// Bounded map of client buckets behind one mutex
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Bucket capacity, reported as `X-RateLimit-Limit`
    pub fn limit(&self) -> u32 {
        self.config.burst
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.buckets().len()
    }

    /// Takes one token for `key` if available
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut buckets = self.buckets();

        if !buckets.contains_key(key) && buckets.len() >= self.config.max_clients {
            self.evict(&mut buckets, now);
        }

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.config.burst, now));

        bucket.refill(self.config.per_second, self.config.burst, now);
        bucket.last_seen = now;

        if bucket.try_consume(1.0) {
            RateLimitDecision::Allowed {
                remaining: bucket.tokens.floor() as u32,
            }
        } else {
            RateLimitDecision::Limited {
                retry_after: bucket
                    .seconds_until_available(1.0, self.config.per_second)
                    .max(1),
            }
        }
    }

    /// Drops idle buckets, then the least recently seen one if still full
    fn evict(&self, buckets: &mut HashMap<String, TokenBucket>, now: Instant) {
        let ttl = Duration::from_secs(self.config.idle_ttl_secs);
        buckets.retain(|_, bucket| now.saturating_duration_since(bucket.last_seen) < ttl);

        if buckets.len() < self.config.max_clients {
            return;
        }

        let oldest = buckets
            .iter()
            .min_by_key(|(_, bucket)| bucket.last_seen)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            tracing::debug!(client = %key, "Evicting rate limit bucket");
            buckets.remove(&key);
        }
    }

    fn buckets(&self) -> MutexGuard<'_, HashMap<String, TokenBucket>> {
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Rate limiting middleware
///
/// # Errors
///
/// - 429 Too Many Requests: the client's bucket is empty
pub async fn rate_limit_layer(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match limiter.check(&client) {
        RateLimitDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", HeaderValue::from(limiter.limit()));
            headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
            Ok(response)
        }
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!(client = %client, retry_after, "Rate limit exceeded");
            Err(ApiError::RateLimitExceeded {
                retry_after,
                limit: limiter.limit(),
            })
        }
    }
}
