//! Per-IP rate limiting for the public submission endpoint.
//!
//! A fixed-window counter keyed by client IP, held in memory. The site
//! runs as a single process, so there is no shared store to coordinate
//! with; a periodic prune task keeps the map from accumulating
//! one-time visitors.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;

/// Interval between prune passes over the hit map.
const PRUNE_INTERVAL_SECS: u64 = 300;

/// Counter state for one client within the current window.
struct WindowSlot {
    window_start: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client IP.
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    hits: Mutex<HashMap<String, WindowSlot>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_per_window` hits per `window`.
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record a hit for `key` and report whether it is within the limit.
    ///
    /// The window restarts once `window` has elapsed since its first hit.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());

        let slot = hits.entry(key.to_string()).or_insert(WindowSlot {
            window_start: now,
            count: 0,
        });

        if now.duration_since(slot.window_start) >= self.window {
            slot.window_start = now;
            slot.count = 0;
        }

        slot.count += 1;
        slot.count <= self.max_per_window
    }

    /// Drop entries whose window has fully elapsed.
    pub fn prune(&self) {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        hits.retain(|_, slot| now.duration_since(slot.window_start) < self.window);
    }

    /// Number of clients currently tracked (for logging).
    pub fn tracked_clients(&self) -> usize {
        self.hits.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Spawn the periodic prune task for a shared limiter.
///
/// Runs until `cancel` fires.
pub fn start_pruning(
    limiter: Arc<RateLimiter>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PRUNE_INTERVAL_SECS));
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Rate limiter prune task stopping");
                    break;
                }
                _ = interval.tick() => {
                    limiter.prune();
                    tracing::debug!(
                        tracked = limiter.tracked_clients(),
                        "Pruned rate limiter windows"
                    );
                }
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Client IP extraction
// ---------------------------------------------------------------------------

/// Best-effort client IP, for rate limiting.
///
/// Prefers the first entry of `X-Forwarded-For` (the site runs behind a
/// reverse proxy in production), then the socket peer address, then a
/// shared `"unknown"` bucket so clients without either still share one
/// limit instead of bypassing it.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(forwarded) = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
        {
            if let Some(first) = forwarded.split(',').next() {
                let ip = first.trim();
                if !ip.is_empty() {
                    return Ok(ClientIp(ip.to_string()));
                }
            }
        }

        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(ClientIp(addr.ip().to_string()));
        }

        Ok(ClientIp("unknown".to_string()))
    }
}
