// Fixed-window rate limiting for login attempts

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for rate limiters.
///
/// The fixed-window implementation below is the only one in use; a
/// sliding-window or token-bucket limiter would be a drop-in swap behind
/// this interface.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record an attempt under a key. Returns `true` if the attempt is
    /// allowed, `false` if the key is over its limit for the current window.
    async fn check(&self, key: &str) -> bool;

    /// Clear all state for a key.
    async fn reset(&self, key: &str);
}

/// Per-key attempt counter for the current window.
#[derive(Debug, Clone)]
struct WindowState {
    count: u32,
    /// When the current window resets (epoch milliseconds).
    reset_at: i64,
}

/// In-memory fixed-window rate limiter.
///
/// Counts attempts per key within a window of `window_ms`; the first attempt
/// of a window starts it. Bursts straddling a window boundary can reach up to
/// twice the nominal rate, an accepted tradeoff for simplicity. Stale keys
/// are never pruned, which is acceptable for a process scoped to a single
/// client context.
pub struct FixedWindowRateLimiter {
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
    max_attempts: u32,
    window_ms: i64,
}

impl FixedWindowRateLimiter {
    pub fn new(max_attempts: u32, window_ms: i64) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            max_attempts,
            window_ms,
        }
    }

    /// Record an attempt at an explicit timestamp. Exposed so callers and
    /// tests can drive the window deterministically.
    pub async fn check_at(&self, key: &str, now_ms: i64) -> bool {
        let mut windows = self.windows.write().await;

        match windows.get_mut(key) {
            Some(state) if now_ms < state.reset_at => {
                if state.count >= self.max_attempts {
                    debug!(
                        "Rate limit exceeded for '{}' ({} attempts in window)",
                        key, state.count
                    );
                    return false;
                }
                state.count += 1;
                true
            }
            _ => {
                // No record, or the previous window has elapsed.
                windows.insert(
                    key.to_string(),
                    WindowState {
                        count: 1,
                        reset_at: now_ms + self.window_ms,
                    },
                );
                true
            }
        }
    }
}

#[async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn check(&self, key: &str) -> bool {
        self.check_at(key, Utc::now().timestamp_millis()).await
    }

    async fn reset(&self, key: &str) {
        let mut windows = self.windows.write().await;
        windows.remove(key);
    }
}
