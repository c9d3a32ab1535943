//! In-memory fixed-window rate limiter.
//!
//! Keys are `(route scope, client ip)`. Each key gets a counter that resets
//! when its window elapses. This is a single-process limiter; it matches the
//! original platform's in-memory fallback and is good enough for the two
//! endpoints that need protection (public quotation submission and bulk
//! import).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

/// Limit for `POST /public/quotations/{token}` per client per minute.
pub const QUOTE_SUBMIT_LIMIT: u32 = 10;

/// Limit for `POST /admin/bulk-import` per client per minute.
pub const BULK_IMPORT_LIMIT: u32 = 5;

/// Window length shared by all scopes.
const WINDOW: Duration = Duration::from_secs(60);

/// Entries older than this are dropped during periodic pruning.
const STALE_AFTER: Duration = Duration::from_secs(300);

/// How many checks between pruning passes.
const PRUNE_EVERY: u64 = 1024;

struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window request counter.
pub struct RateLimiter {
    windows: Mutex<HashMap<(&'static str, String), Window>>,
    checks: Mutex<u64>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            checks: Mutex::new(0),
        }
    }

    /// Count a request against `(scope, client)`. Returns `Err` with the
    /// seconds remaining in the window when the limit is exceeded.
    pub fn check(&self, scope: &'static str, client: &str, limit: u32) -> Result<(), u64> {
        self.maybe_prune();

        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let window = windows
            .entry((scope, client.to_string()))
            .or_insert(Window { started_at: now, count: 0 });

        if now.duration_since(window.started_at) >= WINDOW {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= limit {
            let elapsed = now.duration_since(window.started_at);
            let retry_after = WINDOW.saturating_sub(elapsed).as_secs().max(1);
            return Err(retry_after);
        }

        window.count += 1;
        Ok(())
    }

    fn maybe_prune(&self) {
        let mut checks = self.checks.lock().unwrap_or_else(|e| e.into_inner());
        *checks += 1;
        if *checks % PRUNE_EVERY != 0 {
            return;
        }
        drop(checks);

        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        windows.retain(|_, w| now.duration_since(w.started_at) < STALE_AFTER);
    }
}

/// Best-effort client identity: first `X-Forwarded-For` hop, else a shared
/// bucket. The server sits behind a proxy in production, so the header is
/// normally present.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            assert!(limiter.check("test", "1.2.3.4", 5).is_ok());
        }
        let retry_after = limiter.check("test", "1.2.3.4", 5).unwrap_err();
        assert!(retry_after >= 1 && retry_after <= 60);
    }

    #[test]
    fn clients_are_independent() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.check("test", "1.1.1.1", 3).is_ok());
        }
        assert!(limiter.check("test", "1.1.1.1", 3).is_err());
        assert!(limiter.check("test", "2.2.2.2", 3).is_ok());
    }

    #[test]
    fn scopes_are_independent() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("a", "1.1.1.1", 1).is_ok());
        assert!(limiter.check("a", "1.1.1.1", 1).is_err());
        assert!(limiter.check("b", "1.1.1.1", 1).is_ok());
    }

    #[test]
    fn forwarded_header_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(client_key(&headers), "203.0.113.7");
    }

    #[test]
    fn missing_header_falls_back_to_shared_bucket() {
        assert_eq!(client_key(&HeaderMap::new()), "unknown");
    }
}
