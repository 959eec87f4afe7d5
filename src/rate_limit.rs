use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::metrics::RATE_LIMIT_ENTRIES;

// Rate limit entry - tracks requests per client identifier
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

// Per-client request budget, best effort only
pub trait RateLimiter: Send + Sync {
    fn check_at(&self, client: &str, now: Instant) -> RateDecision;

    fn check(&self, client: &str) -> RateDecision {
        self.check_at(client, Instant::now())
    }
}

// Counts requests per client in a window that starts at the client's first
// request and restarts on the first request after it elapses.
pub struct InMemoryRateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    limit: u32,      // max requests allowed per window
    window: Duration,
}

impl InMemoryRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            limit,
            window,
        }
    }

    // Drop entries whose window expired more than one window ago.
    // Only bounds memory, correctness comes from the reset in check_at.
    fn purge_expired(&self, now: Instant) {
        let horizon = self.window * 2;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.window_start) <= horizon);
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn check_at(&self, client: &str, now: Instant) -> RateDecision {
        self.purge_expired(now);

        let decision = {
            let mut entry = self
                .entries
                .entry(client.to_string())
                .or_insert(RateLimitEntry {
                    count: 0,
                    window_start: now,
                });

            // window expired..? reset it
            if now.saturating_duration_since(entry.window_start) >= self.window {
                entry.count = 1;
                entry.window_start = now;
                RateDecision::Allowed
            } else if entry.count < self.limit {
                entry.count += 1;
                RateDecision::Allowed
            } else {
                RateDecision::Limited {
                    retry_after: self.window,
                }
            }
        };

        RATE_LIMIT_ENTRIES.set(self.entries.len() as f64);
        decision
    }
}
