//! Process-wide spacing of registry requests.
//!
//! Bibliographic registries enforce global request rates (CrossRef allows
//! roughly 50 requests per second for polite clients), so the limiter is an
//! explicit object rather than ambient state: share one instance — behind an
//! [`Arc`](std::sync::Arc) when calling from several threads — and every
//! caller observes the same inter-request clock. A substitute limiter with a
//! large budget makes tests instantaneous.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Enforces a minimum interval between consecutive requests.
///
/// [`await_turn`](RateLimiter::await_turn) records the timestamp of the
/// last request and blocks the calling thread for any shortfall versus the
/// minimum interval. Requests are not queued or reordered; contending
/// callers simply serialize on the internal clock.
///
/// # Examples
///
/// ```
/// use citecheck::RateLimiter;
///
/// let limiter = RateLimiter::per_second(50.0);
/// limiter.await_turn();
/// limiter.await_turn(); // sleeps for the remainder of the 20ms window
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter allowing at most `requests_per_second` requests.
    ///
    /// Non-positive rates disable the limiter entirely.
    #[must_use]
    pub fn per_second(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// The enforced minimum spacing between requests.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Blocks until the next request is allowed, then claims the slot.
    ///
    /// The internal lock is held across the sleep so that concurrent
    /// callers cannot claim overlapping slots.
    pub fn await_turn(&self) {
        let mut last = match self.last_request.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}
