//! Per-host delay between clone operations.
//!
//! Remote hosts see one clone per repository in quick succession; the
//! throttler spaces them out so a long index does not hammer a single host.

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Spaces out operations per category (the repository host).
pub trait Throttler {
    /// Block until at least the configured delay has passed since the
    /// previous call for `category`. The first call per category never waits.
    fn throttle(&mut self, category: &str);
}

/// Default throttler: consecutive calls for one category are at least
/// `delay` apart; distinct categories do not affect each other.
pub struct DelayThrottler {
    delay: Duration,
    most_recent: HashMap<String, Instant>,
}

impl DelayThrottler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            most_recent: HashMap::new(),
        }
    }

    pub fn no_delay() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Throttler for DelayThrottler {
    fn throttle(&mut self, category: &str) {
        if let Some(last) = self.most_recent.get(category) {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                let wait = self.delay - elapsed;
                debug!(category, ?wait, "throttling");
                thread::sleep(wait);
            }
        }
        self.most_recent.insert(category.to_string(), Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_does_not_wait() {
        let mut throttler = DelayThrottler::new(Duration::from_secs(30));
        let start = Instant::now();
        throttler.throttle("github.com");
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_same_category_waits() {
        let mut throttler = DelayThrottler::new(Duration::from_millis(50));
        throttler.throttle("github.com");
        let start = Instant::now();
        throttler.throttle("github.com");
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_distinct_categories_do_not_interact() {
        let mut throttler = DelayThrottler::new(Duration::from_secs(30));
        throttler.throttle("github.com");
        let start = Instant::now();
        throttler.throttle("bitbucket.org");
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_no_delay_never_waits() {
        let mut throttler = DelayThrottler::no_delay();
        let start = Instant::now();
        for _ in 0..3 {
            throttler.throttle("localhost");
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
