use dashmap::DashMap;
use rand::Rng;

use crate::metrics::RATE_LIMIT_ENTRIES;

pub const RATE_LIMIT_WINDOW_MS: i64 = 60_000;
pub const RATE_LIMIT_MAX: u32 = 20;
pub const CLEANUP_PROBABILITY: f64 = 0.1;
pub const CLEANUP_RETAIN_WINDOWS: i64 = 2;

// Wall clock source, swappable in tests
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

// Rate limit entry key - one bucket per client per window
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    pub identity: String,
    pub window: i64,
}

/// Fixed-window per-client request counter.
///
/// Old windows are swept opportunistically: each `check` call has a
/// `CLEANUP_PROBABILITY` chance of removing entries more than
/// `CLEANUP_RETAIN_WINDOWS` behind the current one. Under low traffic stale
/// entries may linger.
pub struct RateLimiter {
    entries: DashMap<RateLimitKey, u32>,
    clock: Box<dyn Clock>,
    cleanup_probability: f64,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            cleanup_probability: CLEANUP_PROBABILITY,
        }
    }

    pub fn with_cleanup_probability(mut self, probability: f64) -> Self {
        self.cleanup_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn current_window(&self) -> i64 {
        self.clock.now_millis().div_euclid(RATE_LIMIT_WINDOW_MS)
    }

    // true = allowed and counted, false = over the limit (not counted)
    pub fn check(&self, identity: &str) -> bool {
        let window = self.current_window();

        let allowed = {
            let mut count = self
                .entries
                .entry(RateLimitKey {
                    identity: identity.to_string(),
                    window,
                })
                .or_insert(0);

            if *count >= RATE_LIMIT_MAX {
                false
            } else {
                *count += 1;
                true
            }
        };
        // shard guard must be released before retain() below

        if rand::thread_rng().gen_bool(self.cleanup_probability) {
            self.cleanup(window);
        }

        allowed
    }

    // Drop every entry whose window is more than CLEANUP_RETAIN_WINDOWS old
    pub fn cleanup(&self, current_window: i64) {
        let cutoff = current_window - CLEANUP_RETAIN_WINDOWS;
        self.entries.retain(|key, _| key.window >= cutoff);
        RATE_LIMIT_ENTRIES.set(self.entries.len() as f64);
    }

    // Requests counted for `identity` in the current window
    pub fn count(&self, identity: &str) -> u32 {
        let key = RateLimitKey {
            identity: identity.to_string(),
            window: self.current_window(),
        };
        self.entries.get(&key).map(|c| *c).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Clone, Default)]
    pub(crate) struct ManualClock(Arc<AtomicI64>);

    impl ManualClock {
        pub(crate) fn at(millis: i64) -> Self {
            Self(Arc::new(AtomicI64::new(millis)))
        }

        pub(crate) fn advance(&self, millis: i64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn limiter(clock: &ManualClock) -> RateLimiter {
        RateLimiter::with_clock(Box::new(clock.clone())).with_cleanup_probability(0.0)
    }

    #[test]
    fn twenty_allowed_then_rejected() {
        let clock = ManualClock::at(1_700_000_000_000);
        let rl = limiter(&clock);

        for expected in 1..=RATE_LIMIT_MAX {
            assert!(rl.check("1.2.3.4"));
            assert_eq!(rl.count("1.2.3.4"), expected);
        }
        assert!(!rl.check("1.2.3.4"));
        assert_eq!(rl.count("1.2.3.4"), RATE_LIMIT_MAX);
    }

    #[test]
    fn identities_have_independent_buckets() {
        let clock = ManualClock::at(0);
        let rl = limiter(&clock);

        for _ in 0..RATE_LIMIT_MAX {
            assert!(rl.check("1.1.1.1"));
        }
        assert!(rl.check("2.2.2.2"));
        assert!(!rl.check("1.1.1.1"));
    }

    #[test]
    fn next_window_resets_count() {
        let clock = ManualClock::at(1_700_000_000_000);
        let rl = limiter(&clock);

        for _ in 0..RATE_LIMIT_MAX {
            rl.check("1.2.3.4");
        }
        assert!(!rl.check("1.2.3.4"));

        clock.advance(RATE_LIMIT_WINDOW_MS);
        assert!(rl.check("1.2.3.4"));
        assert_eq!(rl.count("1.2.3.4"), 1);
    }

    #[test]
    fn window_is_floor_of_epoch_millis() {
        let clock = ManualClock::at(119_999);
        let rl = limiter(&clock);
        assert_eq!(rl.current_window(), 1);
        clock.advance(1);
        assert_eq!(rl.current_window(), 2);
    }

    #[test]
    fn cleanup_keeps_last_two_windows() {
        let clock = ManualClock::at(0);
        let rl = limiter(&clock);

        for _ in 0..4 {
            rl.check("a");
            clock.advance(RATE_LIMIT_WINDOW_MS);
        }
        // windows 0..=3 populated, now at window 4
        assert_eq!(rl.len(), 4);

        // windows 0 and 1 are more than two behind
        rl.cleanup(rl.current_window());
        assert_eq!(rl.len(), 2);

        rl.cleanup(rl.current_window() + 10);
        assert!(rl.is_empty());
    }

    #[test]
    fn always_sampling_cleans_during_check() {
        let clock = ManualClock::at(0);
        let rl = RateLimiter::with_clock(Box::new(clock.clone())).with_cleanup_probability(1.0);

        rl.check("a");
        clock.advance(RATE_LIMIT_WINDOW_MS * 3);
        rl.check("b");

        assert_eq!(rl.len(), 1);
        assert_eq!(rl.count("b"), 1);
    }

    #[test]
    fn rejected_check_still_runs_cleanup() {
        let clock = ManualClock::at(0);
        let rl = RateLimiter::with_clock(Box::new(clock.clone())).with_cleanup_probability(0.0);

        rl.check("stale");
        clock.advance(RATE_LIMIT_WINDOW_MS * 3);
        for _ in 0..RATE_LIMIT_MAX {
            assert!(rl.check("busy"));
        }
        assert_eq!(rl.len(), 2);

        let rl = rl.with_cleanup_probability(1.0);
        assert!(!rl.check("busy"));

        // stale window gone, busy bucket untouched by the rejected call
        assert_eq!(rl.len(), 1);
        assert_eq!(rl.count("busy"), RATE_LIMIT_MAX);
    }

    #[test]
    fn concurrent_checks_never_exceed_max() {
        let clock = ManualClock::at(0);
        let rl = Arc::new(limiter(&clock));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rl = Arc::clone(&rl);
                std::thread::spawn(move || (0..10).filter(|_| rl.check("shared")).count())
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, RATE_LIMIT_MAX as usize);
        assert_eq!(rl.count("shared"), RATE_LIMIT_MAX);
    }
}
