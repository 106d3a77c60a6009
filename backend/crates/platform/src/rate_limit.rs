//! Rate Limiting Infrastructure
//!
//! Per-client token buckets kept in a sharded concurrent map.
//!
//! Every client key (normally the source IP) owns an independent bucket that
//! starts full, refills continuously at `max_requests / window` and is capped
//! at `max_requests`. Buckets for different keys never contend on a shared
//! lock. The map is bounded: buckets idle for a whole window are swept (they
//! would be full again anyway), and when the map is at capacity the buckets
//! touched least recently are dropped in one batch, so a stream of new keys
//! pays for a full scan only once every `max_tracked_clients / 8` inserts.

use dashmap::DashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Source of the current instant.
///
/// Lets tests drive refill deterministically.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window (bucket capacity)
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Upper bound on the number of tracked client buckets
    pub max_tracked_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(60),
            max_tracked_clients: 100_000,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            ..Self::default()
        }
    }

    /// Tokens added per second of elapsed time
    pub fn refill_per_sec(&self) -> f64 {
        let secs = self.window.as_secs_f64();
        if secs <= 0.0 {
            f64::from(self.max_requests)
        } else {
            f64::from(self.max_requests) / secs
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Whole tokens left after this request
    pub remaining: u32,
    /// How long until one token is available again (zero when allowed)
    pub retry_after: Duration,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant, capacity: f64, rate: f64) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(capacity);
        self.last_refill = now;
    }

    fn try_consume(&mut self, now: Instant, capacity: f64, rate: f64) -> RateLimitResult {
        self.refill(now, capacity, rate);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            RateLimitResult {
                allowed: true,
                remaining: self.tokens.floor() as u32,
                retry_after: Duration::ZERO,
            }
        } else {
            let needed = 1.0 - self.tokens;
            RateLimitResult {
                allowed: false,
                remaining: 0,
                retry_after: Duration::from_secs_f64(needed / rate),
            }
        }
    }
}

/// Per-client token bucket limiter
#[derive(Debug)]
pub struct RateLimiter<C: Clock = SystemClock> {
    buckets: DashMap<String, TokenBucket>,
    config: RateLimitConfig,
    clock: C,
}

impl RateLimiter<SystemClock> {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Number of client buckets currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    /// Take one token from `key`'s bucket, creating a full bucket on first sight
    pub fn check(&self, key: &str) -> RateLimitResult {
        let now = self.clock.now();
        let capacity = f64::from(self.config.max_requests);
        let rate = self.config.refill_per_sec();

        if let Some(mut bucket) = self.buckets.get_mut(key) {
            return bucket.try_consume(now, capacity, rate);
        }

        // No guard may be held here: make_room iterates every shard.
        if self.buckets.len() >= self.config.max_tracked_clients {
            self.make_room(now);
        }

        self.buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::full(capacity, now))
            .try_consume(now, capacity, rate)
    }

    /// Drop buckets that have been idle for at least one window
    ///
    /// Returns the number of buckets removed.
    pub fn evict_idle(&self) -> usize {
        let now = self.clock.now();
        self.evict_idle_at(now)
    }

    fn evict_idle_at(&self, now: Instant) -> usize {
        let window = self.config.window;
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_refill) < window);
        before.saturating_sub(self.buckets.len())
    }

    fn make_room(&self, now: Instant) {
        let max = self.config.max_tracked_clients;
        let target = max.saturating_sub(eviction_batch(max));

        let idle = self.evict_idle_at(now);
        if idle > 0 {
            tracing::debug!(evicted = idle, "Evicted idle rate limit buckets");
        }
        if self.buckets.len() <= target {
            return;
        }

        let mut seen: Vec<(Instant, String)> = self
            .buckets
            .iter()
            .map(|entry| (entry.value().last_refill, entry.key().clone()))
            .collect();
        let excess = seen.len().saturating_sub(target);
        if excess == 0 {
            return;
        }
        seen.select_nth_unstable_by_key(excess - 1, |(last_seen, _)| *last_seen);
        for (_, key) in seen.into_iter().take(excess) {
            self.buckets.remove(&key);
        }
        tracing::warn!(
            max,
            evicted = excess,
            "Rate limit table full, evicted least recently seen clients"
        );
    }
}

/// Buckets dropped at once when the table is full
fn eviction_batch(max_tracked_clients: usize) -> usize {
    (max_tracked_clients / 8).max(1)
}

/// Periodically sweep idle buckets in the background
pub fn spawn_idle_sweeper<C>(limiter: Arc<RateLimiter<C>>, every: Duration) -> JoinHandle<()>
where
    C: Clock + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let evicted = limiter.evict_idle();
            if evicted > 0 {
                tracing::debug!(
                    evicted,
                    remaining = limiter.tracked_clients(),
                    "Rate limit sweep"
                );
            }
        }
    })
}

#[cfg(any(test, feature = "test-helpers"))]
pub use manual_clock::ManualClock;

#[cfg(any(test, feature = "test-helpers"))]
mod manual_clock {
    use super::Clock;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Clock that only moves when told to. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        current: Arc<Mutex<Instant>>,
    }

    impl ManualClock {
        pub fn new(start: Instant) -> Self {
            Self {
                current: Arc::new(Mutex::new(start)),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.current.lock().expect("ManualClock mutex poisoned");
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.current.lock().expect("ManualClock mutex poisoned")
        }
    }
}
