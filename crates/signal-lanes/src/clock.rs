use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::Instant;

/// Monotonic time source, in seconds since the feed's epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall clock anchored at construction.
///
/// Backed by `tokio::time::Instant` so paused-time tests drive it together
/// with the runner's timers.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and replay.
#[derive(Debug, Default)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new(start_secs: f64) -> Self {
        Self {
            bits: AtomicU64::new(start_secs.to_bits()),
        }
    }

    pub fn set(&self, secs: f64) {
        self.bits.store(secs.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, secs: f64) {
        self.set(self.now() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1.5);
        assert_eq!(clock.now(), 1.5);
        clock.advance(2.0);
        assert_eq!(clock.now(), 3.5);
        clock.set(0.0);
        assert_eq!(clock.now(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_system_clock_follows_tokio_time() {
        let clock = SystemClock::new();
        tokio::time::advance(std::time::Duration::from_secs(4)).await;
        assert!((clock.now() - 4.0).abs() < 1e-6);
    }
}
