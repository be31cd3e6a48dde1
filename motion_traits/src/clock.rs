use std::time::{Duration, Instant};

/// Monotonic clock abstraction used to timestamp motions.
///
/// - now(): returns a monotonic Instant
/// - secs_since(): helper to compute elapsed seconds from an epoch Instant
///
/// Every simulator operation also accepts an explicit instant, so the
/// clock is only consulted when the caller passes none.
pub trait Clock {
    fn now(&self) -> Instant;

    /// Seconds elapsed since `epoch`, saturating at 0 on underflow.
    fn secs_since(&self, epoch: Instant) -> f64 {
        self.now().saturating_duration_since(epoch).as_secs_f64()
    }
}

/// Default, real-time monotonic clock backed by std::time::Instant.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}


#[cfg(test)]
mod tests {
    use super::test_clock::TestClock;
    use super::*;

    #[test]
    fn test_clock_advances_deterministically() {
        let clock = TestClock::new();
        let epoch = clock.now();
        clock.advance(Duration::from_millis(1500));
        assert!((clock.secs_since(epoch) - 1.5).abs() < 1e-9);
        clock.set_offset(Duration::from_secs(2));
        assert!((clock.secs_since(epoch) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
