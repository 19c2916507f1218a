//! Time sources for the engine.

use std::sync::Arc;

/// Millisecond clock used to stamp events.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub type ClockRef = Arc<dyn Clock>;

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Tokio's clock, anchored to the wall clock at creation.
///
/// Follows a paused test runtime, which keeps event stamps consistent with
/// the press timers.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
    base_ms: i64,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
            base_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> i64 {
        self.base_ms + self.origin.elapsed().as_millis() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        let start = clock.now_ms();
        tokio::time::sleep(Duration::from_millis(1234)).await;
        assert_eq!(clock.now_ms() - start, 1234);
    }

    #[test]
    fn test_system_clock_is_epoch_millis() {
        assert!(SystemClock.now_ms() > 1_600_000_000_000);
    }
}
