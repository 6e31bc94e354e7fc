//! Shutter countdown: one tick per second, then fire.

use std::time::Duration;

pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

/// Repeating tick that ends on its own.
///
/// `run` reports `from, from - 1, ..., 1`, one second apart, and returns one
/// second after the last tick. Dropping the future abandons the countdown.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    from: u32,
}

const TICK: Duration = Duration::from_secs(1);

impl Countdown {
    pub fn new(from: u32) -> Self {
        Self { from }
    }

    pub async fn run<F: FnMut(u32)>(&self, mut on_tick: F) {
        if self.from == 0 {
            return;
        }
        let mut interval = tokio::time::interval(TICK);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;
        for remaining in (1..=self.from).rev() {
            on_tick(remaining);
            interval.tick().await;
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_down_then_fires_after_three_seconds() {
        let start = Instant::now();
        let mut ticks = Vec::new();
        Countdown::default()
            .run(|n| ticks.push((n, start.elapsed().as_secs())))
            .await;

        assert_eq!(ticks, vec![(3, 0), (2, 1), (1, 2)]);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_countdown_fires_immediately() {
        let start = Instant::now();
        let mut ticks = 0;
        Countdown::new(0).run(|_| ticks += 1).await;
        assert_eq!(ticks, 0);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_countdown_stops_ticking() {
        let mut ticks = Vec::new();
        let countdown = Countdown::new(5);
        let _ = tokio::time::timeout(Duration::from_millis(1500), countdown.run(|n| ticks.push(n))).await;
        assert_eq!(ticks, vec![5, 4]);
    }
}
