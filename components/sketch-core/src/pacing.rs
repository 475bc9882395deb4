use embassy_time::{Duration, Instant, Timer};

/// Fixed-rate frame pacing anchored at the start instant.
///
/// Work that overruns a frame does not shift the grid: the next tick lands on
/// the following multiple of `period` after `start`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameClock {
    start: Instant,
    period: Duration,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    pub fn starting_at(start: Instant, period: Duration) -> Self {
        FrameClock { start, period }
    }

    /// Time left until the next frame boundary, `period` when `now` sits on one.
    pub fn delay_until_next(&self, now: Instant) -> Duration {
        let period = self.period.as_ticks();
        if period == 0 {
            return Duration::from_ticks(0);
        }
        let elapsed = now.saturating_duration_since(self.start).as_ticks();
        Duration::from_ticks(period - elapsed % period)
    }

    pub async fn tick(&self) {
        let now = Instant::now();
        let delay = self.delay_until_next(now);
        trace!("Frame> sleep {} ms", delay.as_millis());
        Timer::at(now + delay).await;
    }
}

#[cfg(test)]
pub mod tests {
    use serial_test::serial;

    use super::*;

    fn at_ms(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn delay_aligns_to_period() {
        let clock = FrameClock::starting_at(at_ms(1_000), Duration::from_millis(100));
        assert_eq!(clock.delay_until_next(at_ms(1_000)), Duration::from_millis(100));
        assert_eq!(clock.delay_until_next(at_ms(1_030)), Duration::from_millis(70));
        assert_eq!(clock.delay_until_next(at_ms(1_099)), Duration::from_millis(1));
        // overrun skips to the following boundary
        assert_eq!(clock.delay_until_next(at_ms(1_250)), Duration::from_millis(50));
    }

    #[test]
    fn delay_before_start_is_a_full_period() {
        let clock = FrameClock::starting_at(at_ms(1_000), Duration::from_millis(100));
        assert_eq!(clock.delay_until_next(at_ms(500)), Duration::from_millis(100));
    }

    #[test]
    fn zero_period_never_waits() {
        let clock = FrameClock::starting_at(at_ms(0), Duration::from_ticks(0));
        assert_eq!(clock.delay_until_next(at_ms(42)), Duration::from_ticks(0));
    }

    #[serial(timing)]
    #[tokio::test]
    async fn ticks_keep_rate_with_slow_frames() {
        let clock = FrameClock::new(Duration::from_millis(20));
        let begin = Instant::now();
        for _ in 0..5 {
            Timer::after_millis(7).await;
            clock.tick().await;
        }
        let elapsed = begin.elapsed().as_millis();
        assert!((100..130).contains(&elapsed), "took {} ms", elapsed);
    }
}
