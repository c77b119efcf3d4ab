use std::time::{Duration, Instant};

/// Fires at most once per interval, e.g. the overlay timer refresh or periodic
/// cursor statistics.
#[derive(Debug)]
pub struct Timer {
    last_fired: Instant,
    interval: Duration,
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    pub fn starting_at(start: Instant, interval: Duration) -> Self {
        Timer {
            last_fired: start,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if a full interval has passed since the last time it fired.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_fired) >= self.interval {
            self.last_fired = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut timer = Timer::starting_at(t0, ms(100));

        assert!(!timer.poll_at(t0 + ms(99)));
        assert!(timer.poll_at(t0 + ms(100)));
        assert!(!timer.poll_at(t0 + ms(150)));
        assert!(timer.poll_at(t0 + ms(260)));
        assert!(!timer.poll_at(t0 + ms(359)));
    }

    #[test]
    fn clock_going_backwards_does_not_fire() {
        let t0 = Instant::now();
        let mut timer = Timer::starting_at(t0 + Duration::from_secs(1), Duration::from_millis(10));
        assert!(!timer.poll_at(t0));
    }
}
