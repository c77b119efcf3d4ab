use std::time::{Duration, Instant};

const WINDOW: usize = 64;

#[derive(Clone, Debug)]
pub struct PerformanceStats {
    pub min: Duration,
    pub max: Duration,
    pub avg: Duration,
}

/// Rolling window of zone durations, e.g. the per-frame cursor sample + draw.
#[derive(Debug)]
pub struct PerformanceMonitor {
    zone_start: Instant,
    valid_samples: usize,
    sample_pos: usize,
    samples: [Duration; WINDOW],
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn start_zone(&mut self) -> PerformanceMonitorZone<'_> {
        self.zone_start = Instant::now();
        PerformanceMonitorZone(self)
    }

    fn record(&mut self, dur: Duration) {
        self.samples[self.sample_pos] = dur;
        self.sample_pos = (self.sample_pos + 1) % WINDOW;
        self.valid_samples = usize::min(WINDOW, self.valid_samples + 1);
    }

    /// Statistics over the recorded samples, `None` until at least one zone ended.
    pub fn get(&self) -> Option<PerformanceStats> {
        let samples = &self.samples[..self.valid_samples];
        let min = samples.iter().min()?;
        let max = samples.iter().max()?;
        let total: Duration = samples.iter().sum();

        Some(PerformanceStats {
            min: *min,
            max: *max,
            avg: total / samples.len() as u32,
        })
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        PerformanceMonitor {
            zone_start: Instant::now(),
            valid_samples: 0,
            sample_pos: 0,
            samples: [Duration::ZERO; WINDOW],
        }
    }
}

#[must_use]
#[derive(Debug)]
pub struct PerformanceMonitorZone<'a>(&'a mut PerformanceMonitor);

impl Drop for PerformanceMonitorZone<'_> {
    fn drop(&mut self) {
        let dur = self.0.zone_start.elapsed();
        self.0.record(dur);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_cover_recorded_samples() {
        let mut perf = PerformanceMonitor::new();
        assert!(perf.get().is_none());

        perf.record(Duration::from_millis(2));
        perf.record(Duration::from_millis(4));

        let stats = perf.get().unwrap();
        assert_eq!(stats.min, Duration::from_millis(2));
        assert_eq!(stats.max, Duration::from_millis(4));
        assert_eq!(stats.avg, Duration::from_millis(3));
    }

    #[test]
    fn window_wraps() {
        let mut perf = PerformanceMonitor::new();
        for _ in 0..WINDOW {
            perf.record(Duration::from_millis(10));
        }
        perf.record(Duration::from_millis(1));

        let stats = perf.get().unwrap();
        assert_eq!(stats.min, Duration::from_millis(1));
        assert_eq!(stats.max, Duration::from_millis(10));
    }
}
