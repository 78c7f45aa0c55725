use pulse_core::{Averages, Sample};
use std::collections::VecDeque;

/// One minute of samples at the default 2.5 s cadence.
pub const DEFAULT_HISTORY_LEN: usize = 24;

/// Rolling window of recent samples for moving averages.
///
/// Eviction is by count: once `capacity` samples are held, each push drops
/// the oldest. A slower cadence therefore spans more wall-clock time.
#[derive(Debug, Clone)]
pub struct History {
    samples:  VecDeque<Sample>,
    capacity: usize,
}

impl History {
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest beyond capacity.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Per-metric mean over the window, rounded; all zero when empty.
    pub fn averages(&self) -> Averages {
        if self.samples.is_empty() {
            return Averages::default();
        }
        let mean = |metric: fn(&Sample) -> u8| -> u8 {
            let sum: u64 = self.samples.iter().map(|s| u64::from(metric(s))).sum();
            (sum as f64 / self.samples.len() as f64).round() as u8
        };
        Averages {
            cpu_avg:    mean(|s| s.cpu_usage),
            memory_avg: mean(|s| s.memory_usage),
            disk_avg:   mean(|s| s.disk_usage),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn sample(cpu: u8, memory: u8, disk: u8) -> Sample {
        Sample {
            timestamp:    Local::now(),
            cpu_usage:    cpu,
            memory_usage: memory,
            disk_usage:   disk,
        }
    }

    #[test]
    fn empty_window_averages_zero() {
        assert_eq!(History::new(4).averages(), Averages::default());
    }

    #[test]
    fn mean_of_three() {
        let mut history = History::new(4);
        for v in [10, 20, 30] {
            history.push(sample(v, v, 0));
        }
        assert_eq!(
            history.averages(),
            Averages { cpu_avg: 20, memory_avg: 20, disk_avg: 0 }
        );
    }

    #[test]
    fn evicts_oldest_first() {
        let mut history = History::new(3);
        for v in 1..=4 {
            history.push(sample(v, 0, 0));
        }
        assert_eq!(history.len(), 3);
        let kept: Vec<u8> = history.iter().map(|s| s.cpu_usage).collect();
        assert_eq!(kept, vec![2, 3, 4]);
        assert_eq!(history.latest().map(|s| s.cpu_usage), Some(4));
    }

    #[test]
    fn running_average_tracks_last_n() {
        let cap = 5;
        let mut history = History::new(cap);
        let values: Vec<u8> = vec![3, 97, 41, 0, 100, 55, 12, 12, 88, 7, 64, 29];
        for (i, &v) in values.iter().enumerate() {
            history.push(sample(v, 0, 0));
            let window = &values[(i + 1).saturating_sub(cap)..=i];
            let mean = window.iter().map(|&x| f64::from(x)).sum::<f64>() / window.len() as f64;
            assert_eq!(history.averages().cpu_avg, mean.round() as u8);
        }
    }

    #[test]
    fn rounds_half_up() {
        let mut history = History::new(2);
        history.push(sample(1, 0, 0));
        history.push(sample(2, 0, 0));
        assert_eq!(history.averages().cpu_avg, 2);
    }

    #[test]
    fn zero_capacity_holds_one() {
        let mut history = History::new(0);
        history.push(sample(5, 0, 0));
        history.push(sample(9, 0, 0));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.averages().cpu_avg, 9);
    }
}
