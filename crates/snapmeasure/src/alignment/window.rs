use std::collections::VecDeque;

/// Fixed-capacity history of the most recent scalar readings.
#[derive(Debug, Clone)]
pub(crate) struct SampleWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl SampleWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest one when full.
    pub(crate) fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }

    /// `max - min` over the window, or `None` when empty.
    pub(crate) fn spread(&self) -> Option<f64> {
        let first = *self.values.front()?;
        let (lo, hi) = self
            .values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(hi - lo)
    }

    /// Population variance over the window; zero when fewer than two readings.
    pub(crate) fn variance(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.values.iter().sum::<f64>() / n as f64;
        self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64
    }
}
