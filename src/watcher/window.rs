use std::collections::VecDeque;

/// Fixed-capacity window over the most recent response statuses.
#[derive(Debug, Clone)]
pub struct RequestWindow {
    capacity: usize,
    statuses: VecDeque<u16>,
}

impl RequestWindow {
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            statuses: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a status, evicting the oldest once full.
    pub fn push(&mut self, status: u16) {
        if self.statuses.len() == self.capacity {
            self.statuses.pop_front();
        }
        self.statuses.push_back(status);
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.statuses.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Percentage (0–100) of 5xx statuses in the window; 0.0 when empty.
    pub fn error_rate(&self) -> f64 {
        if self.statuses.is_empty() {
            return 0.0;
        }
        let errors = self.statuses.iter().filter(|s| **s >= 500).count();
        errors as f64 / self.statuses.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_has_zero_rate() {
        let w = RequestWindow::new(4);
        assert!(w.is_empty());
        assert_eq!(w.error_rate(), 0.0);
    }

    #[test]
    fn counts_only_5xx_as_errors() {
        let mut w = RequestWindow::new(4);
        for s in [200, 404, 500, 503] {
            w.push(s);
        }
        assert!(w.is_full());
        assert_eq!(w.error_rate(), 50.0);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut w = RequestWindow::new(0);
        assert_eq!(w.capacity(), 1);
        w.push(503);
        w.push(200);
        assert!(w.is_full());
        assert_eq!(w.error_rate(), 0.0);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut w = RequestWindow::new(2);
        w.push(500);
        w.push(200);
        w.push(200);
        assert_eq!(w.len(), 2);
        assert_eq!(w.error_rate(), 0.0);
    }
}
