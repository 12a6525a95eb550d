//! Frame-based idle animation timing

use serde::{Deserialize, Serialize};

/// A looping frame sequence advanced on a fixed interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationCycle {
    /// Number of frames in the sequence (0 = nothing loaded)
    pub frame_count: usize,
    /// Display duration of one frame
    pub interval_ms: f64,
    /// Frame currently shown
    pub index: usize,
    /// Clock value of the last advance
    pub last_advance_ms: f64,
}

impl AnimationCycle {
    pub fn new(frame_count: usize, interval_ms: f64) -> Self {
        Self {
            frame_count,
            interval_ms,
            index: 0,
            last_advance_ms: 0.0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Advance one frame once the interval has elapsed.
    ///
    /// Returns true when the index moved. Calling again with the same `now_ms`
    /// is a no-op, so a cycle advances at most once per tick.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        if self.is_empty() || now_ms - self.last_advance_ms < self.interval_ms {
            return false;
        }
        self.index = (self.index + 1) % self.frame_count;
        self.last_advance_ms = now_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_waits_for_interval() {
        let mut cycle = AnimationCycle::new(35, 100.0);
        assert!(!cycle.advance(99.9));
        assert_eq!(cycle.index, 0);
        assert!(cycle.advance(100.0));
        assert_eq!(cycle.index, 1);
        assert_eq!(cycle.last_advance_ms, 100.0);
    }

    #[test]
    fn test_idempotent_within_tick() {
        let mut cycle = AnimationCycle::new(16, 120.0);
        assert!(cycle.advance(500.0));
        assert!(!cycle.advance(500.0));
        assert_eq!(cycle.index, 1);
    }

    #[test]
    fn test_wraps_to_start() {
        let mut cycle = AnimationCycle::new(3, 10.0);
        for i in 1..=3 {
            cycle.advance(i as f64 * 10.0);
        }
        assert_eq!(cycle.index, 0);
    }

    #[test]
    fn test_empty_cycle_never_advances() {
        let mut cycle = AnimationCycle::new(0, 100.0);
        assert!(!cycle.advance(10_000.0));
        assert_eq!(cycle.index, 0);
    }

    proptest! {
        #[test]
        fn prop_index_is_advances_mod_len(len in 1usize..64, n in 0usize..500) {
            let mut cycle = AnimationCycle::new(len, 100.0);
            for i in 1..=n {
                prop_assert!(cycle.advance(i as f64 * 100.0));
            }
            prop_assert_eq!(cycle.index, n % len);
        }
    }
}
