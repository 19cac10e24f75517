/// Consecutive-success counter with its session maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreakTracker {
    pub current: u32,
    pub max: u32,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the success set a new session maximum.
    pub fn register_success(&mut self) -> bool {
        self.current = self.current.saturating_add(1);
        if self.current > self.max {
            self.max = self.current;
            true
        } else {
            false
        }
    }

    /// Wrong input or timeout: the chain breaks, the maximum stays.
    pub fn register_miss(&mut self) -> u32 {
        let broken = self.current;
        self.current = 0;
        broken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_increments_by_one() {
        let mut tracker = StreakTracker::new();
        for level in 1..=3 {
            tracker.register_success();
            assert_eq!(tracker.current, level);
        }
        assert_eq!(tracker.max, 3);
    }

    #[test]
    fn test_miss_resets_current_keeps_max() {
        let mut tracker = StreakTracker::new();
        tracker.register_success();
        tracker.register_success();
        assert_eq!(tracker.register_miss(), 2);
        assert_eq!(tracker.current, 0);
        assert_eq!(tracker.max, 2);
        assert!(!tracker.register_success());
        assert_eq!(tracker.max, 2);
    }

    #[test]
    fn test_new_max_reported() {
        let mut tracker = StreakTracker::new();
        assert!(tracker.register_success());
        tracker.register_miss();
        assert!(!tracker.register_success());
        assert!(tracker.register_success());
    }
}
