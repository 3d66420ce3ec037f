//! Cumulative study counters.
//!
//! `UserStats` is the persisted record. `StatsTracker` applies deltas to it,
//! and `SharedStats` is the cloneable handle shared by the session engine
//! and the study-time ticker.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Process-wide cumulative counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Seconds of active study today.
    pub today_duration: u64,
    /// Words answered correctly today.
    pub today_count: u64,
    /// Lifetime mastered count.
    pub total_mastered: u64,
    /// Consecutive-day study count.
    pub streak: u32,
}

/// Applies stat deltas to a `UserStats` record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsTracker {
    stats: UserStats,
}

impl StatsTracker {
    pub fn new(stats: UserStats) -> Self {
        Self { stats }
    }

    /// Add `duration_secs` of study time and `correct` correct answers.
    pub fn tick(&mut self, duration_secs: u64, correct: u64) {
        self.stats.today_duration = self.stats.today_duration.saturating_add(duration_secs);
        self.stats.today_count = self.stats.today_count.saturating_add(correct);
    }

    pub fn stats(&self) -> UserStats {
        self.stats
    }
}

/// Cloneable handle to a shared tracker.
///
/// Both deltas of a tick are applied under one lock.
#[derive(Debug, Clone, Default)]
pub struct SharedStats {
    inner: Arc<Mutex<StatsTracker>>,
}

impl SharedStats {
    pub fn new(stats: UserStats) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatsTracker::new(stats))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsTracker> {
        // A panic while holding the lock cannot leave the counters half
        // updated, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn tick(&self, duration_secs: u64, correct: u64) {
        self.lock().tick(duration_secs, correct);
    }

    /// Current totals.
    pub fn snapshot(&self) -> UserStats {
        self.lock().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_are_zero() {
        let stats = UserStats::default();
        assert_eq!(stats.today_duration, 0);
        assert_eq!(stats.today_count, 0);
        assert_eq!(stats.total_mastered, 0);
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn test_tick_applies_both_deltas() {
        let mut tracker = StatsTracker::default();
        tracker.tick(1, 0);
        tracker.tick(0, 1);
        tracker.tick(3, 2);

        let stats = tracker.stats();
        assert_eq!(stats.today_duration, 4);
        assert_eq!(stats.today_count, 3);
    }

    #[test]
    fn test_tick_keeps_other_counters() {
        let mut tracker = StatsTracker::new(UserStats {
            today_duration: 10,
            today_count: 2,
            total_mastered: 40,
            streak: 6,
        });
        tracker.tick(5, 1);

        let stats = tracker.stats();
        assert_eq!(stats.today_duration, 15);
        assert_eq!(stats.today_count, 3);
        assert_eq!(stats.total_mastered, 40);
        assert_eq!(stats.streak, 6);
    }

    #[test]
    fn test_shared_stats_clones_see_same_totals() {
        let stats = SharedStats::default();
        let other = stats.clone();

        stats.tick(1, 0);
        other.tick(0, 1);

        assert_eq!(stats.snapshot(), other.snapshot());
        assert_eq!(stats.snapshot().today_duration, 1);
        assert_eq!(stats.snapshot().today_count, 1);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(UserStats::default()).unwrap();
        assert!(json.get("todayDuration").is_some());
        assert!(json.get("todayCount").is_some());
        assert!(json.get("totalMastered").is_some());
        assert!(json.get("streak").is_some());
    }
}
