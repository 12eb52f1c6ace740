//! Per-identity home-side bookkeeping.
//!
//! Every identity seen by the upstream tracker gets a [`BaselineRecord`] the
//! first time it appears. The side it was first seen on becomes its home side,
//! and each later observation on that side extends its consecutive count. An
//! identity whose count has reached the configured threshold is eligible to
//! start a raid when it is next seen off its home side.

use std::collections::HashMap;

use super::geometry::Side;
use super::raid_tracker::TrackId;

/// Home side and accumulated evidence for one track identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineRecord {
    pub home_side: Side,
    pub consecutive_frames_on_home_side: u32,
}

#[derive(Debug, Clone)]
pub struct BaselineTracker {
    records: HashMap<TrackId, BaselineRecord>,
    threshold: u32,
}

impl BaselineTracker {
    /// `threshold` is the count at which an identity's baseline is established.
    pub fn new(threshold: u32) -> Self {
        Self {
            records: HashMap::new(),
            threshold,
        }
    }

    /// Record one observation and return the identity's updated count.
    ///
    /// An observation off the home side leaves the record untouched; the count
    /// is frozen rather than reset. `OnLine` never counts as the home side.
    pub fn observe(&mut self, id: TrackId, side: Side) -> u32 {
        let record = self.records.entry(id).or_insert(BaselineRecord {
            home_side: side,
            consecutive_frames_on_home_side: 0,
        });
        let first_sighting = record.consecutive_frames_on_home_side == 0;
        if first_sighting || (side == record.home_side && side != Side::OnLine) {
            record.consecutive_frames_on_home_side += 1;
        }
        record.consecutive_frames_on_home_side
    }

    pub fn home_side(&self, id: TrackId) -> Option<Side> {
        self.records.get(&id).map(|r| r.home_side)
    }

    pub fn record(&self, id: TrackId) -> Option<&BaselineRecord> {
        self.records.get(&id)
    }

    /// Whether `id` has been seen on its home side at least `threshold` times.
    pub fn is_established(&self, id: TrackId) -> bool {
        self.records
            .get(&id)
            .is_some_and(|r| r.consecutive_frames_on_home_side >= self.threshold)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Forget every identity. Called once per concluded raid.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T1: TrackId = TrackId(1);
    const T2: TrackId = TrackId(2);

    #[test]
    fn test_first_sighting_sets_home() {
        let mut baseline = BaselineTracker::new(5);
        assert_eq!(baseline.observe(T1, Side::Negative), 1);
        assert_eq!(baseline.home_side(T1), Some(Side::Negative));
        assert_eq!(baseline.home_side(T2), None);
    }

    #[test]
    fn test_count_grows_on_home_side() {
        let mut baseline = BaselineTracker::new(5);
        for expected in 1..=6 {
            assert_eq!(baseline.observe(T1, Side::Positive), expected);
        }
        assert!(baseline.is_established(T1));
    }

    #[test]
    fn test_excursion_freezes_count() {
        let mut baseline = BaselineTracker::new(5);
        baseline.observe(T1, Side::Negative);
        baseline.observe(T1, Side::Negative);
        assert_eq!(baseline.observe(T1, Side::Positive), 2);
        assert_eq!(baseline.home_side(T1), Some(Side::Negative));
        assert_eq!(baseline.observe(T1, Side::Negative), 3);
    }

    #[test]
    fn test_on_line_never_counts() {
        let mut baseline = BaselineTracker::new(2);
        baseline.observe(T1, Side::Negative);
        assert_eq!(baseline.observe(T1, Side::OnLine), 1);

        // first seen on the line: recorded, but the count cannot grow
        assert_eq!(baseline.observe(T2, Side::OnLine), 1);
        assert_eq!(baseline.observe(T2, Side::OnLine), 1);
        assert_eq!(baseline.home_side(T2), Some(Side::OnLine));
        assert!(!baseline.is_established(T2));
    }

    #[test]
    fn test_clear() {
        let mut baseline = BaselineTracker::new(1);
        baseline.observe(T1, Side::Negative);
        baseline.observe(T2, Side::Positive);
        assert_eq!(baseline.len(), 2);
        baseline.clear();
        assert!(baseline.is_empty());
        assert_eq!(baseline.observe(T1, Side::Positive), 1);
        assert_eq!(baseline.home_side(T1), Some(Side::Positive));
    }
}
