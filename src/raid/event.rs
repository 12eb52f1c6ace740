//! Raid events and the append-only log that downstream scoring reads.

use serde::{Deserialize, Serialize};

use super::raid_tracker::TrackId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaidEventKind {
    /// Raider crossed away from its home side
    Start,
    /// Raider returned to its home side
    End,
    /// Raider was missing for longer than the tolerance
    ForcedEnd,
}

/// A single raid transition. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidEvent {
    pub kind: RaidEventKind,
    pub frame_index: u64,
    pub raider_id: TrackId,
}

impl RaidEvent {
    pub fn new(kind: RaidEventKind, frame_index: u64, raider_id: TrackId) -> Self {
        Self {
            kind,
            frame_index,
            raider_id,
        }
    }

    pub fn is_conclusion(&self) -> bool {
        matches!(self.kind, RaidEventKind::End | RaidEventKind::ForcedEnd)
    }
}

/// Ordered record of every raid event of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaidEventLog {
    events: Vec<RaidEvent>,
}

impl RaidEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: RaidEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[RaidEvent] {
        &self.events
    }

    /// Events appended after the first `seen`, for incremental readers.
    pub fn since(&self, seen: usize) -> &[RaidEvent] {
        self.events.get(seen..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&RaidEvent> {
        self.events.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RaidEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<RaidEvent> {
        self.events
    }
}

impl<'a> IntoIterator for &'a RaidEventLog {
    type Item = &'a RaidEvent;
    type IntoIter = std::slice::Iter<'a, RaidEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaidOutcome {
    /// Raider made it back to its home side
    Completed,
    /// Raider could not be found again and the raid was force-ended
    Lost,
}

/// Per-raid figures recorded when a raid concludes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidSummary {
    pub raid_number: u32,
    pub initial_raider_id: TrackId,
    /// Raider identity at the moment the raid concluded
    pub raider_id: TrackId,
    pub start_frame: u64,
    pub end_frame: u64,
    pub outcome: RaidOutcome,
    pub raider_switches: u32,
    pub max_penetration_px: f64,
}

impl RaidSummary {
    pub fn duration_frames(&self) -> u64 {
        self.end_frame - self.start_frame
    }

    /// Raid length in seconds at the video's frame rate.
    pub fn duration_secs(&self, fps: f64) -> f64 {
        self.duration_frames() as f64 / fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_appends_in_order() {
        let mut log = RaidEventLog::new();
        log.append(RaidEvent::new(RaidEventKind::Start, 7, TrackId(1)));
        log.append(RaidEvent::new(RaidEventKind::End, 40, TrackId(2)));

        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].kind, RaidEventKind::Start);
        assert!(log.last().unwrap().is_conclusion());
        assert_eq!(log.since(1).len(), 1);
        assert_eq!(log.since(1)[0].frame_index, 40);
        assert!(log.since(2).is_empty());
        assert!(log.since(10).is_empty());
    }

    #[test]
    fn test_summary_duration() {
        let summary = RaidSummary {
            raid_number: 1,
            initial_raider_id: TrackId(1),
            raider_id: TrackId(1),
            start_frame: 30,
            end_frame: 180,
            outcome: RaidOutcome::Completed,
            raider_switches: 0,
            max_penetration_px: 212.5,
        };
        assert_eq!(summary.duration_frames(), 150);
        assert!((summary.duration_secs(30.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_serializes() {
        let event = RaidEvent::new(RaidEventKind::ForcedEnd, 120, TrackId(3));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"ForcedEnd","frame_index":120,"raider_id":3}"#
        );
    }
}
