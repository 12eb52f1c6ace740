//! Raid lifecycle state machine.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::RaidError;
use crate::raid::baseline::BaselineTracker;
use crate::raid::config::RaidConfig;
use crate::raid::event::{RaidEvent, RaidEventKind, RaidEventLog, RaidOutcome, RaidSummary};
use crate::raid::geometry::{Midline, Side};
use crate::raid::recovery::attempt_recovery;
use crate::raid::rect::Rect;
use crate::raid::state::{ActiveRaid, RaidState};

/// Identity label assigned by the upstream tracker.
///
/// Only meaningful for equality within one video, and not guaranteed to stay
/// attached to the same player across occlusions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        TrackId(id)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One tracked player in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub identity: TrackId,
    pub bbox: Rect,
    pub frame_index: u64,
}

impl Observation {
    pub fn new(identity: TrackId, bbox: Rect, frame_index: u64) -> Self {
        Self {
            identity,
            bbox,
            frame_index,
        }
    }
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct RaidReport {
    pub events: Vec<RaidEvent>,
    pub raids: Vec<RaidSummary>,
    /// Raid still in progress when frames stopped arriving
    pub unfinished: Option<ActiveRaid>,
}

/// Observation paired with the side its box center falls on.
struct Classified<'a> {
    obs: &'a Observation,
    side: Side,
}

/// Drives raid start/end detection for a single video.
///
/// Feed every frame in increasing `frame_index` order through
/// [`RaidTracker::update`]. Build a fresh tracker for each video.
#[derive(Debug, Clone)]
pub struct RaidTracker {
    config: RaidConfig,
    midline: Midline,
    baseline: BaselineTracker,
    state: RaidState,
    log: RaidEventLog,
    raids: Vec<RaidSummary>,
    raids_started: u32,
    last_frame: Option<u64>,
}

impl RaidTracker {
    pub fn new(midline: Midline, config: RaidConfig) -> Result<Self, RaidError> {
        config.validate()?;
        Ok(Self {
            baseline: BaselineTracker::new(config.baseline_frames),
            config,
            midline,
            state: RaidState::Inactive,
            log: RaidEventLog::new(),
            raids: Vec::new(),
            raids_started: 0,
            last_frame: None,
        })
    }

    pub fn with_default_config(midline: Midline) -> Result<Self, RaidError> {
        Self::new(midline, RaidConfig::default())
    }

    /// Process one frame of tracker output.
    ///
    /// `observations` must be in the order the tracker reported them; the
    /// first eligible player in that order starts a raid. Returns the raid
    /// transition made in this frame, if any (also appended to the log).
    pub fn update(&mut self, frame_index: u64, observations: &[Observation]) -> Option<RaidEvent> {
        if let Some(last) = self.last_frame.filter(|&last| frame_index <= last) {
            warn!(frame_index, last, "ignoring out-of-order frame");
            return None;
        }
        self.last_frame = Some(frame_index);

        let classified: Vec<Classified<'_>> = observations
            .iter()
            .filter(|obs| {
                let matches = obs.frame_index == frame_index;
                if !matches {
                    warn!(
                        frame_index,
                        observation_frame = obs.frame_index,
                        identity = %obs.identity,
                        "skipping observation from another frame"
                    );
                }
                matches
            })
            .map(|obs| Classified {
                obs,
                side: self.midline.side_of(obs.bbox.center()),
            })
            .collect();

        let counts: Vec<u32> = classified
            .iter()
            .map(|c| self.baseline.observe(c.obs.identity, c.side))
            .collect();

        let event = if self.state.is_active() {
            self.advance_raid(frame_index, &classified)
        } else {
            self.try_start(frame_index, &classified, &counts)
        };

        if let Some(event) = event {
            self.log.append(event);
        }
        event
    }

    fn try_start(
        &mut self,
        frame_index: u64,
        classified: &[Classified<'_>],
        counts: &[u32],
    ) -> Option<RaidEvent> {
        for (c, &count) in classified.iter().zip(counts) {
            let id = c.obs.identity;
            let Some(home_side) = self.baseline.home_side(id) else {
                continue;
            };
            if count < self.config.baseline_frames || c.side == home_side {
                continue;
            }

            self.raids_started += 1;
            let center = c.obs.bbox.center();
            self.state = RaidState::Active(ActiveRaid::new(
                self.raids_started,
                id,
                home_side,
                frame_index,
                c.obs.bbox,
                self.midline.distance_to(center),
            ));
            info!(
                raid = self.raids_started,
                raider = %id,
                from = ?home_side,
                frame = frame_index,
                "raid started"
            );
            return Some(RaidEvent::new(RaidEventKind::Start, frame_index, id));
        }
        None
    }

    fn advance_raid(
        &mut self,
        frame_index: u64,
        classified: &[Classified<'_>],
    ) -> Option<RaidEvent> {
        let RaidState::Active(raid) = &mut self.state else {
            return None;
        };
        raid.cooldown_remaining = raid.cooldown_remaining.saturating_sub(1);

        let raider_id = raid.raider_id;
        if let Some(c) = classified.iter().find(|c| c.obs.identity == raider_id) {
            let distance = self.midline.distance_to(c.obs.bbox.center());
            raid.sighted(c.obs.bbox, distance);
            if c.side == raid.raider_home_side {
                return self.conclude(frame_index, RaidOutcome::Completed);
            }
            return None;
        }

        raid.missing_frame_count += 1;
        if raid.missing_frame_count > self.config.recovery_min_missing
            && raid.cooldown_remaining == 0
        {
            let observations: Vec<Observation> = classified.iter().map(|c| *c.obs).collect();
            match attempt_recovery(
                &observations,
                &self.midline,
                raid.raider_home_side,
                self.config.recovery_distance_cap,
            ) {
                Some(candidate) => {
                    debug!(
                        from = %raid.raider_id,
                        to = %candidate.identity,
                        distance = candidate.distance,
                        frame = frame_index,
                        "raider identity switched"
                    );
                    raid.switch_to(
                        candidate.identity,
                        candidate.bbox,
                        self.config.recovery_cooldown,
                    );
                    return None;
                }
                None => debug!(
                    raider = %raid.raider_id,
                    missing = raid.missing_frame_count,
                    frame = frame_index,
                    "no recovery candidate"
                ),
            }
        }

        if raid.missing_frame_count > self.config.raider_missing_tolerance {
            return self.conclude(frame_index, RaidOutcome::Lost);
        }
        None
    }

    /// End the active raid, record its summary and forget all baselines.
    fn conclude(&mut self, frame_index: u64, outcome: RaidOutcome) -> Option<RaidEvent> {
        let RaidState::Active(raid) = std::mem::take(&mut self.state) else {
            return None;
        };
        self.baseline.clear();

        let kind = match outcome {
            RaidOutcome::Completed => RaidEventKind::End,
            RaidOutcome::Lost => RaidEventKind::ForcedEnd,
        };
        match outcome {
            RaidOutcome::Completed => info!(
                raid = raid.raid_number,
                raider = %raid.raider_id,
                frame = frame_index,
                frames = frame_index - raid.start_frame,
                "raid ended"
            ),
            RaidOutcome::Lost => info!(
                raid = raid.raid_number,
                raider = %raid.raider_id,
                frame = frame_index,
                missing = raid.missing_frame_count,
                "raider lost, raid force-ended"
            ),
        }

        self.raids.push(RaidSummary {
            raid_number: raid.raid_number,
            initial_raider_id: raid.initial_raider_id,
            raider_id: raid.raider_id,
            start_frame: raid.start_frame,
            end_frame: frame_index,
            outcome,
            raider_switches: raid.raider_switches,
            max_penetration_px: raid.max_penetration_px,
        });
        Some(RaidEvent::new(kind, frame_index, raid.raider_id))
    }

    pub fn state(&self) -> &RaidState {
        &self.state
    }

    pub fn baseline(&self) -> &BaselineTracker {
        &self.baseline
    }

    pub fn events(&self) -> &RaidEventLog {
        &self.log
    }

    /// Summaries of every concluded raid, in order.
    pub fn raids(&self) -> &[RaidSummary] {
        &self.raids
    }

    pub fn midline(&self) -> &Midline {
        &self.midline
    }

    pub fn config(&self) -> &RaidConfig {
        &self.config
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }

    /// Stop processing and hand back everything recorded.
    pub fn finish(self) -> RaidReport {
        RaidReport {
            events: self.log.into_events(),
            raids: self.raids,
            unfinished: match self.state {
                RaidState::Active(raid) => Some(raid),
                RaidState::Inactive => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // x < 100 is Positive, x > 100 is Negative
    fn tracker(config: RaidConfig) -> RaidTracker {
        let midline = Midline::from_coords(100.0, 0.0, 100.0, 480.0).unwrap();
        RaidTracker::new(midline, config).unwrap()
    }

    fn at(id: u64, cx: f64, frame: u64) -> Observation {
        Observation::new(TrackId(id), Rect::centered(cx, 240.0, 20.0, 60.0), frame)
    }

    /// Six home-side frames for each id, starting at frame 1.
    fn establish(tracker: &mut RaidTracker, players: &[(u64, f64)]) -> u64 {
        for frame in 1..=6 {
            let obs: Vec<_> = players.iter().map(|&(id, x)| at(id, x, frame)).collect();
            assert_eq!(tracker.update(frame, &obs), None);
        }
        6
    }

    #[test]
    fn test_start_needs_established_baseline() {
        let mut t = tracker(RaidConfig::default());
        for frame in 1..=4 {
            t.update(frame, &[at(1, 50.0, frame)]);
        }
        // count is 4 < 5
        assert_eq!(t.update(5, &[at(1, 150.0, 5)]), None);
        assert!(!t.state().is_active());

        assert_eq!(t.update(6, &[at(1, 50.0, 6)]), None);
        let event = t.update(7, &[at(1, 150.0, 7)]).unwrap();
        assert_eq!(event, RaidEvent::new(RaidEventKind::Start, 7, TrackId(1)));
        assert_eq!(t.state().raider_home_side(), Some(Side::Positive));
    }

    #[test]
    fn test_first_qualifying_observation_wins() {
        let mut t = tracker(RaidConfig::default());
        let frame = establish(&mut t, &[(1, 50.0), (2, 150.0)]) + 1;
        let event = t
            .update(frame, &[at(2, 50.0, frame), at(1, 150.0, frame)])
            .unwrap();
        assert_eq!(event.raider_id, TrackId(2));
        assert_eq!(t.events().len(), 1);
    }

    #[test]
    fn test_raid_end_clears_baselines() {
        let mut t = tracker(RaidConfig::default());
        let frame = establish(&mut t, &[(1, 50.0), (2, 150.0)]);
        t.update(frame + 1, &[at(1, 150.0, frame + 1), at(2, 160.0, frame + 1)]);
        let event = t
            .update(frame + 2, &[at(1, 60.0, frame + 2), at(2, 160.0, frame + 2)])
            .unwrap();
        assert_eq!(event.kind, RaidEventKind::End);
        assert!(t.baseline().is_empty());
        assert_eq!(t.state(), &RaidState::Inactive);

        let summary = &t.raids()[0];
        assert_eq!(summary.outcome, RaidOutcome::Completed);
        assert_eq!(summary.duration_frames(), 1);
        assert!((summary.max_penetration_px - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_raider_seen_resets_missing() {
        let mut t = tracker(RaidConfig::default());
        let mut frame = establish(&mut t, &[(1, 50.0)]) + 1;
        t.update(frame, &[at(1, 150.0, frame)]);
        for _ in 0..3 {
            frame += 1;
            t.update(frame, &[]);
        }
        assert_eq!(t.state().missing_frame_count(), 3);
        assert!(t.state().is_searching());

        frame += 1;
        t.update(frame, &[at(1, 180.0, frame)]);
        assert_eq!(t.state().missing_frame_count(), 0);
        assert_eq!(
            t.state().last_known_bbox(),
            Some(Rect::centered(180.0, 240.0, 20.0, 60.0))
        );
    }

    #[test]
    fn test_forced_end_after_tolerance() {
        let mut t = tracker(RaidConfig::default().with_raider_missing_tolerance(10));
        let start = establish(&mut t, &[(1, 50.0)]) + 1;
        t.update(start, &[at(1, 150.0, start)]);
        for k in 1..=10 {
            assert_eq!(t.update(start + k, &[]), None);
        }
        let event = t.update(start + 11, &[]).unwrap();
        assert_eq!(event.kind, RaidEventKind::ForcedEnd);
        assert_eq!(event.raider_id, TrackId(1));
        assert!(t.baseline().is_empty());
        assert_eq!(t.raids()[0].outcome, RaidOutcome::Lost);
    }

    #[test]
    fn test_out_of_order_frame_ignored() {
        let mut t = tracker(RaidConfig::default());
        t.update(3, &[at(1, 50.0, 3)]);
        assert_eq!(t.update(3, &[at(1, 50.0, 3)]), None);
        assert_eq!(t.update(2, &[at(1, 50.0, 2)]), None);
        assert_eq!(
            t.baseline().record(TrackId(1)).unwrap().consecutive_frames_on_home_side,
            1
        );
        assert_eq!(t.last_frame(), Some(3));
    }

    #[test]
    fn test_mismatched_observation_skipped() {
        let mut t = tracker(RaidConfig::default());
        t.update(1, &[at(1, 50.0, 1), at(2, 50.0, 7)]);
        assert!(t.baseline().record(TrackId(1)).is_some());
        assert!(t.baseline().record(TrackId(2)).is_none());
    }

    #[test]
    fn test_finish_reports_unfinished_raid() {
        let mut t = tracker(RaidConfig::default());
        let frame = establish(&mut t, &[(1, 50.0)]) + 1;
        t.update(frame, &[at(1, 150.0, frame)]);
        let report = t.finish();
        assert_eq!(report.events.len(), 1);
        assert!(report.raids.is_empty());
        assert_eq!(report.unfinished.unwrap().raider_id, TrackId(1));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let midline = Midline::from_coords(0.0, 0.0, 0.0, 1.0).unwrap();
        let config = RaidConfig::default().with_recovery_distance_cap(f64::NAN);
        assert!(RaidTracker::new(midline, config).is_err());
    }

    #[test]
    fn test_track_id_display() {
        assert_eq!(TrackId(42).to_string(), "#42");
        assert_eq!(TrackId::from(7), TrackId(7));
    }
}
