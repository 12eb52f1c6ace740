//! Raid lifecycle state.

use super::geometry::Side;
use super::raid_tracker::TrackId;
use super::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaidStatus {
    /// No raid in progress
    #[default]
    Inactive,
    /// A raider is across the midline
    Active,
}

/// Bookkeeping for the raid in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRaid {
    /// 1-based count of raids started in this session
    pub raid_number: u32,
    /// Identity currently treated as the raider
    pub raider_id: TrackId,
    /// Identity that started the raid, before any substitution
    pub initial_raider_id: TrackId,
    /// Side the raid started from; returning here ends the raid
    pub raider_home_side: Side,
    pub start_frame: u64,
    /// Consecutive frames in which `raider_id` was not observed
    pub missing_frame_count: u32,
    /// Frames left before another substitution is allowed
    pub cooldown_remaining: u32,
    /// Box of the raider the last time it was observed
    pub last_known_bbox: Option<Rect>,
    /// Number of identity substitutions made by recovery
    pub raider_switches: u32,
    /// Deepest observed distance of the raider from the midline, in pixels
    pub max_penetration_px: f64,
}

impl ActiveRaid {
    pub(crate) fn new(
        raid_number: u32,
        raider_id: TrackId,
        raider_home_side: Side,
        start_frame: u64,
        bbox: Rect,
        distance: f64,
    ) -> Self {
        Self {
            raid_number,
            raider_id,
            initial_raider_id: raider_id,
            raider_home_side,
            start_frame,
            missing_frame_count: 0,
            cooldown_remaining: 0,
            last_known_bbox: Some(bbox),
            raider_switches: 0,
            max_penetration_px: distance,
        }
    }

    /// Raider seen this frame.
    pub(crate) fn sighted(&mut self, bbox: Rect, distance: f64) {
        self.missing_frame_count = 0;
        self.last_known_bbox = Some(bbox);
        self.max_penetration_px = self.max_penetration_px.max(distance);
    }

    /// Hand the raid over to a substitute identity.
    pub(crate) fn switch_to(&mut self, id: TrackId, bbox: Rect, cooldown: u32) {
        self.raider_id = id;
        self.missing_frame_count = 0;
        self.cooldown_remaining = cooldown;
        self.last_known_bbox = Some(bbox);
        self.raider_switches += 1;
    }
}

/// The single raid state of one video's processing session.
///
/// `Active` carries the raider identity, home side and start frame together,
/// so they are either all present or all absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RaidState {
    #[default]
    Inactive,
    Active(ActiveRaid),
}

impl RaidState {
    pub fn status(&self) -> RaidStatus {
        match self {
            RaidState::Inactive => RaidStatus::Inactive,
            RaidState::Active(_) => RaidStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RaidState::Active(_))
    }

    /// Active, but the raider was not observed in the latest frame.
    pub fn is_searching(&self) -> bool {
        self.active().is_some_and(|r| r.missing_frame_count > 0)
    }

    pub fn active(&self) -> Option<&ActiveRaid> {
        match self {
            RaidState::Active(raid) => Some(raid),
            RaidState::Inactive => None,
        }
    }

    pub fn raider_id(&self) -> Option<TrackId> {
        self.active().map(|r| r.raider_id)
    }

    pub fn raider_home_side(&self) -> Option<Side> {
        self.active().map(|r| r.raider_home_side)
    }

    pub fn start_frame(&self) -> Option<u64> {
        self.active().map(|r| r.start_frame)
    }

    pub fn missing_frame_count(&self) -> u32 {
        self.active().map_or(0, |r| r.missing_frame_count)
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.active().map_or(0, |r| r.cooldown_remaining)
    }

    pub fn last_known_bbox(&self) -> Option<Rect> {
        self.active().and_then(|r| r.last_known_bbox)
    }
}
