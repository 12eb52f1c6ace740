//! Substitute selection for a raider whose track identity was lost.
//!
//! Upstream trackers frequently drop or reassign identities when players
//! overlap. While a raid is active and the raider has been missing long enough,
//! the player off the raider's home side that is closest to the midline is
//! taken over as the raider, provided it lies within the distance cap.

use super::geometry::{Midline, Side};
use super::raid_tracker::{Observation, TrackId};
use super::rect::Rect;

/// A substitute raider chosen from the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryCandidate {
    pub identity: TrackId,
    pub bbox: Rect,
    /// Distance of the candidate's box center from the midline, in pixels
    pub distance: f64,
}

/// Pick a substitute raider from `observations`.
///
/// Only observations off `raider_home_side` qualify. Among those strictly
/// closer than `distance_cap` to the midline the closest wins; on equal
/// distance the one reported first by the tracker is kept.
pub fn attempt_recovery(
    observations: &[Observation],
    midline: &Midline,
    raider_home_side: Side,
    distance_cap: f64,
) -> Option<RecoveryCandidate> {
    let mut best: Option<RecoveryCandidate> = None;
    for obs in observations {
        let center = obs.bbox.center();
        if midline.side_of(center) == raider_home_side {
            continue;
        }
        let distance = midline.distance_to(center);
        if distance >= distance_cap {
            continue;
        }
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(RecoveryCandidate {
                identity: obs.identity,
                bbox: obs.bbox,
                distance,
            });
        }
    }
    best
}
