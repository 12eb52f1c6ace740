mod baseline;
mod config;
mod event;
mod geometry;
mod raid_tracker;
mod recovery;
mod rect;
mod state;

pub use baseline::{BaselineRecord, BaselineTracker};
pub use config::RaidConfig;
pub use event::{RaidEvent, RaidEventKind, RaidEventLog, RaidOutcome, RaidSummary};
pub use geometry::{Midline, Side, distance_to_line, side_of};
pub use raid_tracker::{Observation, RaidReport, RaidTracker, TrackId};
pub use recovery::{RecoveryCandidate, attempt_recovery};
pub use rect::Rect;
pub use state::{ActiveRaid, RaidState, RaidStatus};
