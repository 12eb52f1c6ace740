//! Raid detection for kabaddi match video.
//!
//! Consumes per-frame tracker output (`(track_id, bbox)` pairs) and a fixed
//! midline, and produces an append-only log of raid start/end events.

pub mod error;
pub mod integration;
pub mod raid;

pub use error::RaidError;
pub use integration::{ObservationBuilder, RaidPipeline, TrackSource, TrackedBox};
pub use raid::{
    Midline, Observation, RaidConfig, RaidEvent, RaidEventKind, RaidEventLog, RaidReport,
    RaidState, RaidStatus, RaidSummary, RaidTracker, Rect, Side, TrackId,
};
