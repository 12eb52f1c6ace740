//! Integration module for feeding upstream detector/tracker output into raid detection.
//!
//! The tracker that assigns identities to players is external. This module
//! provides the trait it implements and a pipeline that numbers frames and
//! forwards each frame's tracked boxes to a [`RaidTracker`](crate::RaidTracker).

mod builder;
mod pipeline;
mod source;

pub use builder::ObservationBuilder;
pub use pipeline::RaidPipeline;
pub use source::{IntoObservations, TrackSource, TrackedBox};
