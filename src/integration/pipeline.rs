//! RaidPipeline for combining upstream tracking with raid detection.

use crate::error::RaidError;
use crate::raid::{Midline, RaidConfig, RaidEvent, RaidReport, RaidTracker};

use super::{IntoObservations, TrackSource};

/// Bundles a tracking backend with a [`RaidTracker`] for one video.
///
/// Frames are numbered from 1 in the order they are passed to
/// [`RaidPipeline::process_frame`].
pub struct RaidPipeline<S: TrackSource> {
    source: S,
    tracker: RaidTracker,
    frame_index: u64,
}

impl<S: TrackSource> RaidPipeline<S> {
    /// Create a pipeline for a video calibrated with `midline`.
    pub fn new(source: S, midline: Midline, config: RaidConfig) -> Result<Self, RaidError> {
        Ok(Self {
            source,
            tracker: RaidTracker::new(midline, config)?,
            frame_index: 0,
        })
    }

    /// Create a pipeline with the default raid thresholds.
    pub fn with_default_config(source: S, midline: Midline) -> Result<Self, RaidError> {
        Self::new(source, midline, RaidConfig::default())
    }

    /// Track one frame and advance the raid state.
    ///
    /// Returns the raid transition in this frame, if any, or the tracking
    /// backend's error. A failed frame still consumes a frame number.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Option<RaidEvent>, S::Error> {
        self.frame_index += 1;
        let boxes = self.source.track(input, width, height)?;
        let observations = boxes.into_observations(self.frame_index);
        Ok(self.tracker.update(self.frame_index, &observations))
    }

    /// Number of the most recently processed frame (0 before the first).
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn tracker(&self) -> &RaidTracker {
        &self.tracker
    }

    /// Stop processing and return the session's events and raid summaries.
    pub fn finish(self) -> RaidReport {
        self.tracker.finish()
    }
}
