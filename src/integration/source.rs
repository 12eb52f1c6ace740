//! Trait for upstream detection + tracking backends.

use crate::raid::{Observation, Rect, TrackId};

/// One tracked player as reported by the upstream tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedBox {
    pub identity: TrackId,
    pub bbox: Rect,
}

impl TrackedBox {
    pub fn new(identity: TrackId, bbox: Rect) -> Self {
        Self { identity, bbox }
    }
}

/// Trait for detector/tracker backends producing identified boxes.
///
/// Implement this trait to drive raid detection from any tracker.
///
/// # Example
///
/// ```ignore
/// use raidtrack_rs::{TrackSource, TrackedBox};
///
/// struct MyTracker {
///     // Your detector and tracker here
/// }
///
/// impl TrackSource for MyTracker {
///     type Error = std::io::Error;
///
///     fn track(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<TrackedBox>, Self::Error> {
///         // Run detection and association, return boxes in tracker order
///         Ok(vec![])
///     }
/// }
/// ```
pub trait TrackSource {
    /// Error type for tracking failures.
    type Error;

    /// Run detection and tracking on one raw frame.
    ///
    /// The returned order is significant: when several players qualify to
    /// start a raid in the same frame, the earliest one is chosen.
    fn track(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<TrackedBox>, Self::Error>;
}

/// Helper trait for converting tracker-specific output to `Observation`s.
pub trait IntoObservations {
    /// Convert the output into observations for frame `frame_index`.
    fn into_observations(self, frame_index: u64) -> Vec<Observation>;
}

impl IntoObservations for Vec<TrackedBox> {
    fn into_observations(self, frame_index: u64) -> Vec<Observation> {
        self.into_iter()
            .map(|t| Observation::new(t.identity, t.bbox, frame_index))
            .collect()
    }
}

impl IntoObservations for Vec<Observation> {
    fn into_observations(self, frame_index: u64) -> Vec<Observation> {
        self.into_iter()
            .map(|o| Observation { frame_index, ..o })
            .collect()
    }
}
