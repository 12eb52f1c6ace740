//! Builder for creating Observation objects from various box formats.

use crate::raid::{Observation, Rect, TrackId};

/// Builder for creating `Observation` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct ObservationBuilder {
    identity: u64,
    frame_index: u64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl ObservationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tracker-assigned identity.
    pub fn identity(mut self, id: u64) -> Self {
        self.identity = id;
        self
    }

    /// Set the frame the observation belongs to.
    pub fn frame(mut self, frame_index: u64) -> Self {
        self.frame_index = frame_index;
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f64, cy: f64, w: f64, h: f64) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: f64, t: f64, w: f64, h: f64) -> Self {
        self.x1 = l;
        self.y1 = t;
        self.x2 = l + w;
        self.y2 = t + h;
        self
    }

    pub fn build(self) -> Observation {
        Observation::new(
            TrackId(self.identity),
            Rect::from_tlbr(self.x1, self.y1, self.x2, self.y2),
            self.frame_index,
        )
    }
}
