//! Side-of-line classification and point-to-line distance against the midline.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::RaidError;

/// Which side of the oriented midline a point falls on.
///
/// The sign is that of the 2D cross product `(p2 - p1) x (point - p1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Positive,
    Negative,
    /// Exactly on the line.
    OnLine,
}

impl Side {
    fn from_cross(cross: f64) -> Self {
        if cross > 0.0 {
            Side::Positive
        } else if cross < 0.0 {
            Side::Negative
        } else {
            Side::OnLine
        }
    }
}

/// Classify `point` against the line through `p1` and `p2`.
///
/// Callers must ensure `p1 != p2`; a degenerate line classifies everything as
/// [`Side::OnLine`].
pub fn side_of(p1: Point2<f64>, p2: Point2<f64>, point: Point2<f64>) -> Side {
    let cross = (p2 - p1).perp(&(point - p1));
    Side::from_cross(cross)
}

/// Perpendicular distance from `point` to the line through `p1` and `p2`.
///
/// Uses the implicit form `A*x + B*y + C = 0` of the line.
pub fn distance_to_line(
    p1: Point2<f64>,
    p2: Point2<f64>,
    point: Point2<f64>,
) -> Result<f64, RaidError> {
    let a = p2.y - p1.y;
    let b = p1.x - p2.x;
    let c = p2.x * p1.y - p1.x * p2.y;
    let norm = a.hypot(b);
    if norm == 0.0 {
        return Err(RaidError::DegenerateLine { x: p1.x, y: p1.y });
    }
    Ok((a * point.x + b * point.y + c).abs() / norm)
}

/// The fixed reference line splitting the court, in image coordinates.
///
/// Construction rejects coincident endpoints, so the query methods are total.
/// Serialized as `{"p1": [x, y], "p2": [x, y]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MidlinePoints", into = "MidlinePoints")]
pub struct Midline {
    p1: Point2<f64>,
    p2: Point2<f64>,
}

#[derive(Serialize, Deserialize)]
struct MidlinePoints {
    p1: [f64; 2],
    p2: [f64; 2],
}

impl TryFrom<MidlinePoints> for Midline {
    type Error = RaidError;

    fn try_from(points: MidlinePoints) -> Result<Self, Self::Error> {
        Midline::new(
            Point2::new(points.p1[0], points.p1[1]),
            Point2::new(points.p2[0], points.p2[1]),
        )
    }
}

impl From<Midline> for MidlinePoints {
    fn from(midline: Midline) -> Self {
        MidlinePoints {
            p1: [midline.p1.x, midline.p1.y],
            p2: [midline.p2.x, midline.p2.y],
        }
    }
}

impl Midline {
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> Result<Self, RaidError> {
        if p1 == p2 {
            return Err(RaidError::DegenerateLine { x: p1.x, y: p1.y });
        }
        Ok(Self { p1, p2 })
    }

    /// Shorthand for `Midline::new` from raw coordinates.
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, RaidError> {
        Self::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    /// Load a calibrated midline from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, RaidError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn p1(&self) -> Point2<f64> {
        self.p1
    }

    pub fn p2(&self) -> Point2<f64> {
        self.p2
    }

    pub fn side_of(&self, point: Point2<f64>) -> Side {
        side_of(self.p1, self.p2, point)
    }

    pub fn distance_to(&self, point: Point2<f64>) -> f64 {
        // p1 != p2 holds by construction
        distance_to_line(self.p1, self.p2, point).unwrap_or(0.0)
    }
}
