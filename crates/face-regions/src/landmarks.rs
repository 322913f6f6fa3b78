//! Landmark points and the 68-point face topology

use serde::{Deserialize, Serialize};

use crate::RegionError;

/// Number of points in the Multi-PIE face landmark topology
pub const LANDMARK_COUNT: usize = 68;

/// 2-D landmark point in full-frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One frame's facial landmarks, immutable once built.
///
/// Absence of a face is expressed at the pipeline boundary as
/// `Option<&LandmarkSet>`, never as a partially filled set.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Build a landmark set, rejecting anything but exactly 68 points.
    pub fn from_points(points: Vec<Point>) -> Result<Self, RegionError> {
        if points.len() != LANDMARK_COUNT {
            return Err(RegionError::LandmarkCount {
                expected: LANDMARK_COUNT,
                got: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Point at a topology index. Indices come from the fixed
    /// [`RegionKind`](crate::RegionKind) tables and are always < 68.
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
