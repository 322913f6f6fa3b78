//! Gaze direction from pupil positions and eye crop geometry

use pupil_tracking::PupilEstimate;
use serde::{Deserialize, Serialize};

/// Horizontal ratio at or below this means looking right
pub const GAZE_RIGHT_MAX_RATIO: f32 = 0.4;

/// Horizontal ratio at or above this means looking left
pub const GAZE_LEFT_MIN_RATIO: f32 = 0.65;

/// Fixed correction for crop-margin bias in the ratio denominator.
/// Must stay exactly 10 for behavioral compatibility.
const CROP_BIAS_OFFSET: f32 = 10.0;

/// Gaze direction classes. The band between the two cutoffs is center by
/// definition; there is no error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GazeDirection {
    Right,
    Center,
    Left,
}

impl GazeDirection {
    pub fn name(&self) -> &'static str {
        match self {
            GazeDirection::Right => "right",
            GazeDirection::Center => "center",
            GazeDirection::Left => "left",
        }
    }
}

/// Gaze direction ratios, nominally in [0, 1] but not clamped: degenerate
/// eye crops may push them outside and callers must tolerate that.
///
/// Horizontal: 0.0 is extreme right, 0.5 center, 1.0 extreme left.
/// Vertical: 0.0 is extreme top, 1.0 extreme bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeRatios {
    pub horizontal: f32,
    pub vertical: f32,
}

fn axis_ratio(pupil: f32, center: f32) -> f32 {
    pupil / (center * 2.0 - CROP_BIAS_OFFSET)
}

/// Compute gaze ratios from both pupils and both eye crop centers.
/// Both pupils being located is the caller's precondition.
pub fn gaze_ratios(
    left_pupil: PupilEstimate,
    right_pupil: PupilEstimate,
    left_center: (f32, f32),
    right_center: (f32, f32),
) -> GazeRatios {
    GazeRatios {
        horizontal: (axis_ratio(left_pupil.x, left_center.0)
            + axis_ratio(right_pupil.x, right_center.0))
            / 2.0,
        vertical: (axis_ratio(left_pupil.y, left_center.1)
            + axis_ratio(right_pupil.y, right_center.1))
            / 2.0,
    }
}

/// Classify the horizontal gaze ratio. Everything between the two cutoffs,
/// boundaries excluded, is center.
pub fn classify_gaze(horizontal: f32) -> GazeDirection {
    if horizontal <= GAZE_RIGHT_MAX_RATIO {
        GazeDirection::Right
    } else if horizontal >= GAZE_LEFT_MIN_RATIO {
        GazeDirection::Left
    } else {
        GazeDirection::Center
    }
}
