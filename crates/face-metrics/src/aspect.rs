//! Width/height aspect ratios for eye closure and mouth openness

use face_regions::{Point, Region};

/// Mouth aspect ratio when the height is zero. Paired with the open-mouth
/// cutoff below, this classifies degenerate geometry as closed.
pub const MOUTH_RATIO_FALLBACK: f32 = 5.0;

/// Eye aspect ratio when the height is zero
pub const EYE_RATIO_FALLBACK: f32 = 10.0;

/// Mouth counts as open strictly below this ratio
pub const MOUTH_OPEN_MAX_RATIO: f32 = 2.0;

/// Eyes count as closed strictly above this mean ratio
pub const EYES_CLOSED_MIN_RATIO: f32 = 5.0;

// Positions within a region's ordered boundary points
const EYE_LEFT: usize = 0;
const EYE_TOP: usize = 1;
const EYE_RIGHT: usize = 3;
const EYE_BOTTOM: usize = 5;
const MOUTH_LEFT: usize = 0;
const MOUTH_TOP: usize = 3;
const MOUTH_RIGHT: usize = 6;
const MOUTH_BOTTOM: usize = 9;

/// Width/height ratio of four boundary points, with a fixed fallback when
/// the vertical extent is zero. Never divides by zero.
pub fn aspect_ratio(left: Point, right: Point, top: Point, bottom: Point, fallback: f32) -> f32 {
    let width = left.distance(&right);
    let height = top.distance(&bottom);
    if height == 0.0 {
        fallback
    } else {
        width / height
    }
}

/// Aspect ratio of one isolated eye region
pub fn eye_aspect_ratio(eye: &Region) -> f32 {
    aspect_ratio(
        eye.points[EYE_LEFT],
        eye.points[EYE_RIGHT],
        eye.points[EYE_TOP],
        eye.points[EYE_BOTTOM],
        EYE_RATIO_FALLBACK,
    )
}

/// Mean aspect ratio over both eyes, the closure signal used downstream
pub fn mean_eye_aspect_ratio(left_eye: &Region, right_eye: &Region) -> f32 {
    (eye_aspect_ratio(left_eye) + eye_aspect_ratio(right_eye)) / 2.0
}

/// Aspect ratio of the isolated mouth region
pub fn mouth_aspect_ratio(mouth: &Region) -> f32 {
    aspect_ratio(
        mouth.points[MOUTH_LEFT],
        mouth.points[MOUTH_RIGHT],
        mouth.points[MOUTH_TOP],
        mouth.points[MOUTH_BOTTOM],
        MOUTH_RATIO_FALLBACK,
    )
}

pub fn is_mouth_open(mouth_ratio: f32) -> bool {
    mouth_ratio < MOUTH_OPEN_MAX_RATIO
}

pub fn are_eyes_closed(mean_eye_ratio: f32) -> bool {
    mean_eye_ratio > EYES_CLOSED_MIN_RATIO
}
