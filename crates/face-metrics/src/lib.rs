//! Geometric ratios derived from pupils and region boundary points
//!
//! Pure, deterministic functions: gaze direction ratios from the two pupil
//! estimates, and width/height aspect ratios used as openness/closedness
//! proxies for the mouth and eyes.

pub mod aspect;
pub mod gaze;

pub use aspect::{
    aspect_ratio, are_eyes_closed, eye_aspect_ratio, is_mouth_open, mean_eye_aspect_ratio,
    mouth_aspect_ratio, EYES_CLOSED_MIN_RATIO, EYE_RATIO_FALLBACK, MOUTH_OPEN_MAX_RATIO,
    MOUTH_RATIO_FALLBACK,
};
pub use gaze::{
    classify_gaze, gaze_ratios, GazeDirection, GazeRatios, GAZE_LEFT_MIN_RATIO,
    GAZE_RIGHT_MAX_RATIO,
};
