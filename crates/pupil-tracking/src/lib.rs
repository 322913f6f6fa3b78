//! Pupil tracking
//!
//! Classical (non-learned) pupil localization: binarize the eye sub-image
//! with a per-eye threshold and take the centroid of the largest dark
//! connected component. The threshold itself is discovered at session start
//! by [`Calibration`], which averages the best candidate over a fixed number
//! of frames to amortize lighting noise.

pub mod calibration;
pub mod pupil;

pub use calibration::{Calibration, EyeSide, CALIBRATION_FRAMES, DEFAULT_THRESHOLD};
pub use pupil::{locate, PupilEstimate, MIN_BLOB_AREA};
