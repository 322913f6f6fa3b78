//! Facial region isolation
//!
//! Takes a fixed-topology 68-point landmark set (produced by an external
//! detector) and cuts out the anatomical regions the monitoring pipeline
//! works on:
//! - Left / right eye sub-images for pupil tracking
//! - Mouth sub-image for yawn detection
//!
//! Regions are created fresh for every frame and carry no cross-frame state.

pub mod landmarks;
pub mod region;

pub use landmarks::{LandmarkSet, Point, LANDMARK_COUNT};
pub use region::{isolate, Region, RegionKind, CROP_MARGIN};

use thiserror::Error;

/// Region isolation error types
#[derive(Error, Debug)]
pub enum RegionError {
    #[error("Expected {expected} landmarks, got {got}")]
    LandmarkCount { expected: usize, got: usize },

    #[error("Degenerate crop for {region}: bounding box has no area")]
    DegenerateCrop { region: &'static str },
}
