//! Per-eye binarization threshold calibration
//!
//! Single-shot thresholding is unreliable under varying ambient light, so
//! the first frames of a session are used to search a fixed candidate list
//! for the threshold whose dark-pixel fraction best matches a typical iris.
//! Once a side has seen [`CALIBRATION_FRAMES`] frames it freezes for the
//! rest of the session; there is no drift correction.

use image::GrayImage;
use tracing::{debug, info};

/// Frames evaluated per eye before calibration freezes
pub const CALIBRATION_FRAMES: usize = 20;

/// Threshold used before any frame has been evaluated
pub const DEFAULT_THRESHOLD: u8 = 50;

/// Fraction of a trimmed eye crop a well-segmented iris covers
const TARGET_FOREGROUND_FRACTION: f32 = 0.48;

/// Candidate thresholds: 5, 10, ..., 95
const CANDIDATE_MIN: u8 = 5;
const CANDIDATE_MAX: u8 = 95;
const CANDIDATE_STEP: u8 = 5;

/// Border trimmed off the eye crop before measuring the dark fraction,
/// matching the crop margin added by region isolation.
const TRIM: u32 = 5;

/// Which eye a measurement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    pub fn name(&self) -> &'static str {
        match self {
            EyeSide::Left => "left",
            EyeSide::Right => "right",
        }
    }
}

#[derive(Debug, Default)]
struct SideCalibration {
    /// Best candidate threshold from each evaluated frame
    samples: Vec<u8>,
    /// Mean of samples, frozen at completion
    chosen: Option<u8>,
}

impl SideCalibration {
    fn mean_sample(&self) -> Option<u8> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: u32 = self.samples.iter().map(|&s| s as u32).sum();
        Some((sum as f32 / self.samples.len() as f32).round() as u8)
    }

    fn threshold(&self) -> u8 {
        self.chosen
            .or_else(|| self.mean_sample())
            .unwrap_or(DEFAULT_THRESHOLD)
    }

    fn is_complete(&self) -> bool {
        self.chosen.is_some()
    }
}

/// Session-long threshold calibration state, both eyes tracked
/// independently. Created once at startup; never resets.
#[derive(Debug, Default)]
pub struct Calibration {
    left: SideCalibration,
    right: SideCalibration,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, side: EyeSide) -> &SideCalibration {
        match side {
            EyeSide::Left => &self.left,
            EyeSide::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: EyeSide) -> &mut SideCalibration {
        match side {
            EyeSide::Left => &mut self.left,
            EyeSide::Right => &mut self.right,
        }
    }

    /// Ingest one frame's eye sub-image. No-op once the side is complete.
    pub fn evaluate(&mut self, eye: &GrayImage, side: EyeSide) {
        let calibration = self.side_mut(side);
        if calibration.is_complete() {
            return;
        }

        let best = best_candidate(eye);
        calibration.samples.push(best);
        debug!(
            side = side.name(),
            candidate = best,
            frames = calibration.samples.len(),
            "calibration sample"
        );

        if calibration.samples.len() >= CALIBRATION_FRAMES {
            calibration.chosen = calibration.mean_sample();
            info!(
                side = side.name(),
                threshold = calibration.threshold(),
                "eye threshold calibration complete"
            );
        }
    }

    /// Best threshold for a side: the frozen value once complete, a
    /// best-so-far mean before that, [`DEFAULT_THRESHOLD`] when nothing has
    /// been evaluated yet.
    pub fn threshold(&self, side: EyeSide) -> u8 {
        self.side(side).threshold()
    }

    pub fn frames_evaluated(&self, side: EyeSide) -> usize {
        self.side(side).samples.len()
    }

    pub fn is_side_complete(&self, side: EyeSide) -> bool {
        self.side(side).is_complete()
    }

    /// True once both sides have frozen
    pub fn is_complete(&self) -> bool {
        self.left.is_complete() && self.right.is_complete()
    }
}

/// Fraction of pixels below the threshold, measured with the crop margin
/// trimmed off. Falls back to the whole image when the crop is too small to
/// trim.
fn foreground_fraction(eye: &GrayImage, threshold: u8) -> f32 {
    let (width, height) = eye.dimensions();
    let (x0, x1, y0, y1) = if width > 2 * TRIM && height > 2 * TRIM {
        (TRIM, width - TRIM, TRIM, height - TRIM)
    } else {
        (0, width, 0, height)
    };

    let total = ((x1 - x0) * (y1 - y0)) as f32;
    if total == 0.0 {
        return 0.0;
    }

    let mut dark = 0u32;
    for y in y0..y1 {
        for x in x0..x1 {
            if eye.get_pixel(x, y)[0] < threshold {
                dark += 1;
            }
        }
    }
    dark as f32 / total
}

/// Candidate whose dark fraction is closest to the iris target for this
/// frame. Ties resolve to the lowest candidate (first minimum).
fn best_candidate(eye: &GrayImage) -> u8 {
    (CANDIDATE_MIN..=CANDIDATE_MAX)
        .step_by(CANDIDATE_STEP as usize)
        .min_by(|&a, &b| {
            let score_a = (foreground_fraction(eye, a) - TARGET_FOREGROUND_FRACTION).abs();
            let score_b = (foreground_fraction(eye, b) - TARGET_FOREGROUND_FRACTION).abs();
            score_a.total_cmp(&score_b)
        })
        .unwrap_or(DEFAULT_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Eye crop whose trimmed interior is `fraction` dark at intensity 40
    fn synthetic_eye(fraction: f32) -> GrayImage {
        let mut eye = GrayImage::from_pixel(50, 30, Luma([200u8]));
        let interior = (50 - 2 * TRIM) * (30 - 2 * TRIM);
        let dark_target = (interior as f32 * fraction) as u32;
        let mut dark = 0;
        'fill: for y in TRIM..30 - TRIM {
            for x in TRIM..50 - TRIM {
                if dark >= dark_target {
                    break 'fill;
                }
                eye.put_pixel(x, y, Luma([40u8]));
                dark += 1;
            }
        }
        eye
    }

    #[test]
    fn test_best_candidate_matches_iris_fraction() {
        // 48% of the interior at intensity 40: every candidate above 40
        // scores a perfect 0; ties resolve to the lowest, 45.
        let eye = synthetic_eye(0.48);
        assert_eq!(best_candidate(&eye), 45);
    }

    #[test]
    fn test_completion_after_fixed_frame_count() {
        let eye = synthetic_eye(0.48);
        let mut calibration = Calibration::new();

        for i in 0..CALIBRATION_FRAMES {
            assert!(!calibration.is_side_complete(EyeSide::Left));
            calibration.evaluate(&eye, EyeSide::Left);
            assert_eq!(calibration.frames_evaluated(EyeSide::Left), i + 1);
        }
        assert!(calibration.is_side_complete(EyeSide::Left));
        assert_eq!(calibration.threshold(EyeSide::Left), 45);
    }

    #[test]
    fn test_sides_complete_independently() {
        let eye = synthetic_eye(0.48);
        let mut calibration = Calibration::new();
        for _ in 0..CALIBRATION_FRAMES {
            calibration.evaluate(&eye, EyeSide::Left);
        }
        assert!(calibration.is_side_complete(EyeSide::Left));
        assert!(!calibration.is_side_complete(EyeSide::Right));
        assert!(!calibration.is_complete());
    }

    #[test]
    fn test_provisional_threshold_before_completion() {
        let mut calibration = Calibration::new();
        assert_eq!(calibration.threshold(EyeSide::Left), DEFAULT_THRESHOLD);

        calibration.evaluate(&synthetic_eye(0.48), EyeSide::Left);
        assert_eq!(calibration.threshold(EyeSide::Left), 45);
    }

    #[test]
    fn test_frozen_after_completion() {
        let mut calibration = Calibration::new();
        for _ in 0..CALIBRATION_FRAMES {
            calibration.evaluate(&synthetic_eye(0.48), EyeSide::Left);
        }
        let frozen = calibration.threshold(EyeSide::Left);

        // Later frames with a very different appearance change nothing
        calibration.evaluate(&synthetic_eye(0.05), EyeSide::Left);
        assert_eq!(calibration.frames_evaluated(EyeSide::Left), CALIBRATION_FRAMES);
        assert_eq!(calibration.threshold(EyeSide::Left), frozen);
    }
}
