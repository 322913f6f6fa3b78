//! Pupil localization within an isolated eye sub-image

use std::collections::HashMap;

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use serde::{Deserialize, Serialize};

/// Smallest connected component accepted as a pupil, in pixels.
/// Rejects single-pixel noise while keeping genuinely small pupils.
pub const MIN_BLOB_AREA: u64 = 4;

/// Estimated pupil position in eye-sub-image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PupilEstimate {
    pub x: f32,
    pub y: f32,
}

/// Binarize the eye sub-image: intensities below the threshold (the dark
/// iris/pupil cluster) become foreground.
fn binarize(eye: &GrayImage, threshold: u8) -> GrayImage {
    let mut binary = GrayImage::new(eye.width(), eye.height());
    for (x, y, pixel) in eye.enumerate_pixels() {
        if pixel[0] < threshold {
            binary.put_pixel(x, y, Luma([255u8]));
        }
    }
    binary
}

/// Locate the pupil in an eye sub-image using the given binarization
/// threshold.
///
/// Returns the centroid of the largest 8-connected foreground component, or
/// `None` when no component of plausible size exists. A zero-area component
/// can never reach the division (the area gate runs first).
pub fn locate(eye: &GrayImage, threshold: u8) -> Option<PupilEstimate> {
    let binary = binarize(eye, threshold);
    let labels = connected_components(&binary, Connectivity::Eight, Luma([0u8]));

    // (pixel count, x sum, y sum) per component label
    let mut components: HashMap<u32, (u64, u64, u64)> = HashMap::new();
    for (x, y, label) in labels.enumerate_pixels() {
        if label[0] != 0 {
            let entry = components.entry(label[0]).or_insert((0, 0, 0));
            entry.0 += 1;
            entry.1 += x as u64;
            entry.2 += y as u64;
        }
    }

    let (area, x_sum, y_sum) = components.values().max_by_key(|(area, _, _)| *area)?;
    if *area < MIN_BLOB_AREA {
        return None;
    }

    Some(PupilEstimate {
        x: *x_sum as f32 / *area as f32,
        y: *y_sum as f32 / *area as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye_with_block(x0: u32, y0: u32, side: u32, intensity: u8) -> GrayImage {
        let mut eye = GrayImage::from_pixel(50, 30, Luma([200u8]));
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                eye.put_pixel(x, y, Luma([intensity]));
            }
        }
        eye
    }

    #[test]
    fn test_locates_dark_block_centroid() {
        let eye = eye_with_block(20, 10, 6, 10);
        let pupil = locate(&eye, 50).unwrap();
        assert_eq!(pupil.x, 22.5);
        assert_eq!(pupil.y, 12.5);
    }

    #[test]
    fn test_uniform_image_has_no_pupil() {
        let eye = GrayImage::from_pixel(50, 30, Luma([200u8]));
        assert!(locate(&eye, 50).is_none());
    }

    #[test]
    fn test_rejects_implausibly_small_blob() {
        let eye = eye_with_block(20, 10, 1, 10);
        assert!(locate(&eye, 50).is_none());
    }

    #[test]
    fn test_picks_largest_of_several_blobs() {
        let mut eye = eye_with_block(5, 5, 3, 10);
        for y in 20..26 {
            for x in 30..36 {
                eye.put_pixel(x, y, Luma([10u8]));
            }
        }
        let pupil = locate(&eye, 50).unwrap();
        assert_eq!(pupil.x, 32.5);
        assert_eq!(pupil.y, 22.5);
    }

    #[test]
    fn test_threshold_is_exclusive_upper_bound() {
        // Pixels exactly at the threshold stay background
        let eye = eye_with_block(20, 10, 6, 50);
        assert!(locate(&eye, 50).is_none());
        assert!(locate(&eye, 51).is_some());
    }
}
