//! Region isolation: masked, cropped sub-images for eyes and mouth

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as PolygonPoint;

use crate::landmarks::{LandmarkSet, Point};
use crate::RegionError;

/// Crop expansion around the region bounding box, pixels per side
pub const CROP_MARGIN: u32 = 5;

/// Mask fill for pixels outside the region polygon. Maximum intensity so
/// the surround reads as background under dark-pixel binarization.
const SURROUND_INTENSITY: u8 = 255;

const LEFT_EYE_POINTS: [usize; 6] = [36, 37, 38, 39, 40, 41];
const RIGHT_EYE_POINTS: [usize; 6] = [42, 43, 44, 45, 46, 47];
const MOUTH_POINTS: [usize; 12] = [48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59];

/// Named anatomical region of the 68-point topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    LeftEye,
    RightEye,
    Mouth,
}

impl RegionKind {
    /// Topology indices of the region's ordered boundary points
    pub fn landmark_indices(&self) -> &'static [usize] {
        match self {
            RegionKind::LeftEye => &LEFT_EYE_POINTS,
            RegionKind::RightEye => &RIGHT_EYE_POINTS,
            RegionKind::Mouth => &MOUTH_POINTS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::LeftEye => "left_eye",
            RegionKind::RightEye => "right_eye",
            RegionKind::Mouth => "mouth",
        }
    }
}

/// Isolated region: cropped sub-image plus placement metadata.
///
/// Owned exclusively by one frame's processing pass and discarded with it.
#[derive(Debug, Clone)]
pub struct Region {
    /// Cropped sub-image; pixels outside the boundary polygon are white
    pub frame: GrayImage,
    /// Crop top-left in full-frame coordinates
    pub origin: (u32, u32),
    /// Crop half-extents, sub-image relative
    pub center: (f32, f32),
    /// Ordered boundary points in full-frame coordinates
    pub points: Vec<Point>,
}

/// Cut the given region out of a full grayscale frame.
///
/// Builds the boundary polygon from the region's landmark indices, blanks
/// everything outside it, and crops to the polygon's bounding box expanded
/// by [`CROP_MARGIN`] per side (clamped to the frame).
pub fn isolate(
    frame: &GrayImage,
    landmarks: &LandmarkSet,
    kind: RegionKind,
) -> Result<Region, RegionError> {
    let points: Vec<Point> = kind
        .landmark_indices()
        .iter()
        .map(|&i| landmarks.point(i))
        .collect();

    let polygon: Vec<PolygonPoint<i32>> = points
        .iter()
        .map(|p| PolygonPoint::new(p.x.round() as i32, p.y.round() as i32))
        .collect();

    // A detector emitting coincident boundary points would make the polygon
    // fill panic; treat it as the degenerate geometry it is.
    if polygon.first() == polygon.last() {
        return Err(RegionError::DegenerateCrop { region: kind.name() });
    }

    let mut mask = GrayImage::new(frame.width(), frame.height());
    draw_polygon_mut(&mut mask, &polygon, Luma([255u8]));

    let min_x = points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
    let max_x = points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

    let x0 = (min_x.floor() as i64 - CROP_MARGIN as i64).max(0) as u32;
    let y0 = (min_y.floor() as i64 - CROP_MARGIN as i64).max(0) as u32;
    let x1 = ((max_x.ceil() as i64 + CROP_MARGIN as i64).max(0) as u32).min(frame.width());
    let y1 = ((max_y.ceil() as i64 + CROP_MARGIN as i64).max(0) as u32).min(frame.height());

    if x1 <= x0 || y1 <= y0 {
        return Err(RegionError::DegenerateCrop { region: kind.name() });
    }

    let (width, height) = (x1 - x0, y1 - y0);
    let mut crop = GrayImage::from_pixel(width, height, Luma([SURROUND_INTENSITY]));
    for y in y0..y1 {
        for x in x0..x1 {
            if mask.get_pixel(x, y)[0] != 0 {
                crop.put_pixel(x - x0, y - y0, *frame.get_pixel(x, y));
            }
        }
    }

    Ok(Region {
        frame: crop,
        origin: (x0, y0),
        center: (width as f32 / 2.0, height as f32 / 2.0),
        points,
    })
}
