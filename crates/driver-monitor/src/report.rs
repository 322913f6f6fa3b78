//! Per-frame pipeline output

use condition_monitor::{MonitorEvent, MonitorSnapshot};
use face_metrics::{are_eyes_closed, is_mouth_open, GazeDirection, GazeRatios};
use face_regions::Point;

/// Everything one pass produced: classification results, state snapshot,
/// and the transitions that happened this frame. Overlay positions and
/// colors are a presentation concern left to display collaborators.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// False when the frame was skipped (no face, degenerate regions)
    pub face_detected: bool,
    /// Gaze class; `None` when the pupils were not located
    pub gaze: Option<GazeDirection>,
    pub gaze_ratios: Option<GazeRatios>,
    /// Mouth aspect ratio; `None` on skipped frames
    pub mouth_ratio: Option<f32>,
    /// Mean eye aspect ratio; `None` on skipped frames
    pub eye_ratio: Option<f32>,
    /// Pupil positions in full-frame coordinates, for annotation
    pub left_pupil: Option<Point>,
    pub right_pupil: Option<Point>,
    /// Condition and alarm state after this frame's update
    pub snapshot: MonitorSnapshot,
    /// Transitions this frame produced
    pub events: Vec<MonitorEvent>,
}

impl FrameReport {
    pub fn gaze_label(&self) -> &'static str {
        match self.gaze {
            Some(GazeDirection::Right) => "looking right",
            Some(GazeDirection::Left) => "looking left",
            Some(GazeDirection::Center) => "looking center",
            None => "pupils not located",
        }
    }

    pub fn mouth_label(&self) -> &'static str {
        match self.mouth_ratio {
            Some(ratio) if is_mouth_open(ratio) => "mouth open",
            Some(_) => "mouth closed",
            None => "mouth not detected",
        }
    }

    pub fn eyes_label(&self) -> &'static str {
        match self.eye_ratio {
            Some(ratio) if are_eyes_closed(ratio) => "eyes closed",
            Some(_) => "eyes open",
            None => "eyes not detected",
        }
    }
}
