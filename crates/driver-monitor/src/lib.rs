//! Driver monitoring pipeline
//!
//! Single-threaded, frame-synchronous orchestration of the core stages:
//! region isolation → pupil location (with threshold calibration) →
//! geometric ratios → hysteresis update → escalation. One full pass per
//! input frame; no image data survives a pass, only scalar state.
//!
//! The facial-landmark detector and event transport are external
//! collaborators behind the [`LandmarkDetector`] and
//! [`event_sink::EventSink`] boundaries. A frame without a face (or with
//! degenerate regions) is skipped: flags and counters stay frozen and
//! processing resumes on the next frame.

pub mod fps;
pub mod report;

pub use fps::PassTimer;
pub use report::FrameReport;

use condition_monitor::{ConditionEngine, MonitorConfig, MonitorEvent};
use event_sink::{EventRecord, EventSink, LogSink};
use face_metrics::{
    are_eyes_closed, classify_gaze, gaze_ratios, is_mouth_open, mean_eye_aspect_ratio,
    mouth_aspect_ratio, GazeDirection,
};
use face_regions::{isolate, LandmarkSet, Point, Region, RegionKind};
use image::GrayImage;
use pupil_tracking::{locate, Calibration, EyeSide, PupilEstimate};
use tracing::{debug, warn};

/// External facial-landmark detector boundary: an image in, a fixed
/// 68-point topology out, or nothing when no face is found.
pub trait LandmarkDetector {
    fn detect(&mut self, frame: &GrayImage) -> Option<LandmarkSet>;
}

/// The per-frame feature/state engine.
///
/// Owns the calibration and condition state for one session; everything
/// image-shaped is rebuilt each frame from the caller's input.
pub struct FrameMonitor {
    calibration: Calibration,
    engine: ConditionEngine,
    sink: Box<dyn EventSink>,
}

impl FrameMonitor {
    pub fn new(config: MonitorConfig, sink: Box<dyn EventSink>) -> Self {
        Self {
            calibration: Calibration::new(),
            engine: ConditionEngine::new(config),
            sink,
        }
    }

    /// Monitor that reports events to the tracing log
    pub fn with_log_sink(config: MonitorConfig) -> Self {
        Self::new(config, Box::new(LogSink))
    }

    /// Feed in the frame rate measured around the previous pass
    pub fn update_fps(&mut self, fps: f64) {
        self.engine.update_fps(fps);
    }

    pub fn fps(&self) -> f64 {
        self.engine.fps()
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Run one full pass over a frame and its (possibly absent) landmarks.
    pub fn process_frame(
        &mut self,
        frame: &GrayImage,
        landmarks: Option<&LandmarkSet>,
    ) -> FrameReport {
        let Some(landmarks) = landmarks else {
            debug!("no landmarks this frame; state frozen");
            return self.skipped_report();
        };

        let (left_eye, right_eye, mouth) = match self.isolate_regions(frame, landmarks) {
            Some(regions) => regions,
            None => return self.skipped_report(),
        };

        let left_pupil = self.track_pupil(&left_eye, EyeSide::Left);
        let right_pupil = self.track_pupil(&right_eye, EyeSide::Right);

        let (ratios, gaze) = match (left_pupil, right_pupil) {
            (Some(left), Some(right)) => {
                let ratios = gaze_ratios(left, right, left_eye.center, right_eye.center);
                (Some(ratios), Some(classify_gaze(ratios.horizontal)))
            }
            _ => (None, None),
        };

        let mouth_ratio = mouth_aspect_ratio(&mouth);
        let eye_ratio = mean_eye_aspect_ratio(&left_eye, &right_eye);

        // Lost pupils count as distracted: the gaze is not known to be
        // centered.
        let distracted = gaze != Some(GazeDirection::Center);
        let yawning = is_mouth_open(mouth_ratio);
        let eyes_closed = are_eyes_closed(eye_ratio);

        let events = self.engine.observe(distracted, yawning, eyes_closed);
        self.emit(&events);

        FrameReport {
            face_detected: true,
            gaze,
            gaze_ratios: ratios,
            mouth_ratio: Some(mouth_ratio),
            eye_ratio: Some(eye_ratio),
            left_pupil: left_pupil.map(|p| full_frame_coords(&left_eye, p)),
            right_pupil: right_pupil.map(|p| full_frame_coords(&right_eye, p)),
            snapshot: self.engine.snapshot(),
            events,
        }
    }

    fn isolate_regions(
        &self,
        frame: &GrayImage,
        landmarks: &LandmarkSet,
    ) -> Option<(Region, Region, Region)> {
        let mut regions = [RegionKind::LeftEye, RegionKind::RightEye, RegionKind::Mouth]
            .into_iter()
            .map(|kind| match isolate(frame, landmarks, kind) {
                Ok(region) => Some(region),
                Err(e) => {
                    warn!(error = %e, "region isolation failed; frame skipped");
                    None
                }
            });
        Some((regions.next()??, regions.next()??, regions.next()??))
    }

    fn track_pupil(&mut self, eye: &Region, side: EyeSide) -> Option<PupilEstimate> {
        if !self.calibration.is_side_complete(side) {
            self.calibration.evaluate(&eye.frame, side);
        }
        let threshold = self.calibration.threshold(side);
        locate(&eye.frame, threshold)
    }

    /// Report for a frame with no usable face: prior flags untouched.
    fn skipped_report(&self) -> FrameReport {
        FrameReport {
            face_detected: false,
            gaze: None,
            gaze_ratios: None,
            mouth_ratio: None,
            eye_ratio: None,
            left_pupil: None,
            right_pupil: None,
            snapshot: self.engine.snapshot(),
            events: Vec::new(),
        }
    }

    /// Emit the records the interface contract names: flagged-condition
    /// endings (with duration) and alarm raises (duration null). Raises and
    /// alarm clears stay in the report for display collaborators.
    fn emit(&self, events: &[MonitorEvent]) {
        for event in events {
            match event {
                MonitorEvent::ConditionCleared { condition, held_s } => {
                    self.sink
                        .emit(EventRecord::new(condition.name(), Some(*held_s)));
                }
                MonitorEvent::AlarmRaised { alarm } => {
                    self.sink.emit(EventRecord::new(alarm.name(), None));
                }
                MonitorEvent::ConditionRaised { .. } | MonitorEvent::AlarmCleared { .. } => {}
            }
        }
    }
}

fn full_frame_coords(eye: &Region, pupil: PupilEstimate) -> Point {
    Point::new(eye.origin.0 as f32 + pupil.x, eye.origin.1 as f32 + pupil.y)
}
