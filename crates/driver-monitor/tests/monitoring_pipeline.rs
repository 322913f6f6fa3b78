//! End-to-end pipeline scenario on synthetic frames
//!
//! Builds grayscale frames with hand-placed eye/mouth polygons and dark
//! pupil blocks, drives the monitor through calibration, an eyes-closed
//! episode with sleep escalation, and a yawn episode, and checks the flags,
//! durations, and emitted records along the way.

use std::collections::VecDeque;

use condition_monitor::{Alarm, Condition, MonitorConfig, MonitorEvent};
use driver_monitor::{FrameMonitor, LandmarkDetector};
use event_sink::ChannelSink;
use face_metrics::GazeDirection;
use face_regions::{LandmarkSet, Point};
use image::{GrayImage, Luma};

const EPS: f64 = 1e-6;

fn landmarks(assignments: &[(usize, (f32, f32))]) -> LandmarkSet {
    let mut points = vec![Point::new(0.0, 0.0); 68];
    for &(i, (x, y)) in assignments {
        points[i] = Point::new(x, y);
    }
    LandmarkSet::from_points(points).unwrap()
}

/// Eyes open, gaze center, mouth closed
fn baseline_landmarks() -> LandmarkSet {
    landmarks(&[
        // Left eye hexagon, x 40..80, y 80..100
        (36, (40.0, 90.0)),
        (37, (50.0, 80.0)),
        (38, (70.0, 80.0)),
        (39, (80.0, 90.0)),
        (40, (70.0, 100.0)),
        (41, (50.0, 100.0)),
        // Right eye hexagon, shifted +80 in x
        (42, (120.0, 90.0)),
        (43, (130.0, 80.0)),
        (44, (150.0, 80.0)),
        (45, (160.0, 90.0)),
        (46, (150.0, 100.0)),
        (47, (130.0, 100.0)),
        // Mouth: width 40, height 10 -> ratio 4.0, closed
        (48, (80.0, 150.0)),
        (49, (85.0, 146.0)),
        (50, (92.0, 145.0)),
        (51, (100.0, 145.0)),
        (52, (108.0, 145.0)),
        (53, (115.0, 146.0)),
        (54, (120.0, 150.0)),
        (55, (115.0, 154.0)),
        (56, (108.0, 155.0)),
        (57, (100.0, 155.0)),
        (58, (92.0, 155.0)),
        (59, (85.0, 154.0)),
    ])
}

/// Flat eye polygons: width 40, height 4 -> mean ratio 10, closed
fn eyes_closed_landmarks() -> LandmarkSet {
    let base = baseline_landmarks();
    let mut points: Vec<Point> = base.points().to_vec();
    for (i, &(x, y)) in [
        (40.0, 90.0),
        (50.0, 88.0),
        (70.0, 88.0),
        (80.0, 90.0),
        (70.0, 92.0),
        (50.0, 92.0),
    ]
    .iter()
    .enumerate()
    {
        points[36 + i] = Point::new(x, y);
        points[42 + i] = Point::new(x + 80.0, y);
    }
    LandmarkSet::from_points(points).unwrap()
}

/// Mouth opened to height 24 -> ratio 1.67, yawning
fn yawn_landmarks() -> LandmarkSet {
    let base = baseline_landmarks();
    let mut points: Vec<Point> = base.points().to_vec();
    for (i, &(x, y)) in [
        (80.0, 150.0),
        (85.0, 141.0),
        (92.0, 139.0),
        (100.0, 138.0),
        (108.0, 139.0),
        (115.0, 141.0),
        (120.0, 150.0),
        (115.0, 159.0),
        (108.0, 161.0),
        (100.0, 162.0),
        (92.0, 161.0),
        (85.0, 159.0),
    ]
    .iter()
    .enumerate()
    {
        points[48 + i] = Point::new(x, y);
    }
    LandmarkSet::from_points(points).unwrap()
}

fn dark_block(frame: &mut GrayImage, x0: u32, y0: u32) {
    for y in y0..y0 + 6 {
        for x in x0..x0 + 6 {
            frame.put_pixel(x, y, Luma([10u8]));
        }
    }
}

/// Light frame with a 6x6 dark pupil block centered in each eye
fn baseline_frame() -> GrayImage {
    let mut frame = GrayImage::from_pixel(200, 200, Luma([200u8]));
    dark_block(&mut frame, 57, 87);
    dark_block(&mut frame, 137, 87);
    frame
}

/// Light frame with no pupil blocks (eyes closed: pupils not locatable)
fn blank_frame() -> GrayImage {
    GrayImage::from_pixel(200, 200, Luma([200u8]))
}

struct ScriptedDetector {
    script: VecDeque<Option<LandmarkSet>>,
}

impl LandmarkDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &GrayImage) -> Option<LandmarkSet> {
        self.script.pop_front().flatten()
    }
}

#[test]
fn test_baseline_frames_calibrate_and_classify_center() {
    let (sink, mut rx) = ChannelSink::new();
    let mut monitor = FrameMonitor::new(MonitorConfig::default(), Box::new(sink));
    monitor.update_fps(10.0);

    let frame = baseline_frame();
    let landmarks = baseline_landmarks();

    let mut last = None;
    for _ in 0..25 {
        last = Some(monitor.process_frame(&frame, Some(&landmarks)));
    }
    let report = last.unwrap();

    assert!(monitor.calibration().is_complete());
    assert!(report.face_detected);
    assert_eq!(report.gaze, Some(GazeDirection::Center));
    assert_eq!(report.gaze_label(), "looking center");
    assert_eq!(report.mouth_label(), "mouth closed");
    assert_eq!(report.eyes_label(), "eyes open");

    // Pupil reported in full-frame coordinates: crop origin + centroid
    let left = report.left_pupil.unwrap();
    assert!((left.x - 59.5).abs() < 1e-3);
    assert!((left.y - 89.5).abs() < 1e-3);

    // Gaze centered the whole time: distraction never accumulates, the
    // no-blink counter does
    let snapshot = report.snapshot;
    assert_eq!(snapshot.distraction.elapsed_s, 0.0);
    assert!(!snapshot.distraction.flag);
    assert!((snapshot.no_blink.elapsed_s - 2.5).abs() < EPS);
    assert!(!snapshot.no_blink.flag);

    assert!(rx.try_recv().is_err(), "no records expected yet");
}

#[test]
fn test_eyes_closed_episode_escalates_to_sleep_and_reports_on_release() {
    let (sink, mut rx) = ChannelSink::new();
    let mut monitor = FrameMonitor::new(MonitorConfig::default(), Box::new(sink));
    monitor.update_fps(10.0);

    let open_frame = baseline_frame();
    let open_landmarks = baseline_landmarks();
    for _ in 0..25 {
        monitor.process_frame(&open_frame, Some(&open_landmarks));
    }

    // 60 frames (6.0s) of closed eyes; pupils vanish too, so distraction
    // accumulates alongside
    let closed_frame = blank_frame();
    let closed_landmarks = eyes_closed_landmarks();
    let mut sleep_raises = 0;
    for _ in 0..60 {
        let report = monitor.process_frame(&closed_frame, Some(&closed_landmarks));
        assert_eq!(report.gaze, None);
        sleep_raises += report
            .events
            .iter()
            .filter(|e| matches!(e, MonitorEvent::AlarmRaised { alarm: Alarm::Sleeping }))
            .count();
    }
    assert_eq!(sleep_raises, 1, "sleep alarm latches once per episode");

    let snapshot = monitor.process_frame(&closed_frame, Some(&closed_landmarks)).snapshot;
    assert!(snapshot.eyes_closed.flag);
    assert!(snapshot.distraction.flag);
    assert!(snapshot.sleeping);
    assert_eq!(snapshot.no_blink.elapsed_s, 0.0, "no-blink suppressed while closed");

    // The sleep raise was the only record so far
    let record = rx.try_recv().unwrap();
    assert_eq!(record.kind, "sleeping");
    assert_eq!(record.duration_s, None);
    assert!(rx.try_recv().is_err());

    // Eyes open again: both flagged conditions clear with their durations
    let report = monitor.process_frame(&open_frame, Some(&open_landmarks));
    let held = |events: &[MonitorEvent], wanted: Condition| {
        events.iter().find_map(|e| match e {
            MonitorEvent::ConditionCleared { condition, held_s } if *condition == wanted => {
                Some(*held_s)
            }
            _ => None,
        })
    };
    assert!((held(&report.events, Condition::EyesClosed).unwrap() - 6.1).abs() < EPS);
    assert!((held(&report.events, Condition::Distraction).unwrap() - 6.1).abs() < EPS);
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, MonitorEvent::AlarmCleared { alarm: Alarm::Sleeping })));
    assert!(!report.snapshot.sleeping);

    let mut cleared_kinds: Vec<String> = Vec::new();
    while let Ok(record) = rx.try_recv() {
        assert!((record.duration_s.unwrap() - 6.1).abs() < EPS);
        cleared_kinds.push(record.kind);
    }
    cleared_kinds.sort();
    assert_eq!(cleared_kinds, ["distraction", "eyes_closed"]);
}

#[test]
fn test_yawn_flag_after_sustained_open_mouth() {
    let mut monitor = FrameMonitor::with_log_sink(MonitorConfig::default());
    monitor.update_fps(10.0);

    let frame = baseline_frame();
    let yawn = yawn_landmarks();

    let mut last = None;
    for _ in 0..30 {
        last = Some(monitor.process_frame(&frame, Some(&yawn)));
    }
    let report = last.unwrap();
    assert_eq!(report.mouth_label(), "mouth open");
    assert!(report.snapshot.yawning.flag);
    assert!((report.snapshot.yawning.elapsed_s - 3.0).abs() < EPS);
}

#[test]
fn test_missing_landmarks_freeze_state() {
    let mut detector = ScriptedDetector {
        script: VecDeque::from(vec![
            Some(baseline_landmarks()),
            Some(baseline_landmarks()),
            None,
        ]),
    };
    let mut monitor = FrameMonitor::with_log_sink(MonitorConfig::default());
    monitor.update_fps(10.0);
    let frame = baseline_frame();

    for _ in 0..2 {
        let landmarks = detector.detect(&frame);
        let report = monitor.process_frame(&frame, landmarks.as_ref());
        assert!(report.face_detected);
    }
    let before = monitor.process_frame(&frame, Some(&baseline_landmarks())).snapshot;

    let landmarks = detector.detect(&frame);
    assert!(landmarks.is_none());
    let report = monitor.process_frame(&frame, landmarks.as_ref());

    assert!(!report.face_detected);
    assert_eq!(report.gaze_label(), "pupils not located");
    assert_eq!(report.events, Vec::new());
    // Counters exactly as they were: a bad frame never contaminates state
    assert_eq!(report.snapshot, before);
}
