//! Condition and alarm state types

use serde::{Deserialize, Serialize};

/// Monitored conditions, one hysteresis gauge each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Gaze off-center, or pupils not located
    Distraction,
    /// Mouth held open
    Yawning,
    /// Eyes held closed
    EyesClosed,
    /// No closure detected (time since last blink)
    NoBlink,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Distraction,
        Condition::Yawning,
        Condition::EyesClosed,
        Condition::NoBlink,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Condition::Distraction => "distraction",
            Condition::Yawning => "yawning",
            Condition::EyesClosed => "eyes_closed",
            Condition::NoBlink => "no_blink",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Condition::Distraction => 0,
            Condition::Yawning => 1,
            Condition::EyesClosed => 2,
            Condition::NoBlink => 3,
        }
    }
}

/// Escalation alarms derived from sustained primary conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alarm {
    /// Sustained eyes-closed
    Sleeping,
    /// Sustained no-blink
    Unconscious,
}

impl Alarm {
    pub fn name(&self) -> &'static str {
        match self {
            Alarm::Sleeping => "sleeping",
            Alarm::Unconscious => "unconscious",
        }
    }
}

/// One condition's externally visible state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionState {
    /// Debounced flag, raised once the duration threshold is exceeded
    pub flag: bool,
    /// Seconds the predicate has held so far, accumulated via 1/fps ticks
    pub elapsed_s: f64,
}

/// Read-only view of the whole engine, taken once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonitorSnapshot {
    pub distraction: ConditionState,
    pub yawning: ConditionState,
    pub eyes_closed: ConditionState,
    pub no_blink: ConditionState,
    pub sleeping: bool,
    pub unconscious: bool,
}

impl MonitorSnapshot {
    pub fn condition(&self, condition: Condition) -> ConditionState {
        match condition {
            Condition::Distraction => self.distraction,
            Condition::Yawning => self.yawning,
            Condition::EyesClosed => self.eyes_closed,
            Condition::NoBlink => self.no_blink,
        }
    }
}
