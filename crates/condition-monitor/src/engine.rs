//! Hysteresis state engine and escalation latches

use serde::Serialize;
use tracing::{info, warn};

use crate::config::MonitorConfig;
use crate::state::{Alarm, Condition, ConditionState, MonitorSnapshot};

/// Transitions observable from one frame's update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MonitorEvent {
    /// Condition held past its threshold; flag raised
    ConditionRaised { condition: Condition },
    /// A flagged condition ended; carries the full accumulated duration
    ConditionCleared { condition: Condition, held_s: f64 },
    /// Escalation alarm latched
    AlarmRaised { alarm: Alarm },
    /// Escalation alarm released with its primary condition
    AlarmCleared { alarm: Alarm },
}

/// One condition's three-state machine: inactive, accumulating, active.
///
/// The counter grows by 1/fps while the predicate holds and keeps growing
/// after the flag raises; any predicate reversal reports the accumulated
/// value and resets to zero in the same tick.
#[derive(Debug)]
struct HysteresisGauge {
    threshold_s: f64,
    elapsed_s: f64,
    flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GaugeUpdate {
    Unchanged,
    Raised,
    Released { held_s: f64, was_flagged: bool },
}

impl HysteresisGauge {
    fn new(threshold_s: f64) -> Self {
        Self {
            threshold_s,
            elapsed_s: 0.0,
            flag: false,
        }
    }

    fn update(&mut self, active: bool, dt_s: f64) -> GaugeUpdate {
        if active {
            self.elapsed_s += dt_s;
            if !self.flag && self.elapsed_s > self.threshold_s {
                self.flag = true;
                return GaugeUpdate::Raised;
            }
            GaugeUpdate::Unchanged
        } else if self.elapsed_s > 0.0 || self.flag {
            let released = GaugeUpdate::Released {
                held_s: self.elapsed_s,
                was_flagged: self.flag,
            };
            self.elapsed_s = 0.0;
            self.flag = false;
            released
        } else {
            GaugeUpdate::Unchanged
        }
    }

    fn state(&self) -> ConditionState {
        ConditionState {
            flag: self.flag,
            elapsed_s: self.elapsed_s,
        }
    }
}

/// Single owner of all condition and alarm state.
///
/// Driven once per frame by [`observe`](ConditionEngine::observe); everything
/// else is read-only.
#[derive(Debug)]
pub struct ConditionEngine {
    config: MonitorConfig,
    gauges: [HysteresisGauge; 4],
    fps: f64,
    sleeping: bool,
    unconscious: bool,
}

impl ConditionEngine {
    pub fn new(config: MonitorConfig) -> Self {
        let gauges = [
            HysteresisGauge::new(config.distraction_threshold_s),
            HysteresisGauge::new(config.yawning_threshold_s),
            HysteresisGauge::new(config.eyes_closed_threshold_s),
            HysteresisGauge::new(config.no_blink_threshold_s),
        ];
        let fps = config.initial_fps;
        Self {
            config,
            gauges,
            fps,
            sleeping: false,
            unconscious: false,
        }
    }

    /// Feed in the caller's live frame-rate estimate (reciprocal of the
    /// previous pass's wall time). Invalid estimates keep the previous one.
    pub fn update_fps(&mut self, fps: f64) {
        if !fps.is_finite() || fps <= 0.0 {
            warn!(fps, "ignoring invalid fps estimate");
            return;
        }
        self.fps = fps;
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Apply one frame's predicates. The no-blink predicate is derived
    /// internally: it counts consecutive non-closed frames and resets the
    /// instant the eyes close.
    pub fn observe(&mut self, distracted: bool, yawning: bool, eyes_closed: bool) -> Vec<MonitorEvent> {
        let dt_s = 1.0 / self.fps;
        let mut events = Vec::new();

        self.apply(Condition::Distraction, distracted, dt_s, &mut events);
        self.apply(Condition::Yawning, yawning, dt_s, &mut events);
        self.apply(Condition::EyesClosed, eyes_closed, dt_s, &mut events);
        self.apply(Condition::NoBlink, !eyes_closed, dt_s, &mut events);

        self.escalate(&mut events);
        events
    }

    fn apply(
        &mut self,
        condition: Condition,
        active: bool,
        dt_s: f64,
        events: &mut Vec<MonitorEvent>,
    ) {
        match self.gauges[condition.index()].update(active, dt_s) {
            GaugeUpdate::Raised => {
                info!(condition = condition.name(), "condition flag raised");
                events.push(MonitorEvent::ConditionRaised { condition });
            }
            GaugeUpdate::Released { held_s, was_flagged } => {
                // Sub-threshold episodes reset silently
                if was_flagged {
                    info!(condition = condition.name(), held_s, "condition cleared");
                    events.push(MonitorEvent::ConditionCleared { condition, held_s });
                }
            }
            GaugeUpdate::Unchanged => {}
        }
    }

    /// Edge-triggered latches over the primary counters. Each fires once
    /// per continuous episode and clears when its condition goes inactive.
    fn escalate(&mut self, events: &mut Vec<MonitorEvent>) {
        let eyes_closed = self.gauges[Condition::EyesClosed.index()].state();
        if eyes_closed.flag && eyes_closed.elapsed_s > self.config.sleep_alarm_s {
            if !self.sleeping {
                self.sleeping = true;
                info!("driver is sleeping");
                events.push(MonitorEvent::AlarmRaised { alarm: Alarm::Sleeping });
            }
        } else if !eyes_closed.flag && self.sleeping {
            self.sleeping = false;
            events.push(MonitorEvent::AlarmCleared { alarm: Alarm::Sleeping });
        }

        let no_blink = self.gauges[Condition::NoBlink.index()].state();
        if no_blink.flag && no_blink.elapsed_s > self.config.unconscious_alarm_s {
            if !self.unconscious {
                self.unconscious = true;
                info!("driver is unconscious");
                events.push(MonitorEvent::AlarmRaised { alarm: Alarm::Unconscious });
            }
        } else if !no_blink.flag && self.unconscious {
            self.unconscious = false;
            events.push(MonitorEvent::AlarmCleared { alarm: Alarm::Unconscious });
        }
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            distraction: self.gauges[Condition::Distraction.index()].state(),
            yawning: self.gauges[Condition::Yawning.index()].state(),
            eyes_closed: self.gauges[Condition::EyesClosed.index()].state(),
            no_blink: self.gauges[Condition::NoBlink.index()].state(),
            sleeping: self.sleeping,
            unconscious: self.unconscious,
        }
    }
}
