//! Monitoring thresholds configuration

use ::config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Duration thresholds for flags and alarms, each independently tunable.
/// All values are seconds of continuously held predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Gaze off-center (or pupils lost) before the distraction flag raises
    pub distraction_threshold_s: f64,

    /// Mouth open before the yawning flag raises
    pub yawning_threshold_s: f64,

    /// Eyes closed before the eyes-closed flag raises
    pub eyes_closed_threshold_s: f64,

    /// No detected closure before the no-blink flag raises
    pub no_blink_threshold_s: f64,

    /// Eyes-closed duration that escalates into the sleeping alarm
    pub sleep_alarm_s: f64,

    /// No-blink duration that escalates into the unconscious alarm
    pub unconscious_alarm_s: f64,

    /// Frame rate assumed before the first measured estimate arrives
    pub initial_fps: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            distraction_threshold_s: 2.0,
            yawning_threshold_s: 2.0,
            eyes_closed_threshold_s: 2.0,
            no_blink_threshold_s: 20.0,
            sleep_alarm_s: 5.0,
            unconscious_alarm_s: 40.0,
            initial_fps: 10.0,
        }
    }
}

impl MonitorConfig {
    /// Stricter thresholds (earlier warnings)
    pub fn strict() -> Self {
        Self {
            distraction_threshold_s: 1.5,
            yawning_threshold_s: 1.5,
            eyes_closed_threshold_s: 1.5,
            no_blink_threshold_s: 15.0,
            sleep_alarm_s: 4.0,
            unconscious_alarm_s: 30.0,
            ..Default::default()
        }
    }

    /// More tolerant thresholds (fewer warnings)
    pub fn lenient() -> Self {
        Self {
            distraction_threshold_s: 3.0,
            yawning_threshold_s: 3.0,
            eyes_closed_threshold_s: 3.0,
            no_blink_threshold_s: 30.0,
            sleep_alarm_s: 8.0,
            unconscious_alarm_s: 60.0,
            ..Default::default()
        }
    }

    /// Load configuration: defaults, overridden by an optional `monitor`
    /// file, overridden by `MONITOR_`-prefixed environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Config::try_from(&MonitorConfig::default())?;
        Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("monitor").required(false))
            .add_source(Environment::with_prefix("MONITOR"))
            .build()?
            .try_deserialize()
    }
}
