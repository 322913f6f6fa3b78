//! Condition monitoring
//!
//! Converts noisy per-frame boolean predicates (distracted, yawning, eyes
//! closed) into stable, debounced flags: a condition must hold continuously
//! for a configured duration before its flag raises, and the accumulated
//! duration is reported the instant the predicate releases. Sustained
//! primary conditions escalate into rarer, higher-severity alarms
//! (sleeping, unconscious).
//!
//! All state is owned by a single [`ConditionEngine`]; callers trigger the
//! per-frame update and read immutable snapshots, never mutate flags
//! directly.

pub mod config;
pub mod engine;
pub mod state;

pub use crate::config::MonitorConfig;
pub use crate::engine::{ConditionEngine, MonitorEvent};
pub use crate::state::{Alarm, Condition, ConditionState, MonitorSnapshot};
