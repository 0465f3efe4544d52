//! # pomo-widget
//!
//! A Pomodoro work/break countdown and an elapsed-time clock, rendered
//! through small binding traits so the same state machine can drive a
//! terminal line, a test recorder or any other surface.

pub mod bindings;
pub mod config;
pub mod elapsed;
pub mod error;
pub mod format;
pub mod schedule;
pub mod sound;
pub mod telemetry;
pub mod terminal;
pub mod timer;

pub use config::{Settings, TimerConfig, TimerInputs};
pub use elapsed::ElapsedClock;
pub use error::{Error, Result};
pub use timer::{Phase, PomodoroTimer, TimerState};
