//! Configuration module for Pomodoro settings

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_ROUNDS: u32 = 4;

/// Validated timer settings. Every field is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub total_rounds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            total_rounds: DEFAULT_ROUNDS,
        }
    }
}

impl TimerConfig {
    pub fn new(work_minutes: u32, break_minutes: u32, total_rounds: u32) -> Self {
        Self {
            work_minutes,
            break_minutes,
            total_rounds,
        }
    }

    /// Build from raw field text. Anything unusable falls back to its default.
    pub fn from_inputs(inputs: &TimerInputs) -> Self {
        Self {
            work_minutes: parse_positive(inputs.work.as_deref(), DEFAULT_WORK_MINUTES),
            break_minutes: parse_positive(inputs.rest.as_deref(), DEFAULT_BREAK_MINUTES),
            total_rounds: parse_positive(inputs.rounds.as_deref(), DEFAULT_ROUNDS),
        }
    }

    /// Replace zero fields with their defaults.
    pub fn normalized(self) -> Self {
        let or_default = |value: u32, default: u32| if value == 0 { default } else { value };
        Self {
            work_minutes: or_default(self.work_minutes, DEFAULT_WORK_MINUTES),
            break_minutes: or_default(self.break_minutes, DEFAULT_BREAK_MINUTES),
            total_rounds: or_default(self.total_rounds, DEFAULT_ROUNDS),
        }
    }

    pub fn work_seconds(&self) -> u64 {
        u64::from(self.work_minutes) * 60
    }

    pub fn break_seconds(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }
}

/// Raw text of the three numeric input fields, as typed by the user.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TimerInputs {
    pub work: Option<String>,
    #[serde(rename = "break")]
    pub rest: Option<String>,
    pub rounds: Option<String>,
}

impl TimerInputs {
    /// Fields set in `other` replace the ones in `self`.
    pub fn overridden_by(self, other: TimerInputs) -> Self {
        Self {
            work: other.work.or(self.work),
            rest: other.rest.or(self.rest),
            rounds: other.rounds.or(self.rounds),
        }
    }
}

/// Read the leading integer of `input` (`" 12abc"` is 12, `"1.5"` is 1).
/// Missing, non-numeric, non-positive or overflowing input yields `default`.
pub fn parse_positive(input: Option<&str>, default: u32) -> u32 {
    let Some(input) = input else {
        return default;
    };
    let trimmed = input.trim_start();
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: &str = {
        let end = body
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(body.len());
        &body[..end]
    };
    if negative || digits.is_empty() {
        return default;
    }
    match digits.parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => default,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

/// Every user-visible string the timer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub work: String,
    pub rest: String,
    /// Between the round counter and the remaining time.
    pub separator: String,
    pub idle_status: String,
    pub completed_status: String,
    pub mirror_prefix: String,
    pub mirror_idle: String,
    pub mirror_completed: String,
}

impl Labels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self {
                work: "Work".to_string(),
                rest: "Break".to_string(),
                separator: " - ".to_string(),
                idle_status: "Status: ready".to_string(),
                completed_status: "Pomodoro completed".to_string(),
                mirror_prefix: "Pomodoro".to_string(),
                mirror_idle: "ready".to_string(),
                mirror_completed: "completed".to_string(),
            },
            Locale::Es => Self {
                work: "Trabajo".to_string(),
                rest: "Descanso".to_string(),
                separator: " — ".to_string(),
                idle_status: "Estado: listo".to_string(),
                completed_status: "Pomodoro completado".to_string(),
                mirror_prefix: "Pomodoro".to_string(),
                mirror_idle: "listo".to_string(),
                mirror_completed: "completado".to_string(),
            },
        }
    }

    pub fn with_overrides(mut self, overrides: &LabelOverrides) -> Self {
        let apply = |slot: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *slot = value.clone();
            }
        };
        apply(&mut self.work, &overrides.work);
        apply(&mut self.rest, &overrides.rest);
        apply(&mut self.separator, &overrides.separator);
        apply(&mut self.idle_status, &overrides.idle_status);
        apply(&mut self.completed_status, &overrides.completed_status);
        apply(&mut self.mirror_prefix, &overrides.mirror_prefix);
        apply(&mut self.mirror_idle, &overrides.mirror_idle);
        apply(&mut self.mirror_completed, &overrides.mirror_completed);
        self
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::for_locale(Locale::En)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LabelOverrides {
    pub work: Option<String>,
    pub rest: Option<String>,
    pub separator: Option<String>,
    pub idle_status: Option<String>,
    pub completed_status: Option<String>,
    pub mirror_prefix: Option<String>,
    pub mirror_idle: Option<String>,
    pub mirror_completed: Option<String>,
}

/// Which phase transitions play the audio cue.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct CuePolicy {
    pub break_start: bool,
    pub work_start: bool,
    pub completed: bool,
}

impl Default for CuePolicy {
    fn default() -> Self {
        Self {
            break_start: true,
            work_start: false,
            completed: false,
        }
    }
}

impl CuePolicy {
    pub fn all() -> Self {
        Self {
            break_start: true,
            work_start: true,
            completed: true,
        }
    }
}

/// Shell commands run on phase changes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Hooks {
    pub work_start: Option<String>,
    pub work_end: Option<String>,
    pub break_start: Option<String>,
    pub break_end: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySettings {
    pub mirror: bool,
    pub progress: bool,
    pub progress_width: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            mirror: true,
            progress: true,
            progress_width: 20,
        }
    }
}

/// Contents of `config.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub inputs: TimerInputs,
    pub locale: Locale,
    pub labels: LabelOverrides,
    pub cues: CuePolicy,
    pub hooks: Hooks,
    pub display: DisplaySettings,
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inputs: TimerInputs::default(),
            locale: Locale::default(),
            labels: LabelOverrides::default(),
            cues: CuePolicy::default(),
            hooks: Hooks::default(),
            display: DisplaySettings::default(),
            sound: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using default settings");
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "using default settings");
            Self::default()
        })
    }

    /// Settings written by `pomo config --init`, with hook examples commented out.
    pub fn example() -> Self {
        Self {
            hooks: Hooks {
                work_start: Some("# afplay ~/music/focus.mp3 &".to_string()),
                work_end: Some("# pkill afplay".to_string()),
                break_start: Some("# afplay ~/music/break.mp3 &".to_string()),
                break_end: Some("# pkill afplay".to_string()),
            },
            ..Self::default()
        }
    }

    /// Write the example settings to `path`, creating parent directories.
    pub fn init_file(path: &Path) -> Result<Self> {
        let settings = Self::example();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&settings)?)?;
        Ok(settings)
    }

    pub fn labels(&self) -> Labels {
        Labels::for_locale(self.locale).with_overrides(&self.labels)
    }
}

pub fn config_path() -> PathBuf {
    if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home)
            .join(".config")
            .join("pomo")
            .join("config.json")
    } else {
        PathBuf::from("pomo-config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leading_integer() {
        assert_eq!(parse_positive(Some("30"), 25), 30);
        assert_eq!(parse_positive(Some("  12abc"), 25), 12);
        assert_eq!(parse_positive(Some("1.5"), 25), 1);
        assert_eq!(parse_positive(Some("+7"), 25), 7);
    }

    #[test]
    fn unusable_input_falls_back() {
        assert_eq!(parse_positive(None, 25), 25);
        assert_eq!(parse_positive(Some(""), 25), 25);
        assert_eq!(parse_positive(Some("abc"), 25), 25);
        assert_eq!(parse_positive(Some("0"), 5), 5);
        assert_eq!(parse_positive(Some("-3"), 4), 4);
        assert_eq!(parse_positive(Some("99999999999"), 25), 25);
    }

    #[test]
    fn normalized_replaces_zeroes() {
        let config = TimerConfig::new(0, 10, 0).normalized();
        assert_eq!(config, TimerConfig::new(25, 10, 4));
    }

    #[test]
    fn spanish_labels_and_overrides() {
        let labels = Labels::for_locale(Locale::Es).with_overrides(&LabelOverrides {
            rest: Some("Pausa".to_string()),
            ..LabelOverrides::default()
        });
        assert_eq!(labels.work, "Trabajo");
        assert_eq!(labels.rest, "Pausa");
        assert_eq!(labels.completed_status, "Pomodoro completado");
        assert_eq!(labels.separator, " — ");
        assert_eq!(Labels::default().separator, " - ");
    }
}
