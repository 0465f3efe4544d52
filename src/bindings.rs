//! Output surface of a widget.
//!
//! Only the status node is required. Every other binding is optional and a
//! missing one simply disables that render path.

use crate::error::Result;
use crate::timer::Phase;

pub trait TextNode {
    fn set_text(&mut self, text: &str);
}

pub trait ProgressBar {
    /// `percent` is always within 0..=100.
    fn set_percent(&mut self, percent: u8);
}

/// Which trigger the user is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Start,
    Stop,
}

pub trait Controls {
    fn show(&mut self, affordance: Affordance);
}

/// A transition worth a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    BreakStart,
    WorkStart,
    Completed,
}

/// Fire-and-forget sound. Errors are logged by the caller and dropped.
pub trait AudioCue {
    fn play(&mut self, cue: Cue) -> Result<()>;
}

/// Notified of every phase change, including start and stop.
pub trait PhaseHooks {
    fn on_transition(&mut self, from: Phase, to: Phase) -> Result<()>;
}

pub struct Bindings {
    pub status: Box<dyn TextNode>,
    pub mirror: Option<Box<dyn TextNode>>,
    pub progress: Option<Box<dyn ProgressBar>>,
    pub controls: Option<Box<dyn Controls>>,
    pub audio: Option<Box<dyn AudioCue>>,
    pub hooks: Option<Box<dyn PhaseHooks>>,
}

impl Bindings {
    pub fn new(status: Box<dyn TextNode>) -> Self {
        Self {
            status,
            mirror: None,
            progress: None,
            controls: None,
            audio: None,
            hooks: None,
        }
    }

    pub fn with_mirror(mut self, mirror: Box<dyn TextNode>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressBar>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_controls(mut self, controls: Box<dyn Controls>) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioCue>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_hooks(mut self, hooks: Box<dyn PhaseHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }
}
