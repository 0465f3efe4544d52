#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pomo_widget::bindings::{
    Affordance, AudioCue, Bindings, Controls, Cue, PhaseHooks, ProgressBar, TextNode,
};
use pomo_widget::error::{Error, Result};
use pomo_widget::schedule::{Interval, RunId, Scheduler, WidgetId};
use pomo_widget::timer::Phase;

/// Everything the bindings received, in order.
#[derive(Default, Debug)]
pub struct Log {
    pub status: Vec<String>,
    pub mirror: Vec<String>,
    pub progress: Vec<u8>,
    pub controls: Vec<Affordance>,
    pub cues: Vec<Cue>,
    pub transitions: Vec<(Phase, Phase)>,
}

pub type SharedLog = Rc<RefCell<Log>>;

struct Recorder {
    log: SharedLog,
    mirror: bool,
    fail_audio: bool,
}

impl TextNode for Recorder {
    fn set_text(&mut self, text: &str) {
        let mut log = self.log.borrow_mut();
        if self.mirror {
            log.mirror.push(text.to_string());
        } else {
            log.status.push(text.to_string());
        }
    }
}

impl ProgressBar for Recorder {
    fn set_percent(&mut self, percent: u8) {
        self.log.borrow_mut().progress.push(percent);
    }
}

impl Controls for Recorder {
    fn show(&mut self, affordance: Affordance) {
        self.log.borrow_mut().controls.push(affordance);
    }
}

impl AudioCue for Recorder {
    fn play(&mut self, cue: Cue) -> Result<()> {
        self.log.borrow_mut().cues.push(cue);
        if self.fail_audio {
            return Err(Error::Audio("autoplay blocked".to_string()));
        }
        Ok(())
    }
}

impl PhaseHooks for Recorder {
    fn on_transition(&mut self, from: Phase, to: Phase) -> Result<()> {
        self.log.borrow_mut().transitions.push((from, to));
        Ok(())
    }
}

fn recorder(log: &SharedLog, mirror: bool, fail_audio: bool) -> Box<Recorder> {
    Box::new(Recorder {
        log: Rc::clone(log),
        mirror,
        fail_audio,
    })
}

/// Status node only.
pub fn status_only(log: &SharedLog) -> Bindings {
    Bindings::new(recorder(log, false, false))
}

/// Every binding present.
pub fn full(log: &SharedLog) -> Bindings {
    Bindings::new(recorder(log, false, false))
        .with_mirror(recorder(log, true, false))
        .with_progress(recorder(log, false, false))
        .with_controls(recorder(log, false, false))
        .with_audio(recorder(log, false, false))
        .with_hooks(recorder(log, false, false))
}

/// Every binding present, with audio that always rejects.
pub fn full_with_failing_audio(log: &SharedLog) -> Bindings {
    Bindings::new(recorder(log, false, false))
        .with_audio(recorder(log, false, true))
        .with_progress(recorder(log, false, false))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub widget: WidgetId,
    pub run: RunId,
    pub period: Duration,
    pub active: bool,
}

/// Records intervals instead of running them; tests tick by hand.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    pub intervals: Rc<RefCell<Vec<Scheduled>>>,
}

impl ManualScheduler {
    pub fn active(&self) -> Vec<Scheduled> {
        self.intervals
            .borrow()
            .iter()
            .filter(|interval| interval.active)
            .cloned()
            .collect()
    }
}

struct ManualInterval {
    intervals: Rc<RefCell<Vec<Scheduled>>>,
    index: usize,
}

impl Interval for ManualInterval {
    fn cancel(&mut self) {
        self.intervals.borrow_mut()[self.index].active = false;
    }
}

impl Scheduler for ManualScheduler {
    fn set_interval(
        &mut self,
        widget: WidgetId,
        run: RunId,
        period: Duration,
    ) -> Box<dyn Interval> {
        let mut intervals = self.intervals.borrow_mut();
        intervals.push(Scheduled {
            widget,
            run,
            period,
            active: true,
        });
        Box::new(ManualInterval {
            intervals: Rc::clone(&self.intervals),
            index: intervals.len() - 1,
        })
    }
}

pub fn new_log() -> SharedLog {
    Rc::new(RefCell::new(Log::default()))
}
