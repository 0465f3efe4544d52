//! Timer module for handling Pomodoro sessions

use tracing::{debug, info, warn};

use crate::bindings::{Affordance, Bindings, Cue};
use crate::config::{CuePolicy, Labels, TimerConfig};
use crate::format::{format_clock, progress_percent};
use crate::schedule::{Interval, RunId, Scheduler, TICK_PERIOD, WidgetId, next_widget_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Work,
    Break,
    Completed,
}

impl Phase {
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Work | Phase::Break)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub current_round: u32,
    pub total_rounds: u32,
    pub work_seconds: u64,
    pub break_seconds: u64,
}

impl TimerState {
    pub fn idle(config: TimerConfig) -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: 0,
            current_round: 1,
            total_rounds: config.total_rounds,
            work_seconds: config.work_seconds(),
            break_seconds: config.break_seconds(),
        }
    }

    /// Length of the current phase, zero outside Work and Break.
    pub fn phase_seconds(&self) -> u64 {
        match self.phase {
            Phase::Work => self.work_seconds,
            Phase::Break => self.break_seconds,
            Phase::Idle | Phase::Completed => 0,
        }
    }
}

/// A work/break countdown bound to its own outputs.
///
/// Ticks arrive through [`PomodoroTimer::on_tick`] tagged with the run that
/// scheduled them; a run is replaced on every start, so ticks queued for an
/// earlier run are dropped.
pub struct PomodoroTimer {
    id: WidgetId,
    state: TimerState,
    labels: Labels,
    cues: CuePolicy,
    bindings: Bindings,
    scheduler: Box<dyn Scheduler>,
    interval: Option<Box<dyn Interval>>,
    run: RunId,
}

impl PomodoroTimer {
    /// Create an idle timer and render its initial status.
    pub fn new(bindings: Bindings, scheduler: Box<dyn Scheduler>) -> Self {
        let mut timer = Self {
            id: next_widget_id(),
            state: TimerState::idle(TimerConfig::default()),
            labels: Labels::default(),
            cues: CuePolicy::default(),
            bindings,
            scheduler,
            interval: None,
            run: 0,
        };
        timer.show(Affordance::Start);
        timer.render();
        timer
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self.render();
        self
    }

    pub fn with_cues(mut self, cues: CuePolicy) -> Self {
        self.cues = cues;
        self
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// True while an interval is scheduled for this timer.
    pub fn is_ticking(&self) -> bool {
        self.interval.is_some()
    }

    pub fn start(&mut self, config: TimerConfig) {
        let config = config.normalized();
        let from = self.state.phase;

        self.cancel_interval();
        self.state = TimerState {
            phase: Phase::Work,
            remaining_seconds: config.work_seconds(),
            current_round: 1,
            total_rounds: config.total_rounds,
            work_seconds: config.work_seconds(),
            break_seconds: config.break_seconds(),
        };
        self.run += 1;
        self.interval = Some(self.scheduler.set_interval(self.id, self.run, TICK_PERIOD));
        info!(
            widget = self.id,
            run = self.run,
            work_minutes = config.work_minutes,
            break_minutes = config.break_minutes,
            rounds = config.total_rounds,
            "pomodoro started"
        );

        self.show(Affordance::Stop);
        self.transitioned(from, Phase::Work);
        self.render();
    }

    pub fn stop(&mut self) {
        let from = self.state.phase;
        self.cancel_interval();
        self.state.phase = Phase::Idle;
        self.show(Affordance::Start);
        if from != Phase::Idle {
            info!(widget = self.id, "pomodoro stopped");
            self.transitioned(from, Phase::Idle);
        }
        self.render();
    }

    /// Scheduler entry point. Ticks from any run but the active one are ignored.
    pub fn on_tick(&mut self, run: RunId) {
        if run != self.run || self.interval.is_none() {
            debug!(widget = self.id, run, active = self.run, "stale tick ignored");
            return;
        }
        self.tick();
    }

    /// Advance one second. Does nothing unless a run is active.
    pub fn tick(&mut self) {
        if !self.state.phase.is_running() {
            return;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            self.render();
            return;
        }

        match self.state.phase {
            Phase::Work => {
                self.state.phase = Phase::Break;
                self.state.remaining_seconds = self.state.break_seconds;
                debug!(widget = self.id, round = self.state.current_round, "break started");
                if self.cues.break_start {
                    self.play(Cue::BreakStart);
                }
                self.transitioned(Phase::Work, Phase::Break);
            }
            Phase::Break => {
                self.state.current_round += 1;
                if self.state.current_round > self.state.total_rounds {
                    self.complete();
                    return;
                }
                self.state.phase = Phase::Work;
                self.state.remaining_seconds = self.state.work_seconds;
                debug!(widget = self.id, round = self.state.current_round, "work started");
                if self.cues.work_start {
                    self.play(Cue::WorkStart);
                }
                self.transitioned(Phase::Break, Phase::Work);
            }
            Phase::Idle | Phase::Completed => {}
        }
        self.render();
    }

    fn complete(&mut self) {
        self.cancel_interval();
        self.state.phase = Phase::Completed;
        self.state.current_round = self.state.total_rounds;
        self.state.remaining_seconds = 0;
        info!(widget = self.id, rounds = self.state.total_rounds, "pomodoro completed");
        if self.cues.completed {
            self.play(Cue::Completed);
        }
        self.show(Affordance::Start);
        self.transitioned(Phase::Break, Phase::Completed);
        self.render();
    }

    /// Text for the status node in the current state.
    pub fn status_text(&self) -> String {
        match self.state.phase {
            Phase::Idle => self.labels.idle_status.clone(),
            Phase::Completed => self.labels.completed_status.clone(),
            Phase::Work | Phase::Break => self.running_text(),
        }
    }

    fn running_text(&self) -> String {
        let label = if self.state.phase == Phase::Work {
            &self.labels.work
        } else {
            &self.labels.rest
        };
        format!(
            "{} {}/{}{}{}",
            label,
            self.state.current_round,
            self.state.total_rounds,
            self.labels.separator,
            format_clock(self.state.remaining_seconds)
        )
    }

    fn mirror_text(&self) -> String {
        let body = match self.state.phase {
            Phase::Idle => self.labels.mirror_idle.clone(),
            Phase::Completed => self.labels.mirror_completed.clone(),
            Phase::Work | Phase::Break => self.running_text(),
        };
        format!("{}: {}", self.labels.mirror_prefix, body)
    }

    fn progress(&self) -> u8 {
        match self.state.phase {
            Phase::Idle => 0,
            Phase::Completed => 100,
            Phase::Work | Phase::Break => {
                progress_percent(self.state.remaining_seconds, self.state.phase_seconds())
            }
        }
    }

    /// Push the current state to every bound output.
    pub fn render(&mut self) {
        let status = self.status_text();
        let mirror = self.mirror_text();
        let percent = self.progress();

        self.bindings.status.set_text(&status);
        if let Some(node) = self.bindings.mirror.as_mut() {
            node.set_text(&mirror);
        }
        if let Some(bar) = self.bindings.progress.as_mut() {
            bar.set_percent(percent);
        }
    }

    fn cancel_interval(&mut self) {
        if let Some(mut interval) = self.interval.take() {
            interval.cancel();
            debug!(widget = self.id, run = self.run, "interval cancelled");
        }
    }

    fn show(&mut self, affordance: Affordance) {
        if let Some(controls) = self.bindings.controls.as_mut() {
            controls.show(affordance);
        }
    }

    fn play(&mut self, cue: Cue) {
        if let Some(audio) = self.bindings.audio.as_mut() {
            if let Err(err) = audio.play(cue) {
                debug!(widget = self.id, ?cue, error = %err, "audio cue dropped");
            }
        }
    }

    fn transitioned(&mut self, from: Phase, to: Phase) {
        if let Some(hooks) = self.bindings.hooks.as_mut() {
            if let Err(err) = hooks.on_transition(from, to) {
                warn!(widget = self.id, ?from, ?to, error = %err, "phase hook failed");
            }
        }
    }
}

impl Drop for PomodoroTimer {
    fn drop(&mut self) {
        self.cancel_interval();
    }
}
