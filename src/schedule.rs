//! One-second repeating intervals feeding a single event loop.
//!
//! Interval threads only sleep and post [`Event::Tick`]; every widget is
//! mutated on the thread that drains the channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

pub type WidgetId = u64;
pub type RunId = u64;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Unique per process, starting at 1.
pub fn next_widget_id() -> WidgetId {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick { widget: WidgetId, run: RunId },
    Start,
    Stop,
    Quit,
    Interrupt,
}

/// Handle to a repeating interval.
pub trait Interval {
    /// Stop further ticks. Calling it twice is harmless.
    fn cancel(&mut self);
}

pub trait Scheduler {
    fn set_interval(
        &mut self,
        widget: WidgetId,
        run: RunId,
        period: Duration,
    ) -> Box<dyn Interval>;
}

/// Spawns one sleeper thread per interval.
#[derive(Clone)]
pub struct ThreadScheduler {
    events: Sender<Event>,
}

impl ThreadScheduler {
    pub fn new(events: Sender<Event>) -> Self {
        Self { events }
    }
}

impl Scheduler for ThreadScheduler {
    fn set_interval(
        &mut self,
        widget: WidgetId,
        run: RunId,
        period: Duration,
    ) -> Box<dyn Interval> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let events = self.events.clone();

        thread::spawn(move || {
            let mut next = Instant::now() + period;
            loop {
                thread::sleep(next.saturating_duration_since(Instant::now()));
                if flag.load(Ordering::Acquire) {
                    break;
                }
                if events.send(Event::Tick { widget, run }).is_err() {
                    break;
                }
                next += period;
            }
            debug!(widget, run, "interval thread exited");
        });

        Box::new(ThreadInterval { cancelled })
    }
}

struct ThreadInterval {
    cancelled: Arc<AtomicBool>,
}

impl Interval for ThreadInterval {
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Drop for ThreadInterval {
    fn drop(&mut self) {
        self.cancel();
    }
}
