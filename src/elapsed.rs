//! Elapsed time since a fixed start instant.
//!
//! The wall-clock distance to the start is measured once, at construction.
//! Afterwards only the monotonic clock advances the display.

use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::bindings::TextNode;
use crate::format::format_clock;
use crate::schedule::{Interval, Scheduler, TICK_PERIOD, WidgetId, next_widget_id};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601-like timestamp.
///
/// Offsets are honoured; naive date-times are local time; a bare date is
/// UTC midnight.
pub fn parse_start(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    let zoned = match input.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => input.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&zoned, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub struct ElapsedClock {
    id: WidgetId,
    offset_ms: i64,
    origin: Instant,
    node: Box<dyn TextNode>,
    interval: Option<Box<dyn Interval>>,
}

impl ElapsedClock {
    /// Build the clock and render it once.
    ///
    /// `now` and `origin` must describe the same moment on the wall clock
    /// and the monotonic clock. An unparseable or missing `start` counts
    /// from `now`.
    pub fn new(
        start: Option<&str>,
        now: DateTime<Utc>,
        origin: Instant,
        node: Box<dyn TextNode>,
    ) -> Self {
        let start_at = match start.and_then(parse_start) {
            Some(start_at) => start_at,
            None => {
                if let Some(raw) = start {
                    warn!(start = raw, "unparseable start timestamp, counting from now");
                }
                now
            }
        };
        let mut clock = Self {
            id: next_widget_id(),
            offset_ms: (now - start_at).num_milliseconds(),
            origin,
            node,
            interval: None,
        };
        clock.render_at(origin);
        clock
    }

    /// Start from the current wall and monotonic clocks.
    pub fn initialize(start: Option<&str>, node: Box<dyn TextNode>) -> Self {
        Self::new(start, Utc::now(), Instant::now(), node)
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Begin the once-per-second refresh. It is never cancelled.
    pub fn attach(&mut self, scheduler: &mut dyn Scheduler) {
        if self.interval.is_none() {
            self.interval = Some(scheduler.set_interval(self.id, 0, TICK_PERIOD));
            debug!(widget = self.id, "elapsed clock attached");
        }
    }

    /// Whole seconds elapsed at `at`, never negative.
    pub fn elapsed_at(&self, at: Instant) -> u64 {
        let since_origin = at.saturating_duration_since(self.origin).as_millis() as i64;
        let total = self.offset_ms.saturating_add(since_origin);
        (total.max(0) / 1000) as u64
    }

    pub fn render_at(&mut self, at: Instant) {
        let text = format_clock(self.elapsed_at(at));
        self.node.set_text(&text);
    }

    pub fn on_tick(&mut self) {
        self.render_at(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_start("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn parses_offsets_without_seconds() {
        assert_eq!(
            parse_start("2024-03-01T10:00Z").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(
            parse_start("2024-03-01T10:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(
            parse_start("2024-03-01T10:00-0130").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).unwrap()
        );
        assert_eq!(
            parse_start("2024-03-01 10:00:30+01:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 30).unwrap()
        );
    }

    #[test]
    fn parses_fractional_utc() {
        let parsed = parse_start("2024-03-01T10:00:00.250Z").unwrap();
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn date_only_is_utc_midnight() {
        let parsed = parse_start("2024-03-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn naive_date_time_is_accepted() {
        assert!(parse_start("2024-03-01T10:00:00").is_some());
        assert!(parse_start("2024-03-01 10:00").is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_start("").is_none());
        assert!(parse_start("yesterday").is_none());
        assert!(parse_start("2024-13-45").is_none());
    }
}
