//! Single-line terminal rendering of the widget bindings.
//!
//! Every binding handed out by [`Screen`] updates one shared line, which is
//! redrawn in place with a carriage return after each change.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::bindings::{Affordance, Controls, ProgressBar, TextNode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub elapsed: Option<String>,
    pub status: String,
    pub progress: Option<u8>,
    pub mirror: Option<String>,
    pub affordance: Option<Affordance>,
}

/// Render `line` without the leading carriage return.
pub fn render_line(line: &Line, bar_width: usize) -> String {
    let mut parts = Vec::new();
    if let Some(elapsed) = &line.elapsed {
        parts.push(format!("⏱️  {}", elapsed));
    }
    if !line.status.is_empty() {
        parts.push(format!("🍅 {}", line.status));
    }
    if let Some(percent) = line.progress {
        parts.push(format!("[{}] {}%", progress_bar(percent, bar_width), percent));
    }
    if let Some(mirror) = &line.mirror {
        parts.push(mirror.clone());
    }
    match line.affordance {
        Some(Affordance::Start) => parts.push("(s)tart (q)uit".to_string()),
        Some(Affordance::Stop) => parts.push("(x) stop (q)uit".to_string()),
        None => {}
    }
    parts.join(" | ")
}

pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

struct ScreenState {
    line: Line,
    bar_width: usize,
    out: Box<dyn Write>,
}

impl ScreenState {
    fn redraw(&mut self) {
        let text = render_line(&self.line, self.bar_width);
        // A closed stdout leaves nothing to draw on.
        let _ = write!(self.out, "\r{}\x1b[K", text).and_then(|_| self.out.flush());
    }
}

#[derive(Clone)]
pub struct Screen {
    state: Rc<RefCell<ScreenState>>,
}

impl Screen {
    pub fn new(out: Box<dyn Write>, bar_width: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(ScreenState {
                line: Line::default(),
                bar_width,
                out,
            })),
        }
    }

    pub fn stdout(bar_width: usize) -> Self {
        Self::new(Box::new(std::io::stdout()), bar_width)
    }

    pub fn line(&self) -> Line {
        self.state.borrow().line.clone()
    }

    /// Move past the status line, e.g. before exiting.
    pub fn finish(&self) {
        let mut state = self.state.borrow_mut();
        let _ = writeln!(state.out);
    }

    fn update(&self, apply: impl FnOnce(&mut Line)) {
        let mut state = self.state.borrow_mut();
        apply(&mut state.line);
        state.redraw();
    }

    pub fn status(&self) -> Box<dyn TextNode> {
        Box::new(Slot::new(self.clone(), Field::Status))
    }

    pub fn mirror(&self) -> Box<dyn TextNode> {
        Box::new(Slot::new(self.clone(), Field::Mirror))
    }

    pub fn elapsed(&self) -> Box<dyn TextNode> {
        Box::new(Slot::new(self.clone(), Field::Elapsed))
    }

    pub fn progress(&self) -> Box<dyn ProgressBar> {
        Box::new(Slot::new(self.clone(), Field::Progress))
    }

    pub fn controls(&self) -> Box<dyn Controls> {
        Box::new(Slot::new(self.clone(), Field::Controls))
    }
}

#[derive(Clone, Copy)]
enum Field {
    Status,
    Mirror,
    Elapsed,
    Progress,
    Controls,
}

struct Slot {
    screen: Screen,
    field: Field,
}

impl Slot {
    fn new(screen: Screen, field: Field) -> Self {
        Self { screen, field }
    }
}

impl TextNode for Slot {
    fn set_text(&mut self, text: &str) {
        let field = self.field;
        self.screen.update(|line| match field {
            Field::Mirror => line.mirror = Some(text.to_string()),
            Field::Elapsed => line.elapsed = Some(text.to_string()),
            _ => line.status = text.to_string(),
        });
    }
}

impl ProgressBar for Slot {
    fn set_percent(&mut self, percent: u8) {
        self.screen.update(|line| line.progress = Some(percent));
    }
}

impl Controls for Slot {
    fn show(&mut self, affordance: Affordance) {
        self.screen.update(|line| line.affordance = Some(affordance));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(progress_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(50, 4), "██░░");
        assert_eq!(progress_bar(100, 4), "████");
    }

    #[test]
    fn renders_only_bound_parts() {
        let line = Line {
            status: "Work 1/4 - 25:00".to_string(),
            ..Line::default()
        };
        assert_eq!(render_line(&line, 4), "🍅 Work 1/4 - 25:00");
    }

    #[test]
    fn renders_full_line() {
        let line = Line {
            elapsed: Some("00:10".to_string()),
            status: "Break 2/4 - 02:30".to_string(),
            progress: Some(50),
            mirror: Some("Pomodoro: Break 2/4 - 02:30".to_string()),
            affordance: Some(Affordance::Stop),
        };
        assert_eq!(
            render_line(&line, 4),
            "⏱️  00:10 | 🍅 Break 2/4 - 02:30 | [██░░] 50% | Pomodoro: Break 2/4 - 02:30 | (x) stop (q)uit"
        );
    }

    #[test]
    fn slots_update_the_shared_line() {
        let screen = Screen::new(Box::new(std::io::sink()), 4);
        screen.status().set_text("Status: ready");
        screen.progress().set_percent(30);
        screen.controls().show(Affordance::Start);
        let line = screen.line();
        assert_eq!(line.status, "Status: ready");
        assert_eq!(line.progress, Some(30));
        assert_eq!(line.affordance, Some(Affordance::Start));
        assert_eq!(line.mirror, None);
    }
}
