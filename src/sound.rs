//! Terminal audio cue and shell phase hooks.

use std::io::Write;
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::bindings::{AudioCue, Cue, PhaseHooks};
use crate::config::Hooks;
use crate::error::{Error, Result};
use crate::timer::Phase;

const MACOS_SOUNDS: &[&str] = &[
    "/System/Library/Sounds/Glass.aiff",
    "/System/Library/Sounds/Ping.aiff",
    "/System/Library/Sounds/Pop.aiff",
    "/System/Library/Sounds/Purr.aiff",
];

const LINUX_SOUNDS: &[&str] = &[
    "/usr/share/sounds/alsa/Front_Left.wav",
    "/usr/share/sounds/sound-icons/bell.wav",
    "/usr/share/sounds/gnome/default/alerts/glass.ogg",
];

/// Plays a system sound, falling back to the terminal bell.
#[derive(Debug, Default)]
pub struct Chime;

impl AudioCue for Chime {
    fn play(&mut self, cue: Cue) -> Result<()> {
        debug!(?cue, "playing chime");
        thread::Builder::new()
            .name("pomo-chime".to_string())
            .spawn(|| {
                if !play_system_sound() {
                    let mut stdout = std::io::stdout();
                    let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
                }
            })
            .map(|_| ())
            .map_err(|err| Error::Audio(err.to_string()))
    }
}

fn play_with(player: &str, sound: &str) -> bool {
    Command::new(player)
        .arg(sound)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn play_system_sound() -> bool {
    if cfg!(target_os = "macos") {
        MACOS_SOUNDS.iter().any(|sound| play_with("afplay", sound))
            || play_with("say", "Time up")
    } else if cfg!(target_os = "linux") {
        LINUX_SOUNDS.iter().any(|sound| play_with("paplay", sound))
            || LINUX_SOUNDS.iter().any(|sound| play_with("aplay", sound))
    } else {
        false
    }
}

/// Runs the configured shell hooks when phases begin and end.
#[derive(Debug, Clone)]
pub struct HookRunner {
    hooks: Hooks,
}

impl HookRunner {
    pub fn new(hooks: Hooks) -> Self {
        Self { hooks }
    }

    /// Hooks to run for `from -> to`, in order: the ending one first.
    pub fn commands_for(&self, from: Phase, to: Phase) -> Vec<&str> {
        let ending = match from {
            Phase::Work => self.hooks.work_end.as_deref(),
            Phase::Break => self.hooks.break_end.as_deref(),
            Phase::Idle | Phase::Completed => None,
        };
        let starting = match to {
            Phase::Work => self.hooks.work_start.as_deref(),
            Phase::Break => self.hooks.break_start.as_deref(),
            Phase::Idle | Phase::Completed => None,
        };
        ending
            .into_iter()
            .chain(starting)
            .filter(|command| is_runnable(command))
            .collect()
    }
}

/// Empty and `#`-commented hooks are skipped.
pub fn is_runnable(command: &str) -> bool {
    let command = command.trim();
    !command.is_empty() && !command.starts_with('#')
}

impl PhaseHooks for HookRunner {
    fn on_transition(&mut self, from: Phase, to: Phase) -> Result<()> {
        for command in self.commands_for(from, to) {
            run_hook(command)?;
        }
        Ok(())
    }
}

/// Run `command` through `sh` on a helper thread that waits for it, so no
/// child outlives its hook. The handle yields the exit status.
pub fn run_hook(command: &str) -> Result<JoinHandle<Option<ExitStatus>>> {
    info!(command, "running hook");
    let owned = command.to_string();
    thread::Builder::new()
        .name("pomo-hook".to_string())
        .spawn(move || match Command::new("sh").arg("-c").arg(&owned).status() {
            Ok(status) => {
                if !status.success() {
                    warn!(command = %owned, %status, "hook exited with failure");
                }
                Some(status)
            }
            Err(err) => {
                warn!(command = %owned, error = %err, "hook could not be started");
                None
            }
        })
        .map_err(|source| Error::Hook {
            command: command.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> HookRunner {
        HookRunner::new(Hooks {
            work_start: Some("echo work".to_string()),
            work_end: Some("# pkill afplay".to_string()),
            break_start: Some("echo break".to_string()),
            break_end: Some("  ".to_string()),
        })
    }

    #[test]
    fn commented_and_empty_hooks_are_skipped() {
        assert!(!is_runnable("# afplay focus.mp3"));
        assert!(!is_runnable("   "));
        assert!(is_runnable("afplay focus.mp3"));
    }

    #[test]
    fn maps_transitions_to_hooks() {
        let runner = runner();
        assert_eq!(runner.commands_for(Phase::Idle, Phase::Work), vec!["echo work"]);
        assert_eq!(runner.commands_for(Phase::Work, Phase::Break), vec!["echo break"]);
        assert_eq!(runner.commands_for(Phase::Break, Phase::Work), vec!["echo work"]);
        assert!(runner.commands_for(Phase::Break, Phase::Completed).is_empty());
    }

    #[test]
    fn hooks_are_waited_on() {
        let status = run_hook("exit 3").unwrap().join().unwrap().unwrap();
        assert_eq!(status.code(), Some(3));

        let status = run_hook("true").unwrap().join().unwrap().unwrap();
        assert!(status.success());
    }
}
