//! pomo CLI: a Pomodoro timer and elapsed clock on one terminal line.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use clap::{Parser, Subcommand};
use pomo_widget::bindings::Bindings;
use pomo_widget::config::{Locale, Settings, TimerConfig, TimerInputs, config_path};
use pomo_widget::elapsed::ElapsedClock;
use pomo_widget::schedule::{Event, ThreadScheduler};
use pomo_widget::sound::{Chime, HookRunner};
use pomo_widget::telemetry::init_tracing;
use pomo_widget::terminal::Screen;
use pomo_widget::timer::PomodoroTimer;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "pomo", about = "Pomodoro work/break timer")]
struct Cli {
    /// Config file (defaults to ~/.config/pomo/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a Pomodoro run and keep the timer open for start/stop commands
    Start {
        /// Work minutes (invalid values fall back to 25)
        #[arg(long)]
        work: Option<String>,
        /// Break minutes (invalid values fall back to 5)
        #[arg(long = "break")]
        rest: Option<String>,
        /// Number of work/break rounds (invalid values fall back to 4)
        #[arg(long)]
        rounds: Option<String>,
        /// Also show the time elapsed since this timestamp
        #[arg(long)]
        since: Option<String>,
        /// Label language
        #[arg(long, value_enum)]
        locale: Option<LocaleArg>,
        /// Do not play a sound on phase changes
        #[arg(long)]
        no_sound: bool,
        /// Hide the mirrored status
        #[arg(long)]
        no_mirror: bool,
        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// Show the time elapsed since a timestamp
    Elapsed {
        /// ISO-8601 start; counts from now when missing or unparseable
        #[arg(long)]
        since: Option<String>,
    },
    /// Show or create the config file
    Config {
        /// Write an example config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum LocaleArg {
    En,
    Es,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::En => Locale::En,
            LocaleArg::Es => Locale::Es,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing("warn")?;
    let cli = Cli::parse();
    let path = cli.config.unwrap_or_else(config_path);

    match cli.command {
        Command::Start {
            work,
            rest,
            rounds,
            since,
            locale,
            no_sound,
            no_mirror,
            no_progress,
        } => {
            let mut settings = Settings::load_or_default(&path);
            settings.inputs = settings.inputs.overridden_by(TimerInputs { work, rest, rounds });
            if let Some(locale) = locale {
                settings.locale = locale.into();
            }
            settings.sound &= !no_sound;
            settings.display.mirror &= !no_mirror;
            settings.display.progress &= !no_progress;
            cmd_start(settings, since)
        }
        Command::Elapsed { since } => cmd_elapsed(since),
        Command::Config { init } => cmd_config(path, init),
    }
}

fn cmd_start(settings: Settings, since: Option<String>) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut scheduler = ThreadScheduler::new(tx.clone());
    let screen = Screen::stdout(settings.display.progress_width);

    let mut clock = since.map(|since| {
        let mut clock = ElapsedClock::initialize(Some(&since), screen.elapsed());
        clock.attach(&mut scheduler);
        clock
    });

    let mut bindings = Bindings::new(screen.status()).with_controls(screen.controls());
    if settings.display.mirror {
        bindings = bindings.with_mirror(screen.mirror());
    }
    if settings.display.progress {
        bindings = bindings.with_progress(screen.progress());
    }
    if settings.sound {
        bindings = bindings.with_audio(Box::new(Chime));
    }
    bindings = bindings.with_hooks(Box::new(HookRunner::new(settings.hooks.clone())));

    let mut timer = PomodoroTimer::new(bindings, Box::new(scheduler))
        .with_labels(settings.labels())
        .with_cues(settings.cues);
    let config = TimerConfig::from_inputs(&settings.inputs);

    forward_interrupts(tx.clone())?;
    forward_stdin(tx);

    timer.start(config);
    run_loop(&rx, &mut timer, clock.as_mut(), config);
    screen.finish();
    Ok(())
}

/// Drain events until quit. All widget state changes happen here.
fn run_loop(
    rx: &Receiver<Event>,
    timer: &mut PomodoroTimer,
    mut clock: Option<&mut ElapsedClock>,
    config: TimerConfig,
) {
    for event in rx {
        match event {
            Event::Tick { widget, run } if widget == timer.id() => timer.on_tick(run),
            Event::Tick { widget, .. } => {
                if let Some(clock) = clock.as_deref_mut().filter(|clock| clock.id() == widget) {
                    clock.on_tick();
                }
            }
            Event::Start => timer.start(config),
            Event::Stop => timer.stop(),
            Event::Interrupt => {
                info!("interrupted");
                timer.stop();
                break;
            }
            Event::Quit => {
                timer.stop();
                break;
            }
        }
    }
}

fn forward_interrupts(tx: Sender<Event>) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        let _ = tx.send(Event::Interrupt);
    })?;
    Ok(())
}

/// Read start/stop/quit commands from stdin on a helper thread.
fn forward_stdin(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let event = match line.trim() {
                "s" | "start" => Event::Start,
                "x" | "stop" => Event::Stop,
                "q" | "quit" => Event::Quit,
                other => {
                    debug!(input = other, "unknown command");
                    continue;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    });
}

fn cmd_elapsed(since: Option<String>) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut scheduler = ThreadScheduler::new(tx.clone());
    let screen = Screen::stdout(0);
    let mut clock = ElapsedClock::initialize(since.as_deref(), screen.elapsed());
    clock.attach(&mut scheduler);
    forward_interrupts(tx)?;

    for event in rx {
        match event {
            Event::Tick { .. } => clock.on_tick(),
            Event::Interrupt | Event::Quit => break,
            Event::Start | Event::Stop => {}
        }
    }
    screen.finish();
    Ok(())
}

fn cmd_config(path: PathBuf, init: bool) -> anyhow::Result<()> {
    let settings = if init {
        let settings = Settings::init_file(&path)?;
        println!("Wrote {}", path.display());
        settings
    } else {
        Settings::load_or_default(&path)
    };
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
