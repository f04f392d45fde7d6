//! Countdown timer commands.
//!
//! `timer run` is the single tick source: one loop, one sleep per second.
//! The engine itself never owns a clock, so a fresh invocation can never
//! stack intervals on top of an old one.

use std::io::Write;

use clap::Subcommand;
use studytrack_core::data::format_time;
use studytrack_core::{CountdownTimer, Event, NewSession, TimerMode};

use super::open_repository;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown in the foreground; records a study session on
    /// completion
    Run {
        /// Preset: pomodoro, short or long
        #[arg(long, default_value = "pomodoro")]
        mode: String,
        /// Subject ID to credit on completion
        #[arg(long)]
        subject: Option<u32>,
    },
    /// Show the preset durations
    Presets,
}

fn parse_mode(arg: &str) -> Result<TimerMode, Box<dyn std::error::Error>> {
    match arg.to_ascii_lowercase().as_str() {
        "pomodoro" => Ok(TimerMode::Pomodoro),
        "short" => Ok(TimerMode::ShortBreak),
        "long" => Ok(TimerMode::LongBreak),
        other => Err(format!("unknown mode '{other}' (expected pomodoro, short or long)").into()),
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { mode, subject } => {
            let mode = parse_mode(&mode)?;
            let repo = open_repository()?;
            let mut timer = CountdownTimer::new(mode);
            timer.set_subject(subject);
            timer.start();

            println!("{} - {}", mode.label(), format_time(timer.remaining_secs()));
            loop {
                std::thread::sleep(std::time::Duration::from_secs(1));
                match timer.tick() {
                    Some(Event::TimerCompleted {
                        hours, subject_id, ..
                    }) => {
                        println!("\rDone. Logging {hours:.2}h.                ");
                        let session = repo.add_session(NewSession {
                            date: chrono::Utc::now()
                                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                            duration: hours,
                            subject_id,
                        })?;
                        println!("Recorded session {}", session.id);
                        break;
                    }
                    _ => {
                        print!(
                            "\r{}  {:>3.0}%  ",
                            format_time(timer.remaining_secs()),
                            timer.progress() * 100.0
                        );
                        std::io::stdout().flush()?;
                    }
                }
            }
        }
        TimerAction::Presets => {
            for mode in [TimerMode::Pomodoro, TimerMode::ShortBreak, TimerMode::LongBreak] {
                println!(
                    "{:<12} {}",
                    mode.label(),
                    format_time(mode.duration_secs())
                );
            }
        }
    }

    Ok(())
}
