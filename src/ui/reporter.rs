//! Console step reporter
//!
//! Prints each step title, then its status on the same line:
//!
//! ```text
//! PRE DEPLOY
//! · checking git repo... OK
//! · checking deployment... WARNING
//!   unable to find deployed id
//! ```
//!
//! Dry-run calls interrupt the open line and are listed beneath it.

use std::cell::Cell;
use std::io::Write;

use crossterm::style::{Color, Stylize};

use hoist::domain::ports::{StepEvent, StepReporter};
use hoist::domain::value_objects::StepOutcome;

use super::terminal::TerminalCapabilities;
use super::theme;

pub struct ConsoleReporter {
    caps: TerminalCapabilities,
    line_open: Cell<bool>,
}

impl ConsoleReporter {
    pub fn new(caps: TerminalCapabilities) -> Self {
        Self {
            caps,
            line_open: Cell::new(false),
        }
    }

    fn emit(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn close_line(&self) {
        if self.line_open.replace(false) {
            self.emit("\n");
        }
    }
}

impl StepReporter for ConsoleReporter {
    fn on_event(&self, event: StepEvent<'_>) {
        match event {
            StepEvent::Stage { name } => {
                self.close_line();
                self.emit(&format!("{}\n", render_stage(name, self.caps.supports_color)));
            }
            StepEvent::Note { message } => {
                self.close_line();
                self.emit(&format!("{}\n", message));
            }
            StepEvent::StepStarted { title } => {
                self.close_line();
                self.emit(title);
                self.line_open.set(true);
            }
            StepEvent::StepFinished { title, outcome } => {
                let status = render_outcome(outcome, self.caps.supports_color);
                if self.line_open.replace(false) {
                    self.emit(&format!(" {}\n", status));
                } else {
                    self.emit(&format!("{} {}\n", title, status));
                }
            }
            StepEvent::DryRun { call } => {
                self.close_line();
                self.emit(&format!(
                    "{}\n",
                    render_dry_run(call, self.caps.supports_color, self.caps.supports_unicode)
                ));
            }
        }
    }
}

fn paint(text: &str, color: Color, supports_color: bool) -> String {
    if supports_color {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

pub fn render_stage(name: &str, supports_color: bool) -> String {
    if supports_color {
        format!("{}", name.bold())
    } else {
        name.to_string()
    }
}

/// Status printed after a step title
pub fn render_outcome(outcome: &StepOutcome, supports_color: bool) -> String {
    match outcome {
        StepOutcome::Success => paint(theme::labels::OK, theme::colors::SUCCESS, supports_color),
        StepOutcome::Warning(message) => format!(
            "{}\n  {}",
            paint(theme::labels::WARNING, theme::colors::WARNING, supports_color),
            paint(message, theme::colors::WARNING, supports_color)
        ),
        StepOutcome::Fatal(_) => paint(theme::labels::FAILED, theme::colors::ERROR, supports_color),
    }
}

/// Final line of a successful run
pub fn render_complete(elapsed: &str, supports_color: bool) -> String {
    format!(
        "{} ({})",
        paint("deployment complete", theme::colors::SUCCESS, supports_color),
        elapsed
    )
}

pub fn render_dry_run(call: &str, supports_color: bool, supports_unicode: bool) -> String {
    let arrow = if supports_unicode {
        theme::icons::ARROW
    } else {
        theme::icons_ascii::ARROW
    };
    format!("  {} {}", arrow, paint(call, theme::colors::DIM, supports_color))
}
