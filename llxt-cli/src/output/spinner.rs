//! Indeterminate progress spinner on stderr.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

/// Spinner shown while a fetch is in flight.
///
/// Draws to stderr so stdout carries only fetched content. Hidden when
/// stderr is not a terminal.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Starts a spinner with `message`.
    pub fn start(message: impl Into<String>) -> Self {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .map_or_else(|_| ProgressStyle::default_spinner(), |s| s.tick_chars(TICK));
        pb.set_style(style);
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    /// A spinner that never draws.
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    /// Stops the spinner, marking the task done.
    pub fn finish_done(&self, message: impl Into<String>) {
        self.pb.finish_with_message(format!("✓ {}", message.into()));
    }

    /// Stops the spinner, marking the task failed.
    pub fn finish_errored(&self, message: impl Into<String>) {
        self.pb.abandon_with_message(format!("✗ {}", message.into()));
    }
}
