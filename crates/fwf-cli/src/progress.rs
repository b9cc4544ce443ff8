//! Terminal progress spinner for long conversions.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use fwf_ingest::ProgressSink;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg} {human_pos} lines [{elapsed_precise}]";

/// Spinner on stderr showing the running line count.
///
/// indicatif hides the spinner when stderr is not a terminal; counts are
/// also logged at `info` so they reach log files.
pub struct SpinnerProgress {
    bar: ProgressBar,
    source: String,
}

impl SpinnerProgress {
    pub fn new(source: &Path) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(format!("Converting {}", source.display()));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            source: source.display().to_string(),
        }
    }
}

impl ProgressSink for SpinnerProgress {
    fn lines_processed(&mut self, lines: u64) {
        self.bar.set_position(lines);
        info!(source = %self.source, lines, "lines processed");
    }

    fn finish(&mut self, lines: u64) {
        self.bar.set_position(lines);
        self.bar
            .finish_with_message(format!("Converted {}", self.source));
    }
}

impl Drop for SpinnerProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
