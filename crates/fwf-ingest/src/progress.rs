//! Progress notifications during long conversions.

use tracing::info;

/// Receives cumulative line counts while a source is being converted.
pub trait ProgressSink {
    /// Called every `progress_interval` lines with the running total.
    fn lines_processed(&mut self, lines: u64);

    /// Called once after the last line.
    fn finish(&mut self, _lines: u64) {}
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn lines_processed(&mut self, _lines: u64) {}
}

/// Reports progress as `tracing` events.
#[derive(Debug, Clone)]
pub struct LogProgress {
    source: String,
}

impl LogProgress {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl ProgressSink for LogProgress {
    fn lines_processed(&mut self, lines: u64) {
        info!(source = %self.source, lines, "lines processed");
    }

    fn finish(&mut self, lines: u64) {
        info!(source = %self.source, lines, "all lines processed");
    }
}
