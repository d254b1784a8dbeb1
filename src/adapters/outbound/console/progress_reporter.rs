use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

const BAR_TEMPLATE: &str = "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) - {msg}";

/// StderrProgressReporter adapter for reporting pipeline steps to stderr
///
/// Step messages go to stderr so stdout stays machine-readable (JSON and
/// NDJSON results). Batch progress is drawn with an indicatif bar; in quiet
/// mode only errors are printed.
pub struct StderrProgressReporter {
    progress_bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: Mutex::new(None),
            quiet: false,
        }
    }

    pub fn quiet() -> Self {
        Self {
            progress_bar: Mutex::new(None),
            quiet: true,
        }
    }

    fn bar(&self, total: usize) -> Option<ProgressBar> {
        let mut slot = self.progress_bar.lock().ok()?;
        if let Some(pb) = slot.as_ref() {
            return Some(pb.clone());
        }

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        *slot = Some(pb.clone());
        Some(pb)
    }

    fn finish_bar(&self) {
        if let Ok(mut slot) = self.progress_bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }

    /// Prints without tearing an active progress bar
    fn print(&self, message: &str) {
        let active = self
            .progress_bar
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().cloned());
        match active {
            Some(pb) => pb.suspend(|| eprintln!("{}", message)),
            None => eprintln!("{}", message),
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        if !self.quiet {
            self.print(message);
        }
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        if self.quiet {
            return;
        }
        let Some(pb) = self.bar(total) else {
            return;
        };
        pb.set_position(current as u64);
        if let Some(msg) = message {
            pb.set_message(msg.to_string());
        }
        if current >= total {
            self.finish_bar();
        }
    }

    fn report_error(&self, message: &str) {
        self.print(message);
    }

    fn report_completion(&self, message: &str) {
        self.finish_bar();
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reporter_lifecycle() {
        let reporter = StderrProgressReporter::new();
        reporter.report("Resolving package");
        reporter.report_progress(1, 3, Some("https://github.com/a/b"));
        reporter.report_error("could not score");
        reporter.report_progress(3, 3, None);
        assert!(reporter.progress_bar.lock().unwrap().is_none());
        reporter.report_completion("done");
    }

    #[test]
    fn test_quiet_reporter_never_creates_bar() {
        let reporter = StderrProgressReporter::quiet();
        reporter.report_progress(1, 10, Some("x"));
        assert!(reporter.progress_bar.lock().unwrap().is_none());
    }
}
