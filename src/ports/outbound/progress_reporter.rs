/// ProgressReporter port for user-facing pipeline feedback
///
/// Used by the CLI to show which ingestion stage is running. Diagnostic
/// detail goes to `tracing` instead.
pub trait ProgressReporter {
    /// Reports a pipeline step
    ///
    /// # Arguments
    /// * `message` - The step description
    fn report(&self, message: &str);

    /// Reports progress through a batch (e.g. URLs being scored)
    ///
    /// # Arguments
    /// * `current` - Items completed so far
    /// * `total` - Total number of items
    /// * `message` - Optional label for the current item
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning or a failed step
    fn report_error(&self, message: &str);

    /// Reports that the operation finished
    fn report_completion(&self, message: &str);
}
