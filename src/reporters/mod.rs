pub mod base;
pub mod defer_spec;
pub mod format;
pub mod style;
pub mod suite_path;

use crate::core::test::{ExecutionTarget, RunResults, TestResult};

/// Reporter trait for receiving host events
pub trait Reporter {
    /// A run is starting on the given targets
    fn on_run_start(&mut self, _targets: &[ExecutionTarget]) {}

    /// A target connected and will report results for the current run
    fn on_browser_start(&mut self, _target: &ExecutionTarget) {}

    /// A single spec finished on a target
    fn on_spec_complete(&mut self, target: &ExecutionTarget, result: &TestResult);

    /// Console output captured from a target
    fn on_browser_log(&mut self, _target: &ExecutionTarget, _log: &str, _kind: &str) {}

    /// A target failed outside of any spec
    fn on_browser_error(&mut self, _target: &ExecutionTarget, _error: &str) {}

    /// The run finished on every target
    fn on_run_complete(&mut self, targets: &[ExecutionTarget], results: &RunResults);
}
