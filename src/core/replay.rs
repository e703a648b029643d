use std::io::BufRead;
use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::core::error::{ReporterError, Result};
use crate::core::test::{ExecutionTarget, RunResults, TestResult};
use crate::reporters::Reporter;

/// One event emitted by a test host, as recorded in a JSON Lines stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    RunStart {
        #[serde(default)]
        browsers: Vec<ExecutionTarget>,
    },
    BrowserStart {
        browser: ExecutionTarget,
    },
    SpecComplete {
        browser: ExecutionTarget,
        result: TestResult,
    },
    BrowserLog {
        browser: ExecutionTarget,
        log: String,
        #[serde(rename = "logType", default = "default_log_type")]
        log_type: String,
    },
    BrowserError {
        browser: ExecutionTarget,
        error: String,
    },
    RunComplete {
        #[serde(default)]
        browsers: Vec<ExecutionTarget>,
        results: RunResults,
    },
}

fn default_log_type() -> String {
    "log".to_string()
}

/// What a replay went through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub runs: usize,
    pub last_results: Option<RunResults>,
}

impl ReplaySummary {
    /// Whether the last completed run should count as a failure. A host
    /// supplied exit code takes precedence over the tallies.
    pub fn failed(&self) -> bool {
        self.last_results
            .as_ref()
            .map(|r| match r.exit_code {
                Some(code) => code != 0,
                None => r.failed > 0 || r.error || r.disconnected,
            })
            .unwrap_or(false)
    }
}

/// Parse one event line. `line` is 1-based and only used for errors.
pub fn parse_event(raw: &str, line: usize) -> Result<HostEvent> {
    serde_json::from_str(raw).map_err(|source| ReporterError::Parse { line, source })
}

/// Hand one event to the reporter.
pub fn dispatch(reporter: &mut dyn Reporter, event: &HostEvent) {
    match event {
        HostEvent::RunStart { browsers } => reporter.on_run_start(browsers),
        HostEvent::BrowserStart { browser } => reporter.on_browser_start(browser),
        HostEvent::SpecComplete { browser, result } => reporter.on_spec_complete(browser, result),
        HostEvent::BrowserLog { browser, log, log_type } => {
            reporter.on_browser_log(browser, log, log_type)
        }
        HostEvent::BrowserError { browser, error } => reporter.on_browser_error(browser, error),
        HostEvent::RunComplete { browsers, results } => reporter.on_run_complete(browsers, results),
    }
}

/// Feed a JSON Lines event stream to a reporter, in order. Blank lines are
/// skipped; the first malformed line stops the replay.
pub fn replay<R: BufRead>(reader: R, reporter: &mut dyn Reporter) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event = parse_event(&line, index + 1)?;
        debug!("Replaying event {}: {:?}", index + 1, event);
        dispatch(reporter, &event);

        summary.events += 1;
        if let HostEvent::RunComplete { results, .. } = event {
            summary.runs += 1;
            summary.last_results = Some(results);
        }
    }

    info!("Replayed {} events across {} runs", summary.events, summary.runs);
    Ok(summary)
}
