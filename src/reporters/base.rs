use std::fmt;
use std::io::{self, Write};
use log::warn;

use crate::core::test::ExecutionTarget;
use crate::reporters::style::Palette;

/// Shared output plumbing for reporters: owns the sink, tracks the
/// execution targets of the current run and renders their status lines.
pub struct BaseReporter<W: Write> {
    sink: W,
    palette: Palette,
    targets: Vec<ExecutionTarget>,
}

impl BaseReporter<io::Stdout> {
    /// Reporter base writing to the process's standard output.
    pub fn stdout(palette: Palette) -> Self {
        Self::new(io::stdout(), palette)
    }
}

impl<W: Write> BaseReporter<W> {
    pub fn new(sink: W, palette: Palette) -> Self {
        Self {
            sink,
            palette,
            targets: Vec::new(),
        }
    }

    /// Write a templated message.
    pub fn write(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.sink.write_fmt(args).and_then(|_| self.sink.flush()) {
            warn!("Failed to write report output: {}", e);
        }
    }

    /// Write an already rendered message verbatim.
    pub fn write_common_msg(&mut self, msg: &str) {
        self.write(format_args!("{}", msg));
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn register_target(&mut self, target: &ExecutionTarget) {
        if !self.targets.iter().any(|t| t.id == target.id) {
            self.targets.push(target.clone());
        }
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// One status line for a target, e.g.
    /// `Chrome: Executed 3 of 4 (1 FAILED) SUCCESS (0.2 secs / 0.1 secs)`.
    pub fn render_browser(&self, target: &ExecutionTarget) -> String {
        let results = &target.last_result;
        let mut msg = format!(
            "{}: Executed {} of {}",
            target,
            results.success.saturating_add(results.failed),
            results.total
        );

        if results.failed > 0 {
            msg.push_str(&self.palette.x_failed(results.failed));
        }
        if results.skipped > 0 {
            msg.push_str(&self.palette.x_skipped(results.skipped));
        }

        if target.connected {
            if results.disconnected {
                msg.push_str(&self.palette.finished_disconnected());
            } else if results.error {
                msg.push_str(&self.palette.finished_error());
            } else {
                msg.push_str(&self.palette.finished_success());
            }
            msg.push_str(&format!(
                " ({} / {})",
                format_time_interval(results.total_time),
                format_time_interval(results.net_time)
            ));
        }

        msg
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

/// Human form of a millisecond interval: `1 min 2.5 secs`, `0.042 secs`.
pub fn format_time_interval(millis: f64) -> String {
    let mins = (millis / 60_000.0).floor();
    let secs = (millis - mins * 60_000.0) / 1000.0;

    let mut out = format!("{} {}", secs, if secs == 1.0 { "sec" } else { "secs" });
    if mins > 0.0 {
        out = format!("{} {} {}", mins, if mins == 1.0 { "min" } else { "mins" }, out);
    }
    out
}
