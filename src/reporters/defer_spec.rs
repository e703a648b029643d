use std::io::{self, Write};
use log::{debug, trace};

use crate::core::config::{HostConfig, ReporterConfig};
use crate::core::test::{ExecutionTarget, Outcome, RunResults, TestResult};
use crate::reporters::base::BaseReporter;
use crate::reporters::format::{format_spec_line, ErrorFormatter, IndentingErrorFormatter, LOG_INDENT};
use crate::reporters::style::Palette;
use crate::reporters::suite_path::SuitePath;
use crate::reporters::Reporter;

/// Where a render action writes its spec line.
pub trait SpecOutput {
    fn write_spec(&mut self, prefix: &str, result: &TestResult);
}

/// A spec line waiting to be printed. It owns everything it needs and only
/// borrows the output when it finally runs.
pub type RenderAction = Box<dyn FnOnce(&mut dyn SpecOutput)>;

fn deferred_render(prefix: String, result: TestResult) -> RenderAction {
    Box::new(move |out: &mut dyn SpecOutput| out.write_spec(&prefix, &result))
}

/// FIFO of render actions collected during a run.
#[derive(Default)]
pub struct DeferredQueue {
    actions: Vec<RenderAction>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: RenderAction) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every action in enqueue order and empty the queue.
    pub fn drain(&mut self, out: &mut dyn SpecOutput) -> usize {
        let actions = std::mem::take(&mut self.actions);
        let count = actions.len();
        for action in actions {
            action(&mut *out);
        }
        count
    }

    /// Drop every action without running it.
    pub fn discard(&mut self) -> usize {
        let count = self.actions.len();
        self.actions.clear();
        count
    }
}

/// What to do with a spec of a given outcome, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecHandler {
    NoOp,
    Render { prefix: String },
}

impl SpecHandler {
    pub fn select(outcome: Outcome, config: &ReporterConfig, palette: &Palette) -> Self {
        if config.is_suppressed(outcome) {
            SpecHandler::NoOp
        } else {
            SpecHandler::Render {
                prefix: palette.prefix(outcome, config.prefixes.get(outcome)),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Draining,
}

/// Spec-line writer: sink, suite path and formatting collaborators.
struct SpecWriter<W: Write> {
    base: BaseReporter<W>,
    config: ReporterConfig,
    formatter: Box<dyn ErrorFormatter>,
    suite: SuitePath,
}

impl<W: Write> SpecOutput for SpecWriter<W> {
    fn write_spec(&mut self, prefix: &str, result: &TestResult) {
        let rendered = self.suite.advance(&result.suite);
        for line in &rendered.lines {
            self.base.write(format_args!("{}\n", line));
        }

        let palette = self.base.palette();
        let line = format_spec_line(
            result,
            prefix,
            &rendered.spec_indent,
            &self.config,
            &palette,
            self.formatter.as_ref(),
        );
        self.base.write(format_args!("{}\n", line));
    }
}

/// Hierarchical spec reporter that holds back spec lines until the run is
/// over, and only prints them when something failed.
pub struct DeferSpecReporter<W: Write> {
    writer: SpecWriter<W>,
    queue: DeferredQueue,
    success: SpecHandler,
    failure: SpecHandler,
    skipped: SpecHandler,
    browser_log: bool,
    state: RunState,
}

impl DeferSpecReporter<io::Stdout> {
    /// Reporter printing to stdout with the default error formatter.
    pub fn stdout(host: &HostConfig) -> Self {
        let base = BaseReporter::stdout(Palette::new(host.colors));
        Self::with_config(
            base,
            Box::new(IndentingErrorFormatter),
            host.reporter_config(),
            host.browser_log_enabled(),
        )
    }
}

impl<W: Write> DeferSpecReporter<W> {
    pub fn new(sink: W, formatter: Box<dyn ErrorFormatter>, host: &HostConfig) -> Self {
        let base = BaseReporter::new(sink, Palette::new(host.colors));
        Self::with_config(base, formatter, host.reporter_config(), host.browser_log_enabled())
    }

    pub fn with_config(
        base: BaseReporter<W>,
        formatter: Box<dyn ErrorFormatter>,
        config: ReporterConfig,
        browser_log: bool,
    ) -> Self {
        let palette = base.palette();
        let success = SpecHandler::select(Outcome::Success, &config, &palette);
        let failure = SpecHandler::select(Outcome::Failure, &config, &palette);
        let skipped = SpecHandler::select(Outcome::Skipped, &config, &palette);
        debug!(
            "Reporter configured: deferred={}, success={:?}, failure={:?}, skipped={:?}",
            config.deferred, success, failure, skipped
        );

        Self {
            writer: SpecWriter {
                base,
                config,
                formatter,
                suite: SuitePath::new(),
            },
            queue: DeferredQueue::new(),
            success,
            failure,
            skipped,
            browser_log,
            state: RunState::Idle,
        }
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.writer.config
    }

    pub fn handler(&self, outcome: Outcome) -> &SpecHandler {
        match outcome {
            Outcome::Success => &self.success,
            Outcome::Failure => &self.failure,
            Outcome::Skipped => &self.skipped,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of spec lines waiting for the end of the run.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn suite_path(&self) -> &[String] {
        self.writer.suite.as_slice()
    }

    pub fn sink(&self) -> &W {
        self.writer.base.sink()
    }

    pub fn into_sink(self) -> W {
        self.writer.base.into_sink()
    }

    fn begin_run(&mut self) {
        if self.state == RunState::Idle {
            debug!("Run started");
            self.state = RunState::Running;
        }
    }

    fn write_summary(&mut self, targets: &[ExecutionTarget], results: &RunResults) {
        if targets.is_empty() || results.disconnected || results.error {
            return;
        }

        let palette = self.writer.base.palette();
        if results.failed == 0 {
            self.writer.base.write_common_msg(&palette.total_success(results.success));
        } else {
            let drained = self.queue.drain(&mut self.writer);
            debug!("Printed {} deferred spec lines", drained);
            self.writer
                .base
                .write_common_msg(&palette.total_failed(results.failed, results.success));
        }
    }
}

impl<W: Write> Reporter for DeferSpecReporter<W> {
    fn on_run_start(&mut self, targets: &[ExecutionTarget]) {
        let stale = self.queue.discard();
        if stale > 0 {
            debug!("Dropped {} spec lines left over from an unfinished run", stale);
        }
        self.writer.suite.reset();
        self.writer.base.clear_targets();
        for target in targets {
            self.writer.base.register_target(target);
        }
        self.state = RunState::Idle;
        self.begin_run();
    }

    fn on_browser_start(&mut self, target: &ExecutionTarget) {
        self.writer.base.register_target(target);
    }

    fn on_spec_complete(&mut self, target: &ExecutionTarget, result: &TestResult) {
        self.begin_run();

        let handler = match result.outcome() {
            Outcome::Success => &self.success,
            Outcome::Failure => &self.failure,
            Outcome::Skipped => &self.skipped,
        };
        let SpecHandler::Render { prefix } = handler else {
            return;
        };

        trace!("{}: {:?} {}", target, result.outcome(), result.description);
        if self.writer.config.deferred {
            self.queue.push(deferred_render(prefix.clone(), result.clone()));
        } else {
            self.writer.write_spec(prefix, result);
        }
    }

    fn on_browser_log(&mut self, target: &ExecutionTarget, log: &str, kind: &str) {
        if !self.browser_log {
            return;
        }

        let text = self.writer.base.palette().console_log(log);
        let kind = kind.to_uppercase();
        if self.writer.base.target_count() == 1 {
            self.writer.base.write(format_args!("{} LOG: {}\n", kind, text));
        } else {
            self.writer
                .base
                .write(format_args!("{} {} LOG: {}\n", target, kind, text));
        }
    }

    fn on_browser_error(&mut self, target: &ExecutionTarget, error: &str) {
        let palette = self.writer.base.palette();
        let header = palette.target_error(&target.to_string());
        let body = self.writer.formatter.format_error(error, LOG_INDENT);
        self.writer.base.write_common_msg(&format!("{}{}", header, body));
    }

    fn on_run_complete(&mut self, targets: &[ExecutionTarget], results: &RunResults) {
        self.state = RunState::Draining;

        let statuses = targets
            .iter()
            .map(|target| self.writer.base.render_browser(target))
            .collect::<Vec<_>>();
        self.writer
            .base
            .write_common_msg(&format!("\n{}\n", statuses.join("\n")));

        self.write_summary(targets, results);

        let discarded = self.queue.discard();
        if discarded > 0 {
            debug!("Discarded {} deferred spec lines", discarded);
        }

        self.writer.base.write_common_msg("\n");
        self.writer.suite.reset();
        self.state = RunState::Idle;
    }
}
