use std::borrow::Cow;

use crate::core::config::ReporterConfig;
use crate::core::test::TestResult;
use crate::reporters::style::Palette;

/// Indentation handed to the error formatter for log blocks.
pub const LOG_INDENT: &str = "\t";

/// Formats one log entry of a spec (usually an assertion message with a
/// stack trace) for display under the spec line.
pub trait ErrorFormatter {
    fn format_error(&self, log: &str, indent: &str) -> String;
}

impl<F> ErrorFormatter for F
where
    F: Fn(&str, &str) -> String,
{
    fn format_error(&self, log: &str, indent: &str) -> String {
        self(log, indent)
    }
}

/// Default formatter: indents every line and terminates the block.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentingErrorFormatter;

impl ErrorFormatter for IndentingErrorFormatter {
    fn format_error(&self, log: &str, indent: &str) -> String {
        let body = log.strip_suffix('\n').unwrap_or(log);
        let mut out = String::with_capacity(body.len() + indent.len() * 4);
        for (i, line) in body.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
        out
    }
}

/// Keep only the first `max_lines` lines of a log entry.
pub fn truncate_log(log: &str, max_lines: Option<usize>) -> Cow<'_, str> {
    match max_lines {
        Some(max) if max > 0 => {
            if log.split('\n').nth(max).is_none() {
                Cow::Borrowed(log)
            } else {
                Cow::Owned(log.split('\n').take(max).collect::<Vec<_>>().join("\n"))
            }
        }
        _ => Cow::Borrowed(log),
    }
}

/// Build the printable line for one spec: indent, prefix, description,
/// optional timing, then every log entry on its own block.
pub fn format_spec_line(
    result: &TestResult,
    prefix: &str,
    indent: &str,
    config: &ReporterConfig,
    palette: &Palette,
    formatter: &dyn ErrorFormatter,
) -> String {
    let description = palette.description(result.outcome(), &result.description);
    let mut line = format!("{}{}{}", indent, prefix, description);

    if config.show_spec_timing {
        line.push_str(&format!(" ({}ms)", result.time));
    }

    for log in &result.log {
        let log = truncate_log(log, config.max_log_lines);
        line.push('\n');
        line.push_str(&formatter.format_error(&log, LOG_INDENT));
    }

    line
}
