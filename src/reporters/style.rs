use colored::Color;

use crate::core::test::Outcome;

/// Message templates and colors for one reporter instance.
/// Built once from the host's `colors` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: bool,
}

impl Palette {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Wraps `text` in the foreground escape for `color`. The escape is
    /// written directly so the result does not depend on tty detection.
    fn paint(&self, text: &str, color: Color) -> String {
        if self.colors {
            format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), text)
        } else {
            text.to_string()
        }
    }

    /// Outcome glyph, green/yellow/red under colors.
    pub fn prefix(&self, outcome: Outcome, prefix: &str) -> String {
        let color = match outcome {
            Outcome::Success => Color::Green,
            Outcome::Skipped => Color::Yellow,
            Outcome::Failure => Color::Red,
        };
        self.paint(prefix, color)
    }

    /// Spec description. Successful specs keep the terminal's default color.
    pub fn description(&self, outcome: Outcome, description: &str) -> String {
        match outcome {
            Outcome::Success => description.to_string(),
            Outcome::Skipped => self.paint(description, Color::Cyan),
            Outcome::Failure => self.paint(description, Color::Red),
        }
    }

    pub fn console_log(&self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }

    pub fn total_success(&self, success: u32) -> String {
        format!("{}\n", self.paint(&format!("TOTAL: {} SUCCESS", success), Color::Green))
    }

    pub fn total_failed(&self, failed: u32, success: u32) -> String {
        format!(
            "{}\n",
            self.paint(&format!("TOTAL: {} FAILED, {} SUCCESS", failed, success), Color::Red)
        )
    }

    pub fn target_error(&self, target: &str) -> String {
        format!("{}\n", self.paint(&format!("{} ERROR", target), Color::Red))
    }

    pub fn x_failed(&self, failed: u32) -> String {
        self.paint(&format!(" ({} FAILED)", failed), Color::Red)
    }

    pub fn x_skipped(&self, skipped: u32) -> String {
        format!(" (skipped {})", skipped)
    }

    pub fn finished_success(&self) -> String {
        self.paint(" SUCCESS", Color::Green)
    }

    pub fn finished_error(&self) -> String {
        self.paint(" ERROR", Color::Red)
    }

    pub fn finished_disconnected(&self) -> String {
        self.paint(" DISCONNECTED", Color::Red)
    }
}
