use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::core::error::{ReporterError, Result};
use crate::core::test::Outcome;

/// Host-level configuration record, as handed to the reporter by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    pub colors: bool,
    pub browser_console_log_options: BrowserConsoleLogOptions,
    pub defer_spec_reporter: Option<ReporterOptions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserConsoleLogOptions {
    pub terminal: bool,
}

/// User overrides for the reporter. Every field is optional; anything left
/// unset falls back to the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReporterOptions {
    pub suppress_passed: Option<bool>,
    pub suppress_failed: Option<bool>,
    pub suppress_skipped: Option<bool>,
    pub deferred: Option<bool>,
    pub prefixes: Option<PrefixOverrides>,
    pub show_spec_timing: Option<bool>,
    #[serde(deserialize_with = "lenient_line_limit")]
    pub max_log_lines: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixOverrides {
    pub success: Option<String>,
    pub failure: Option<String>,
    pub skipped: Option<String>,
}

/// Outcome glyphs prepended to each spec line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes {
    pub success: String,
    pub failure: String,
    pub skipped: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            success: "✓ ".to_string(),
            failure: "✗ ".to_string(),
            skipped: "- ".to_string(),
        }
    }
}

impl Prefixes {
    pub fn get(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Success => &self.success,
            Outcome::Failure => &self.failure,
            Outcome::Skipped => &self.skipped,
        }
    }

    fn merge(&mut self, overrides: &PrefixOverrides) {
        if let Some(success) = &overrides.success {
            self.success = success.clone();
        }
        if let Some(failure) = &overrides.failure {
            self.failure = failure.clone();
        }
        if let Some(skipped) = &overrides.skipped {
            self.skipped = skipped.clone();
        }
    }
}

/// Terminal family the report is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Standard,
    /// Console without extended glyph support (the Windows console).
    LegacyConsole,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::LegacyConsole
        } else {
            Platform::Standard
        }
    }
}

/// Fully resolved reporter options. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub suppress_passed: bool,
    pub suppress_failed: bool,
    pub suppress_skipped: bool,
    pub deferred: bool,
    pub prefixes: Prefixes,
    pub show_spec_timing: bool,
    pub max_log_lines: Option<usize>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            suppress_passed: true,
            suppress_failed: false,
            suppress_skipped: true,
            deferred: true,
            prefixes: Prefixes::default(),
            show_spec_timing: false,
            max_log_lines: None,
        }
    }
}

impl ReporterConfig {
    /// Merge user options over the defaults for the current platform.
    pub fn resolve(options: Option<&ReporterOptions>) -> Self {
        Self::resolve_for(options, Platform::current())
    }

    pub fn resolve_for(options: Option<&ReporterOptions>, platform: Platform) -> Self {
        let mut config = Self::default();

        if let Some(options) = options {
            if let Some(value) = options.suppress_passed {
                config.suppress_passed = value;
            }
            if let Some(value) = options.suppress_failed {
                config.suppress_failed = value;
            }
            if let Some(value) = options.suppress_skipped {
                config.suppress_skipped = value;
            }
            if let Some(value) = options.deferred {
                config.deferred = value;
            }
            if let Some(prefixes) = &options.prefixes {
                config.prefixes.merge(prefixes);
            }
            if let Some(value) = options.show_spec_timing {
                config.show_spec_timing = value;
            }
            config.max_log_lines = options.max_log_lines.filter(|&n| n > 0);
        }

        // Applied after the merge: the legacy console cannot draw the
        // default check and cross glyphs whatever the user asked for.
        if platform == Platform::LegacyConsole {
            config.prefixes.success = "\u{221A} ".to_string();
            config.prefixes.failure = "\u{00D7} ".to_string();
        }

        config
    }

    pub fn is_suppressed(&self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Success => self.suppress_passed,
            Outcome::Failure => self.suppress_failed,
            Outcome::Skipped => self.suppress_skipped,
        }
    }
}

impl HostConfig {
    /// Load a host config from disk. `.toml` files are parsed as TOML,
    /// anything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReporterError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
            toml::from_str::<Self>(&contents)
                .map_err(|e| ReporterError::Config(format!("Failed to parse TOML config: {}", e)))?
        } else {
            serde_json::from_str::<Self>(&contents)
                .map_err(|e| ReporterError::Config(format!("Failed to parse JSON config: {}", e)))?
        };

        Ok(config)
    }

    pub fn reporter_config(&self) -> ReporterConfig {
        ReporterConfig::resolve(self.defer_spec_reporter.as_ref())
    }

    pub fn browser_log_enabled(&self) -> bool {
        self.browser_console_log_options.terminal
    }
}

/// Accepts a positive integer, a float (truncated), or a numeric string.
/// Anything else disables truncation instead of failing the whole config.
fn lenient_line_limit<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let limit = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(|n| n as usize)
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as usize)),
        serde_json::Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    Ok(limit.filter(|&n| n > 0))
}
