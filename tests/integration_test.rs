use std::process::Command;

use deferspec::core::config::{Platform, ReporterConfig, ReporterOptions};
use deferspec::core::replay;
use deferspec::reporters::base::BaseReporter;
use deferspec::reporters::format::IndentingErrorFormatter;
use deferspec::reporters::style::Palette;
use deferspec::{DeferSpecReporter, ExecutionTarget, Reporter, RunResults, TestResult};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn deferspec() -> Command {
    Command::new(env!("CARGO_BIN_EXE_deferspec"))
}

fn reporter(options: ReporterOptions) -> DeferSpecReporter<Vec<u8>> {
    let config = ReporterConfig::resolve_for(Some(&options), Platform::Standard);
    let base = BaseReporter::new(Vec::new(), Palette::new(false));
    DeferSpecReporter::with_config(base, Box::new(IndentingErrorFormatter), config, false)
}

fn spec(suite: &[&str], description: &str, success: bool) -> TestResult {
    TestResult {
        suite: suite.iter().map(|s| s.to_string()).collect(),
        description: description.to_string(),
        success,
        ..Default::default()
    }
}

#[test]
fn test_cli_help() {
    let output = deferspec().arg("--help").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("defers detailed test output"));
    assert!(stdout.contains("replay"));
    assert!(stdout.contains("options"));
}

#[test]
fn test_cli_version() {
    let output = deferspec().arg("--version").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("deferspec"));
    assert!(stdout.contains("0.1.0"));
}

#[test]
fn test_replay_failing_run() {
    let output = deferspec()
        .args(["replay", &fixture("failing_run.jsonl")])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(
        "Chrome 120.0 (Linux x86_64): Executed 3 of 4 (1 FAILED) (skipped 1) SUCCESS (0.12 secs / 0.03 secs)"
    ));
    assert!(stdout.contains("  Calculator\n    division\n"));
    assert!(stdout.contains("rejects zero\n\tError: expected exception\n\t    at div.spec.js:12\n"));
    assert!(stdout.contains("TOTAL: 1 FAILED, 2 SUCCESS"));
    // passed and skipped specs are suppressed by default
    assert!(!stdout.contains("adds numbers"));
    assert!(!stdout.contains("pads"));
    // console passthrough is off without a host config
    assert!(!stdout.contains("booting fixtures"));
}

#[test]
fn test_replay_passing_run_hides_details() {
    let output = deferspec()
        .args(["replay", "--show-all", &fixture("passing_run.jsonl")])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TOTAL: 2 SUCCESS"));
    assert!(!stdout.contains("Calculator"));
    assert!(!stdout.contains("FAILED"));
}

#[test]
fn test_replay_immediate_prints_everything() {
    let output = deferspec()
        .args(["replay", "--immediate", "--show-all", &fixture("passing_run.jsonl")])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let header = stdout.find("  Calculator\n").unwrap();
    let adds = stdout.find("adds numbers").unwrap();
    let totals = stdout.find("TOTAL: 2 SUCCESS").unwrap();
    assert!(header < adds && adds < totals);
    assert_eq!(stdout.matches("Calculator").count(), 1);
}

#[cfg(not(windows))]
#[test]
fn test_replay_with_host_config() {
    let output = deferspec()
        .args([
            "replay",
            "--config",
            &fixture("host.toml"),
            &fixture("failing_run.jsonl"),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = concat!(
        "INFO LOG: 'booting fixtures'\n",
        "\n",
        "Chrome 120.0 (Linux x86_64): Executed 3 of 4 (1 FAILED) (skipped 1) SUCCESS (0.12 secs / 0.03 secs)\n",
        "\n",
        "  Calculator\n",
        "    ✓ adds numbers\n",
        "    division\n",
        "      ✓ divides\n",
        "      FAILED rejects zero\n",
        "\tError: expected exception\n",
        "\n",
        "TOTAL: 1 FAILED, 2 SUCCESS\n",
        "\n",
    );
    assert_eq!(stdout, expected);
}

#[test]
fn test_replay_colors_from_host_config_when_piped() {
    let output = deferspec()
        .args([
            "replay",
            "--config",
            &fixture("host_colors.json"),
            &fixture("failing_run.jsonl"),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\u{1b}[31mrejects zero\u{1b}[0m"));
    assert!(stdout.contains("\u{1b}[31mTOTAL: 1 FAILED, 2 SUCCESS\u{1b}[0m"));
}

#[test]
fn test_replay_malformed_stream() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jsonl");
    std::fs::write(&path, "{\"type\": \"runStart\"}\nnot json\n").unwrap();

    let output = deferspec()
        .args(["replay", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Malformed event on line 2"));
}

#[test]
fn test_options_command_shows_defaults() {
    let output = deferspec().arg("options").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("suppressPassed:  true"));
    assert!(stdout.contains("suppressFailed:  false"));
    assert!(stdout.contains("suppressSkipped: true"));
    assert!(stdout.contains("deferred:        true"));
    assert!(stdout.contains("maxLogLines:     unlimited"));
}

#[test]
fn test_sibling_suites_print_parent_once() {
    let mut reporter = reporter(ReporterOptions {
        suppress_passed: Some(false),
        deferred: Some(false),
        ..Default::default()
    });
    let target = ExecutionTarget::new("Chrome");

    reporter.on_spec_complete(&target, &spec(&["A"], "top", true));
    reporter.on_spec_complete(&target, &spec(&["A", "B"], "in b", true));
    reporter.on_spec_complete(&target, &spec(&["A", "C"], "in c", true));

    let out = String::from_utf8(reporter.into_sink()).unwrap();
    assert_eq!(
        out,
        "\n  A\n    ✓ top\n    B\n      ✓ in b\n    C\n      ✓ in c\n"
    );
}

#[test]
fn test_max_log_lines_keeps_first_lines() {
    let mut reporter = reporter(ReporterOptions {
        deferred: Some(false),
        max_log_lines: Some(2),
        ..Default::default()
    });
    let mut failing = spec(&["Suite"], "fails", false);
    failing.log = vec!["line 1\nline 2\nline 3\nline 4\nline 5".to_string()];

    reporter.on_spec_complete(&ExecutionTarget::new("Chrome"), &failing);

    let out = String::from_utf8(reporter.into_sink()).unwrap();
    assert!(out.contains("\tline 1\n\tline 2\n"));
    assert!(!out.contains("line 3"));
}

#[test]
fn test_library_replay_matches_direct_calls() {
    let stream = std::fs::read_to_string(fixture("failing_run.jsonl")).unwrap();
    let mut replayed = reporter(ReporterOptions::default());
    let summary = replay::replay(stream.as_bytes(), &mut replayed).unwrap();
    assert!(summary.failed());
    assert_eq!(summary.runs, 1);

    let mut direct = reporter(ReporterOptions::default());
    let chrome = ExecutionTarget::new("Chrome 120.0 (Linux x86_64)");
    let mut failing = spec(&["Calculator", "division"], "rejects zero", false);
    failing.time = 4.0;
    failing.log = vec!["Error: expected exception\n    at div.spec.js:12\n    at run.js:4".to_string()];
    direct.on_run_start(&[chrome.clone()]);
    direct.on_spec_complete(&chrome, &failing);

    let replayed = String::from_utf8(replayed.into_sink()).unwrap();
    let direct = String::from_utf8(direct.into_sink()).unwrap();
    // the direct reporter has not completed its run, so nothing is printed yet
    assert!(direct.is_empty());
    assert!(replayed.contains("      ✗ rejects zero\n"));
}

#[test]
fn test_summary_only_success_line_for_green_run() {
    let mut reporter = reporter(ReporterOptions::default());
    let target = ExecutionTarget::new("Chrome");
    reporter.on_run_complete(
        &[target],
        &RunResults {
            success: 3,
            failed: 0,
            ..Default::default()
        },
    );

    let out = String::from_utf8(reporter.into_sink()).unwrap();
    assert!(out.contains("TOTAL: 3 SUCCESS\n"));
    assert!(!out.contains("FAILED"));
}
