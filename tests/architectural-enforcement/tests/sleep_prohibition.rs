//! Integration Test: Sleep Prohibition
//!
//! **Policy**: The controller never sleeps. Every delay (navigation
//! transitions, the scripted scan, the reveal choreography, chat replies)
//! is an event on the virtual timeline, advanced by the surface.
//! **Exception**: the TUI's frame pacing in `app.rs`.

use architectural_enforcement::{calls_sleep, report, rust_files, scan, workspace_root};

#[test]
fn test_no_sleep_in_core() {
    let dir = workspace_root().join("controller/core/src");
    assert!(!rust_files(&dir).is_empty(), "core sources not found");

    let violations = scan(&dir, |_, code| calls_sleep(code));
    assert!(
        violations.is_empty(),
        "\nSleep calls in the core; schedule on the Timeline instead:\n{}",
        report(&violations)
    );
}

#[test]
fn test_no_sleep_in_cli() {
    let dir = workspace_root().join("controller/cli/src");
    assert!(!rust_files(&dir).is_empty(), "cli sources not found");

    // The headless driver jumps straight to the next due timer
    let violations = scan(&dir, |_, code| calls_sleep(code));
    assert!(
        violations.is_empty(),
        "\nSleep calls in the headless driver:\n{}",
        report(&violations)
    );
}

#[test]
fn test_tui_sleeps_only_for_frame_pacing() {
    let dir = workspace_root().join("tui/src");
    assert!(!rust_files(&dir).is_empty(), "tui sources not found");

    let violations = scan(&dir, |path, code| {
        calls_sleep(code) && !(path.ends_with("app.rs") && code.contains("FRAME"))
    });
    assert!(
        violations.is_empty(),
        "\nSleep calls outside frame pacing:\n{}",
        report(&violations)
    );
}
