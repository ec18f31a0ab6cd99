//! Integration Test: Headless Core
//!
//! **Policy**: `ecobin-core` holds every app rule and knows nothing about
//! terminals. Surfaces depend on the core, never the other way round.

use std::fs;

use architectural_enforcement::{manifest_dependencies, report, scan, workspace_root};

/// Crates that only a terminal surface may use
const TERMINAL_CRATES: &[&str] = &["ratatui", "crossterm", "tui", "termion"];

#[test]
fn test_core_manifest_has_no_terminal_crates() {
    let manifest = fs::read_to_string(workspace_root().join("controller/core/Cargo.toml"))
        .expect("core manifest");
    let deps = manifest_dependencies(&manifest);

    assert!(deps.iter().any(|d| d == "tokio"), "manifest not parsed");
    for forbidden in TERMINAL_CRATES {
        assert!(
            !deps.iter().any(|d| d == forbidden),
            "ecobin-core depends on {forbidden}"
        );
    }
}

#[test]
fn test_cli_manifest_has_no_terminal_crates() {
    let manifest = fs::read_to_string(workspace_root().join("controller/cli/Cargo.toml"))
        .expect("cli manifest");
    let deps = manifest_dependencies(&manifest);

    for forbidden in TERMINAL_CRATES {
        assert!(
            !deps.iter().any(|d| d == forbidden),
            "ecobin-cli depends on {forbidden}"
        );
    }
}

#[test]
fn test_core_code_never_mentions_terminal_crates() {
    let dir = workspace_root().join("controller/core/src");
    let violations = scan(&dir, |_, code| {
        code.contains("ratatui::") || code.contains("crossterm::")
    });
    assert!(
        violations.is_empty(),
        "\nTerminal code in the core:\n{}",
        report(&violations)
    );
}

#[test]
fn test_no_unwrap_in_core_production_code() {
    let dir = workspace_root().join("controller/core/src");
    let violations = scan(&dir, |_, code| {
        code.contains(".unwrap()") || code.contains(".expect(")
    });
    assert!(
        violations.is_empty(),
        "\nunwrap()/expect() in core production code; propagate the error:\n{}",
        report(&violations)
    );
}
