//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async code in the core and the surfaces runs on the event
//! loop and MUST NOT block it.
//! **Required**: `tokio::fs`, `tokio::net`, `tokio::process` inside `async fn`.
//! Plain functions that run before the loop (config loading, log setup) may
//! use `std`.

use architectural_enforcement::{
    blocking_io, blocking_stdio, report, rust_files, scan_async, workspace_root,
};

#[test]
fn test_no_blocking_io_in_async_code() {
    let mut violations = Vec::new();
    for dir in ["controller/core/src", "controller/cli/src", "tui/src"] {
        let dir = workspace_root().join(dir);
        assert!(!rust_files(&dir).is_empty(), "{} not found", dir.display());
        violations.extend(scan_async(&dir, |code| blocking_io(code).is_some()));
    }

    assert!(
        violations.is_empty(),
        "\nBlocking I/O inside async functions; use tokio::fs / tokio::net:\n{}",
        report(&violations)
    );
}

#[test]
fn test_no_blocking_stdio_in_core() {
    let dir = workspace_root().join("controller/core/src");
    let violations = scan_async(&dir, blocking_stdio);
    assert!(
        violations.is_empty(),
        "\nBlocking stdin/stdout in async core code:\n{}",
        report(&violations)
    );
}
