//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code (timing lives on the virtual timeline)
//! - No blocking I/O inside async functions
//! - The core stays headless: no terminal crates in code or manifest
//! - No unwrap()/expect() in core production code
//!
//! The scanning helpers live here; the checks live in `tests/`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// A line of production code that breaks a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File the line is in
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// All `.rs` files under `dir`, sorted
pub fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Lines of production code, numbered from 1.
///
/// Comments are cut off and `#[cfg(test)]` items are skipped entirely.
pub fn production_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut skipping = false;
    let mut depth: i64 = 0;
    let mut opened = false;

    for (idx, line) in content.lines().enumerate() {
        let code = line.split("//").next().unwrap_or(line);

        if !skipping && code.trim_start().starts_with("#[cfg(test)]") {
            skipping = true;
            depth = 0;
            opened = false;
            continue;
        }

        if skipping {
            for c in code.chars() {
                match c {
                    '{' => {
                        depth += 1;
                        opened = true;
                    }
                    '}' => depth -= 1,
                    _ => {}
                }
            }
            // A braceless item (`use ...;`) ends at its semicolon
            if (opened && depth <= 0) || (!opened && code.trim_end().ends_with(';')) {
                skipping = false;
            }
            continue;
        }

        lines.push((idx + 1, code.to_string()));
    }
    lines
}

/// Scan every production line under `dir` with `is_violation`
pub fn scan(dir: &Path, is_violation: impl Fn(&Path, &str) -> bool) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in rust_files(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (line, code) in production_lines(&content) {
            if is_violation(&path, &code) {
                violations.push(Violation {
                    path: path.clone(),
                    line,
                    text: code.trim().to_string(),
                });
            }
        }
    }
    violations
}

/// Scan production lines under `dir` that sit inside an `async fn`
pub fn scan_async(dir: &Path, is_violation: impl Fn(&str) -> bool) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in rust_files(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        let raw: Vec<&str> = content.lines().collect();
        for (line, code) in production_lines(&content) {
            if is_violation(&code) && is_in_async_function(&raw, line - 1) {
                violations.push(Violation {
                    path: path.clone(),
                    line,
                    text: code.trim().to_string(),
                });
            }
        }
    }
    violations
}

/// Whether the nearest enclosing function above `idx` is `async`
pub fn is_in_async_function(lines: &[&str], idx: usize) -> bool {
    for line in lines[..=idx.min(lines.len().saturating_sub(1))].iter().rev() {
        let line = line.trim();
        if line.starts_with("//") {
            continue;
        }
        if line.contains("async fn ") {
            return true;
        }
        if line.starts_with("fn ") || line.contains(" fn ") {
            return false;
        }
        // Stop at module/impl boundaries
        if line.starts_with("mod ") || (line.starts_with("impl") && line.contains('{')) {
            return false;
        }
    }
    false
}

/// Whether a line does blocking file, network or process I/O
pub fn blocking_io(code: &str) -> Option<&'static str> {
    if code.contains("std::fs::") || code.contains("File::open(") || code.contains("File::create(")
    {
        Some("file")
    } else if code.contains("std::net::") {
        Some("network")
    } else if code.contains("std::process::Command") {
        Some("process")
    } else if code.contains("reqwest::blocking") {
        Some("http")
    } else {
        None
    }
}

/// Whether a line does blocking terminal reads or writes
pub fn blocking_stdio(code: &str) -> bool {
    code.contains("std::io::stdin()") || code.contains("std::io::stdout()")
}

/// Whether a line calls a sleep function
pub fn calls_sleep(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(") || code.contains("sleep_until(")
}

/// Dependency names declared in a Cargo manifest's dependency tables
pub fn manifest_dependencies(manifest: &str) -> Vec<String> {
    let mut deps = Vec::new();
    let mut in_deps = false;
    for line in manifest.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_deps = line.ends_with("dependencies]");
            continue;
        }
        if !in_deps || line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            deps.push(name.trim().to_string());
        }
    }
    deps
}

/// Format violations for a panic message
pub fn report(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  ❌ {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_skip_test_modules() {
        let src = "fn real() {}\n\
                   // thread::sleep(x) in a comment\n\
                   #[cfg(test)]\n\
                   mod tests {\n\
                       fn t() { std::thread::sleep(d); }\n\
                   }\n\
                   fn after() {}\n";
        let lines = production_lines(src);
        let numbers: Vec<usize> = lines.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2, 7]);
        assert!(!lines.iter().any(|(_, code)| calls_sleep(code)));
    }

    #[test]
    fn test_cfg_test_use_statement() {
        let src = "#[cfg(test)]\nuse std::thread;\nfn kept() {}\n";
        let lines = production_lines(src);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, 3);
    }

    #[test]
    fn test_sleep_detection() {
        assert!(calls_sleep("    tokio::time::sleep(Duration::from_millis(10)).await;"));
        assert!(calls_sleep("std::thread::sleep(d);"));
        assert!(!calls_sleep("let asleep = false;"));
    }

    #[test]
    fn test_async_function_detection() {
        let src = [
            "async fn save(&self) {",
            "    std::fs::write(&path, json)?;",
            "}",
            "fn load() {",
            "    std::fs::read_to_string(&path)?;",
            "}",
        ];
        assert!(is_in_async_function(&src, 1));
        assert!(!is_in_async_function(&src, 4));
        assert_eq!(blocking_io(src[1]), Some("file"));
        assert_eq!(blocking_io("tokio::fs::write(&path, json).await?;"), None);
    }

    #[test]
    fn test_manifest_dependencies() {
        let manifest = "[package]\nname = \"x\"\n\n[dependencies]\n# UI\nratatui = \"0.29\"\n\
                        tokio = { version = \"1\" }\n\n[dev-dependencies]\ntempfile = \"3\"\n";
        assert_eq!(
            manifest_dependencies(manifest),
            vec!["ratatui", "tokio", "tempfile"]
        );
    }
}
