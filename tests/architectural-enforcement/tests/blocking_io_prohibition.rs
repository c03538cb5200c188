//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async code in the core and the TUI MUST NOT use blocking I/O.
//! **Required**: `tokio::fs`, `tokio::net`, `tokio::process`, async reqwest.
//!
//! Blocking calls are fine in plain `fn`s that run before or outside the
//! runtime's hot path (config loading, log file setup) and in tests.

use architectural_enforcement::{fail_with, production_lines, read, rust_sources};

const FORBIDDEN: &[(&str, &str)] = &[
    ("std::fs::", "Blocking file I/O"),
    ("std::net::", "Blocking network I/O"),
    ("std::process::Command", "Blocking process I/O"),
    ("reqwest::blocking", "Blocking HTTP client"),
    ("std::io::stdin()", "Blocking stdin"),
];

fn find_blocking_io_violations(dir: &str) -> Vec<String> {
    let mut violations = Vec::new();

    for path in rust_sources(dir) {
        let content = read(&path);
        for line in production_lines(&content) {
            // Module-level imports make every fn in the file suspect
            if line.code.trim_start().starts_with("use std::fs")
                || line.code.trim_start().starts_with("use std::net")
            {
                violations.push(format!(
                    "{}:{} - Blocking import: {}",
                    path.display(),
                    line.number,
                    line.code.trim()
                ));
                continue;
            }

            if !line.in_async {
                continue;
            }

            for (pattern, what) in FORBIDDEN {
                if line.code.contains(pattern) {
                    violations.push(format!(
                        "{}:{} - {}: {}",
                        path.display(),
                        line.number,
                        what,
                        line.code.trim()
                    ));
                }
            }
        }
    }

    violations
}

#[test]
fn test_no_blocking_io_in_core() {
    let violations = find_blocking_io_violations("core/src");
    fail_with(
        "Blocking I/O in async core code",
        &violations,
        &["Use tokio::fs / tokio::net, or move the call into a plain fn."],
    );
}

#[test]
fn test_no_blocking_io_in_tui() {
    let violations = find_blocking_io_violations("tui/src");
    fail_with(
        "Blocking I/O in async TUI code",
        &violations,
        &["Use tokio::fs / tokio::net, or move the call into a plain fn."],
    );
}
