//! Integration Test: Sleep Prohibition
//!
//! **Policy**: production code waits on I/O, never on the clock. The TUI
//! paces frames with `tokio::time::interval`, which is not a sleep.

use architectural_enforcement::{fail_with, production_lines, read, rust_sources};

fn find_sleep_violations(dir: &str) -> Vec<String> {
    let mut violations = Vec::new();

    for path in rust_sources(dir) {
        let content = read(&path);
        for line in production_lines(&content) {
            if line.code.contains("::sleep(") || line.code.contains(".sleep(") {
                violations.push(format!(
                    "{}:{} - {}",
                    path.display(),
                    line.number,
                    line.code.trim()
                ));
            }
        }
    }

    violations
}

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = find_sleep_violations("core/src");
    violations.extend(find_sleep_violations("tui/src"));

    fail_with(
        "Sleep calls found in production code",
        &violations,
        &[
            "Wait on a channel, a stream, or tokio::time::interval instead.",
            "Sleeps are fine inside #[cfg(test)] modules and tests/.",
        ],
    );
}
