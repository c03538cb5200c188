//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - Async code never performs blocking I/O
//! - Production code never sleeps (the UI paces itself with an interval)
//! - The core stays free of terminal crates, the surface free of HTTP
//!
//! The scanners here are line based. They are not a parser; they only have to
//! be good enough for code written in this workspace's style.

use std::fs;
use std::path::{Path, PathBuf};

/// Root of the workspace, resolved from this package's manifest
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// All `.rs` files under `relative` (from the workspace root), sorted
///
/// Panics if the directory is missing so a moved crate cannot silently
/// disable a check.
pub fn rust_sources(relative: &str) -> Vec<PathBuf> {
    let dir = workspace_root().join(relative);
    assert!(dir.is_dir(), "missing source directory {}", dir.display());

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&dir)
        .into_iter()
        .filter_map(Result::ok)
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("rs"))
        .collect();
    files.sort();
    files
}

/// Read a workspace file
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// One line of production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// The line with any `//` comment removed
    pub code: &'a str,
    /// Whether the line sits in an async fn or async block
    pub in_async: bool,
}

/// Production lines of a source file
///
/// Everything from the first `#[cfg(test)]` on is test code and skipped.
/// Lines are attributed to the most recent fn header; an `async` block
/// marks the rest of its fn as async.
pub fn production_lines(content: &str) -> Vec<SourceLine<'_>> {
    let mut out = Vec::new();
    let mut in_async = false;

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }

        let code = line.split("//").next().unwrap_or(line);
        let header = strip_visibility(code.trim());
        if header.starts_with("async fn ") {
            in_async = true;
        } else if header.starts_with("fn ") {
            in_async = false;
        }
        if code.contains("async move") || code.contains("async {") {
            in_async = true;
        }

        out.push(SourceLine {
            number: idx + 1,
            code,
            in_async,
        });
    }

    out
}

/// Drop a leading `pub` / `pub(crate)` / `pub(super)`
fn strip_visibility(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("pub(") {
        match rest.find(')') {
            Some(end) => rest[end + 1..].trim_start(),
            None => line,
        }
    } else if let Some(rest) = line.strip_prefix("pub ") {
        rest.trim_start()
    } else {
        line
    }
}

/// Report violations and fail
pub fn fail_with(title: &str, violations: &[String], advice: &[&str]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    if !advice.is_empty() {
        eprintln!();
        for line in advice {
            eprintln!("  {line}");
        }
    }

    panic!(
        "\nFound {} violation(s).\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_detection() {
        let code = "async fn bad() {\n    let x = 1;\n}\nfn good() {\n    let y = 2;\n}\n";
        let lines = production_lines(code);
        assert!(lines[1].in_async);
        assert!(!lines[4].in_async);
    }

    #[test]
    fn test_visibility_is_stripped() {
        let code = "pub async fn a() {}\npub(crate) fn b() {}\n";
        let lines = production_lines(code);
        assert!(lines[0].in_async);
        assert!(!lines[1].in_async);
    }

    #[test]
    fn test_async_block_in_sync_fn() {
        let code = "fn spawn() {\n    tokio::spawn(async move {\n        work();\n    });\n}\n";
        let lines = production_lines(code);
        assert!(!lines[0].in_async);
        assert!(lines[2].in_async);
    }

    #[test]
    fn test_stops_at_test_module() {
        let code = "fn a() {}\n#[cfg(test)]\nmod tests {\n    fn b() {}\n}\n";
        assert_eq!(production_lines(code).len(), 1);
    }

    #[test]
    fn test_comments_removed() {
        let code = "fn a() {} // std::fs::read\n";
        assert_eq!(production_lines(code)[0].code, "fn a() {} ");
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").is_file());
    }
}
