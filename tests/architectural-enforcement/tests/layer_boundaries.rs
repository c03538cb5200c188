//! Integration Test: Layer Boundaries
//!
//! The core is headless: no terminal crates. The TUI is a thin client: it
//! reaches the chat server only through the core, never with its own HTTP
//! client.

use architectural_enforcement::{fail_with, production_lines, read, rust_sources, workspace_root};

/// Dependency names declared in a manifest's `[dependencies]` table
fn dependencies(manifest: &str) -> Vec<String> {
    let content = read(&workspace_root().join(manifest));
    let mut in_deps = false;
    let mut names = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_deps = line == "[dependencies]";
            continue;
        }
        if !in_deps || line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            names.push(name.trim().to_string());
        }
    }

    names
}

fn uses_crate(dir: &str, crate_name: &str) -> Vec<String> {
    let needle = format!("{crate_name}::");
    let mut violations = Vec::new();

    for path in rust_sources(dir) {
        let content = read(&path);
        for line in production_lines(&content) {
            if line.code.contains(&needle) {
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
fn test_core_has_no_terminal_dependencies() {
    let deps = dependencies("core/Cargo.toml");
    assert!(deps.contains(&"tokio".to_string()), "manifest parse failed: {deps:?}");

    let mut violations: Vec<String> = deps
        .iter()
        .filter(|d| matches!(d.as_str(), "ratatui" | "crossterm"))
        .map(|d| format!("core/Cargo.toml depends on {d}"))
        .collect();
    violations.extend(uses_crate("core/src", "ratatui"));
    violations.extend(uses_crate("core/src", "crossterm"));

    fail_with(
        "Terminal code in the headless core",
        &violations,
        &["Rendering belongs in tui/; the core only produces WidgetView."],
    );
}

#[test]
fn test_tui_has_no_http_client() {
    let deps = dependencies("tui/Cargo.toml");
    assert!(deps.contains(&"ratatui".to_string()), "manifest parse failed: {deps:?}");

    let mut violations: Vec<String> = deps
        .iter()
        .filter(|d| d.as_str() == "reqwest")
        .map(|d| format!("tui/Cargo.toml depends on {d}"))
        .collect();
    violations.extend(uses_crate("tui/src", "reqwest"));

    fail_with(
        "Direct HTTP in the TUI",
        &violations,
        &["Talk to the server through tokenchat_core::ChatApi."],
    );
}
