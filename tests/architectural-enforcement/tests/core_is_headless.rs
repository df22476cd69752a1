//! Integration Test: Headless Core
//!
//! **Policy**: `adwizard-core` knows nothing about terminals or any other UI
//! toolkit. Surfaces depend on the core, never the other way round.

use std::fs;

use architectural_enforcement::{find_violations, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_sources_do_not_use_ui_crates() {
    let violations = find_violations(&["wizard/core/src"], |code| {
        UI_CRATES.iter().any(|krate| code.contains(&format!("{krate}::")))
    });

    if !violations.is_empty() {
        eprintln!("\n❌ UI framework usage found in adwizard-core:");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        panic!(
            "\nFound {} UI dependency violation(s) in the core.",
            violations.len()
        );
    }
}

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("wizard/core/Cargo.toml"))
        .expect("core manifest should be readable");

    for krate in UI_CRATES {
        assert!(
            !manifest
                .lines()
                .any(|line| line.trim_start().starts_with(krate)),
            "adwizard-core must not depend on {krate}"
        );
    }
}

#[test]
fn test_tui_depends_on_core() {
    let manifest = fs::read_to_string(workspace_root().join("tui/Cargo.toml"))
        .expect("tui manifest should be readable");
    assert!(manifest.contains("adwizard-core"));
}
