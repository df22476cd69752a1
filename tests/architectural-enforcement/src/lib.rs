//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The core never depends on a UI framework
//! - No thread sleeps in production code
//! - No blocking HTTP
//! - No `unwrap()`/`expect()` in production code
//!
//! The helpers here walk the workspace sources; the rules live in `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source directories checked by the rules
pub const PRODUCTION_DIRS: &[&str] = &["wizard/core/src", "tui/src"];

/// Workspace root (two levels above this package)
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files under a workspace-relative directory
#[must_use]
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// One non-test, non-comment source line
#[derive(Debug)]
pub struct SourceLine {
    /// File the line is in
    pub path: PathBuf,
    /// 1-based line number
    pub number: usize,
    /// Code with any trailing `//` comment removed
    pub code: String,
}

/// Production lines of a file
///
/// Everything from the first `#[cfg(test)]` on is treated as test code, as
/// are comment lines.
#[must_use]
pub fn production_lines(path: &Path) -> Vec<SourceLine> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter_map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line).trim();
            if code.is_empty() {
                return None;
            }
            Some(SourceLine {
                path: path.to_path_buf(),
                number: idx + 1,
                code: code.to_string(),
            })
        })
        .collect()
}

/// Production lines across `dirs` matching `predicate`, formatted for reports
#[must_use]
pub fn find_violations(dirs: &[&str], predicate: impl Fn(&str) -> bool) -> Vec<String> {
    let mut violations = Vec::new();
    for dir in dirs {
        for file in rust_files(dir) {
            for line in production_lines(&file) {
                if predicate(&line.code) {
                    violations.push(format!(
                        "{}:{} - {}",
                        line.path.display(),
                        line.number,
                        line.code
                    ));
                }
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn test_production_dirs_have_sources() {
        for dir in PRODUCTION_DIRS {
            assert!(!rust_files(dir).is_empty(), "no sources under {dir}");
        }
    }
}
