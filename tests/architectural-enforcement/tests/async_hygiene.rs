//! Integration Test: Async Hygiene
//!
//! **Policy**: production code runs on the tokio runtime and must not block it.
//! - No `std::thread::sleep` (use `tokio::time::sleep`)
//! - No `reqwest::blocking`
//! - No `unwrap()`/`expect()`; errors are propagated or classified

use architectural_enforcement::{find_violations, PRODUCTION_DIRS};

fn report(kind: &str, violations: &[String]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {kind} found in production code:");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} {kind} violation(s).", violations.len());
}

#[test]
fn test_no_thread_sleep_in_production_code() {
    let violations = find_violations(PRODUCTION_DIRS, |code| code.contains("thread::sleep"));
    report("std::thread::sleep", &violations);
}

#[test]
fn test_no_blocking_http_in_production_code() {
    let violations = find_violations(PRODUCTION_DIRS, |code| code.contains("reqwest::blocking"));
    report("blocking HTTP", &violations);
}

#[test]
fn test_no_unwrap_or_expect_in_production_code() {
    let violations = find_violations(PRODUCTION_DIRS, |code| {
        code.contains(".unwrap()") || code.contains(".expect(")
    });
    report("unwrap/expect", &violations);
}
