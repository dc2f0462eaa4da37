//! Integration tests for Layer 3: Runtime
//!
//! Tests for sessions, snapshots, and the REPL driven by a scripted editor.

mod repl;
mod session;
mod snapshot;

use std::path::PathBuf;

/// Directory holding the externs fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}
