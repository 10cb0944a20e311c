//! Tests for the configuration loader.
//!
//! Invariants:
//! - Tests use `serial_test` and `global_test_lock()` to prevent environment variable pollution.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod builder_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// A complete, valid TOML config writing to the local filesystem.
pub const VALID_TOML: &str = r#"
write_to_local_file = true

[connection]
hosts = ["sh1.example.com", "sh2.example.com:9089"]

[auth]
token = "file-token"

[search]
query = "index=main sourcetype=bot_signal"

[output.local]
root = "/tmp/exports"
"#;

pub fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
