//! Config file parsing.
//!
//! The format is chosen by extension: `.json` is read with `serde_json`,
//! anything else as TOML.

use std::path::Path;

use super::error::ConfigError;
use crate::types::Config;

pub(crate) fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        kind: e.kind(),
    })?;
    parse_config(path, &contents)
}

fn parse_config(path: &Path, contents: &str) -> Result<Config, ConfigError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(contents).map_err(|e| ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            message: format!("line {}, column {}: {:?}", e.line(), e.column(), e.classify()),
        })
    } else {
        // `message()` omits the source snippet, which may hold credentials.
        toml::from_str(contents).map_err(|e| ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }
}
