//! Output configuration: artifact encoding, naming and sink destinations.
//!
//! Responsibilities:
//! - Select the artifact encoding and file name template.
//! - Describe the local filesystem root and the S3 bucket/prefix.
//!
//! Does NOT handle:
//! - Rendering templates or writing artifacts (see the export crate's writer).
//! - Deciding whether a sink is enabled (`write_to_s3` / `write_to_local_file`
//!   live on [`crate::Config`]).

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::opt_secret_string;
use crate::constants::{DEFAULT_CHUNK_RECORDS, DEFAULT_FILE_NAME_TEMPLATE, DEFAULT_LOCAL_ROOT};

/// Artifact encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Ndjson,
    /// A single JSON array of objects.
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// File name with `<host>`, `<ts>`, `<freq>`, `<ratio>` and `<run>` placeholders.
    pub file_name_template: String,
    /// Prefix every artifact with `YYYY/MM/DD/` of its window start.
    pub date_partition: bool,
    /// Records held in memory per job; also the channel capacity between
    /// the search producer and the writer.
    pub chunk_records: usize,
    /// Skip jobs whose artifacts already exist on every enabled sink.
    pub skip_existing: bool,
    pub local: LocalOutputConfig,
    pub s3: S3OutputConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            file_name_template: DEFAULT_FILE_NAME_TEMPLATE.to_string(),
            date_partition: true,
            chunk_records: DEFAULT_CHUNK_RECORDS,
            skip_existing: false,
            local: LocalOutputConfig::default(),
            s3: S3OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalOutputConfig {
    pub root: PathBuf,
}

impl Default for LocalOutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_LOCAL_ROOT),
        }
    }
}

/// S3 (or S3-compatible) destination.
///
/// Credentials fall back to the standard AWS environment when not set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct S3OutputConfig {
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint for MinIO, LocalStack and similar services.
    pub endpoint: Option<String>,
    /// Key prefix prepended to every object, e.g. `splunk/raw/`.
    pub key_prefix: String,
    pub access_key_id: Option<String>,
    #[serde(with = "opt_secret_string")]
    pub secret_access_key: Option<SecretString>,
}
