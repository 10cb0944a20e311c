//! Logging format and metrics exporter settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    /// Address for the Prometheus scrape endpoint, e.g. `127.0.0.1:9898`.
    /// No exporter is installed when unset.
    pub metrics_bind: Option<String>,
}
