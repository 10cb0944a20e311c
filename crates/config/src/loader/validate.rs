//! Cross-field validation of a merged [`Config`].
//!
//! Sink selection is checked first so a run with nothing to write fails
//! before anything else is inspected.

use super::error::ConfigError;
use crate::constants::{
    MAX_CONCURRENCY, MAX_MAX_RETRIES, MAX_PROGRESS_TIMEOUT_SECS, MAX_SEARCH_PAGE_SIZE,
    MAX_SESSION_TTL_SECS, MAX_TIMEOUT_RETRIES, MAX_TIMEOUT_SECS, MAX_WINDOW_PERIODS,
};
use crate::types::{Config, ConnectionConfig, ResolutionFallback};

pub(crate) fn validate(config: &Config) -> Result<(), ConfigError> {
    if !config.any_sink_enabled() {
        return Err(ConfigError::NoSinkEnabled);
    }

    validate_targets(config)?;

    if config.auth.strategy().is_none() {
        return Err(ConfigError::MissingAuth);
    }
    if config.search.query.trim().is_empty() {
        return Err(ConfigError::MissingQuery);
    }

    if config.write_to_s3
        && config
            .output
            .s3
            .bucket
            .as_deref()
            .is_none_or(|b| b.trim().is_empty())
    {
        return Err(ConfigError::MissingBucket);
    }
    if config.write_to_local_file && config.output.local.root.as_os_str().is_empty() {
        return Err(ConfigError::MissingLocalRoot);
    }

    validate_connection(&config.connection)?;
    validate_execution(config)?;
    validate_search(config)?;
    validate_output(config)
}

fn validate_targets(config: &Config) -> Result<(), ConfigError> {
    let has_hosts = config.connection.hosts.iter().any(|h| !h.trim().is_empty());
    if config.vip_to_hostname {
        let has_vip = config
            .connection
            .vip
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty());
        if !has_vip {
            return Err(ConfigError::MissingVip);
        }
        if config.execution.resolution_fallback == ResolutionFallback::ExplicitHosts && !has_hosts
        {
            tracing::warn!("resolution_fallback is explicit_hosts but no hosts are configured");
        }
    } else if !has_hosts {
        return Err(ConfigError::MissingHosts);
    }
    Ok(())
}

fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
    let timeout_secs = connection.timeout.as_secs();
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout {
            message: "timeout must be greater than 0 seconds".to_string(),
        });
    }
    if timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidTimeout {
            message: format!(
                "timeout exceeds maximum allowed value of {} seconds",
                MAX_TIMEOUT_SECS
            ),
        });
    }

    if connection.session_ttl_seconds <= connection.session_expiry_buffer_seconds {
        return Err(ConfigError::InvalidSessionTtl {
            message: format!(
                "session_ttl_seconds ({}) must be greater than session_expiry_buffer_seconds ({})",
                connection.session_ttl_seconds, connection.session_expiry_buffer_seconds
            ),
        });
    }
    if connection.session_ttl_seconds > MAX_SESSION_TTL_SECS {
        return Err(ConfigError::InvalidSessionTtl {
            message: format!(
                "session_ttl_seconds exceeds maximum allowed value of {} seconds",
                MAX_SESSION_TTL_SECS
            ),
        });
    }

    if connection.max_retries > MAX_MAX_RETRIES {
        return Err(ConfigError::InvalidMaxRetries {
            message: format!(
                "must be between 0 and {} (got {})",
                MAX_MAX_RETRIES, connection.max_retries
            ),
        });
    }

    if connection.port == 0 {
        return Err(ConfigError::InvalidValue {
            var: "connection.port".to_string(),
            message: "must be between 1 and 65535".to_string(),
        });
    }
    Ok(())
}

fn validate_execution(config: &Config) -> Result<(), ConfigError> {
    let execution = &config.execution;
    if execution.concurrency == 0 || execution.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::InvalidExecution {
            message: format!(
                "concurrency must be between 1 and {} (got {})",
                MAX_CONCURRENCY, execution.concurrency
            ),
        });
    }
    if execution.timeout_retries > MAX_TIMEOUT_RETRIES {
        return Err(ConfigError::InvalidExecution {
            message: format!(
                "timeout_retries must be at most {} (got {})",
                MAX_TIMEOUT_RETRIES, execution.timeout_retries
            ),
        });
    }
    Ok(())
}

fn validate_search(config: &Config) -> Result<(), ConfigError> {
    let search = &config.search;
    if search.sample_ratio == 0 {
        return Err(ConfigError::InvalidSampleRatio(search.sample_ratio));
    }
    if search.progress_timeout_secs == 0 || search.progress_timeout_secs > MAX_PROGRESS_TIMEOUT_SECS
    {
        return Err(ConfigError::InvalidTimeout {
            message: format!(
                "progress_timeout_secs must be between 1 and {} (got {})",
                MAX_PROGRESS_TIMEOUT_SECS, search.progress_timeout_secs
            ),
        });
    }
    if search.page_size == 0 || search.page_size > MAX_SEARCH_PAGE_SIZE {
        return Err(ConfigError::InvalidValue {
            var: "search.page_size".to_string(),
            message: format!(
                "must be between 1 and {} (got {})",
                MAX_SEARCH_PAGE_SIZE, search.page_size
            ),
        });
    }
    if search.poll_interval_ms == 0 {
        return Err(ConfigError::InvalidValue {
            var: "search.poll_interval_ms".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    if let Some(window) = &search.window {
        if window.periods == 0 || window.periods > MAX_WINDOW_PERIODS {
            return Err(ConfigError::InvalidWindow {
                message: format!(
                    "periods must be between 1 and {} (got {})",
                    MAX_WINDOW_PERIODS, window.periods
                ),
            });
        }
        window
            .start_time()
            .map_err(|message| ConfigError::InvalidWindow { message })?;
        window
            .frequency()
            .map_err(|message| ConfigError::InvalidWindow { message })?;
    }
    Ok(())
}

fn validate_output(config: &Config) -> Result<(), ConfigError> {
    let output = &config.output;
    if output.chunk_records == 0 {
        return Err(ConfigError::InvalidOutput {
            message: "chunk_records must be at least 1".to_string(),
        });
    }
    if output.file_name_template.trim().is_empty() {
        return Err(ConfigError::InvalidOutput {
            message: "file_name_template must not be empty".to_string(),
        });
    }
    if output.file_name_template.contains('/') || output.file_name_template.contains('\\') {
        return Err(ConfigError::InvalidOutput {
            message: "file_name_template must be a file name, not a path".to_string(),
        });
    }
    Ok(())
}
