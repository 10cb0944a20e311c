//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Translate command-line overrides into `ConfigLoader` calls.
//!
//! Non-responsibilities:
//! - Does not read environment overrides other than the config path (see
//!   `splunk_export_config::ConfigLoader::from_env`).

use clap::Parser;
use splunk_export_config::ConfigLoader;
use splunk_export_config::constants::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "splunk-export")]
#[command(about = "Export Splunk search results to local files and object storage", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  splunk-export --config prod.toml\n  splunk-export --hosts sh1.example.com,sh2.example.com\n  RUST_LOG=splunk_export=debug splunk-export\n\nExit codes:\n  0  success or partial success\n  1  unexpected error\n  2  configuration error\n  3  target resolution failed\n  4  every target failed\n  130 interrupted\n"
)]
pub struct Cli {
    /// Path to the configuration file (TOML, or JSON by extension)
    #[arg(short, long, env = "SPLUNK_EXPORT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated search heads, overriding `connection.hosts`
    #[arg(long, value_delimiter = ',', value_name = "HOST")]
    pub hosts: Option<Vec<String>>,

    /// Load balancer address, overriding `connection.vip`
    #[arg(long)]
    pub vip: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum retries for rate-limited or unavailable responses
    #[arg(long)]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long)]
    pub skip_verify: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// The config file to read, if any.
    ///
    /// An explicit path must exist. The default file is optional so a run can
    /// be configured entirely through the environment.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) if !path.as_os_str().is_empty() => Some(path.clone()),
            _ => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then_some(default)
            }
        }
    }

    /// Apply command-line overrides on top of file and environment values.
    pub fn apply(&self, mut loader: ConfigLoader) -> ConfigLoader {
        if let Some(hosts) = &self.hosts {
            loader = loader.with_hosts(hosts.clone());
        }
        if let Some(vip) = &self.vip {
            loader = loader.with_vip(vip.clone());
        }
        if let Some(secs) = self.timeout {
            loader = loader.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.max_retries {
            loader = loader.with_max_retries(retries);
        }
        if self.skip_verify {
            loader = loader.with_skip_verify(true);
        }
        if self.debug {
            loader = loader.with_debug_mode(true);
        }
        loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_hosts_are_comma_separated() {
        let cli = Cli::try_parse_from(["splunk-export", "--hosts", "sh1,sh2:9089"]).unwrap();
        assert_eq!(
            cli.hosts,
            Some(vec!["sh1".to_string(), "sh2:9089".to_string()])
        );
    }

    #[test]
    fn test_explicit_config_path_is_kept() {
        let cli = Cli::try_parse_from(["splunk-export", "--config", "missing.toml"]).unwrap();
        assert_eq!(cli.config_path(), Some(PathBuf::from("missing.toml")));
    }
}
