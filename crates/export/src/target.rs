//! Search-head targets.

use serde::Serialize;
use splunk_export_config::Scheme;
use std::fmt;

/// One search head queried in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16, scheme: Scheme) -> Self {
        Self {
            host: host.into(),
            port,
            scheme,
        }
    }

    /// Parse a configured host entry: `host`, `host:port`, `[v6]:port` or a
    /// full `scheme://host:port` URL. Missing parts fall back to the defaults.
    pub fn parse(entry: &str, default_port: u16, default_scheme: Scheme) -> Result<Self, String> {
        let entry = entry.trim().trim_end_matches('/');
        if entry.is_empty() {
            return Err("empty host entry".to_string());
        }

        let (scheme, url) = if entry.contains("://") {
            let url = url::Url::parse(entry).map_err(|e| format!("invalid host '{entry}': {e}"))?;
            let scheme = match url.scheme() {
                "http" => Scheme::Http,
                "https" => Scheme::Https,
                other => return Err(format!("unsupported scheme '{other}' in '{entry}'")),
            };
            (scheme, url)
        } else {
            let url = url::Url::parse(&format!("{default_scheme}://{entry}"))
                .map_err(|e| format!("invalid host '{entry}': {e}"))?;
            (default_scheme, url)
        };

        if url.path() != "/" && !url.path().is_empty() {
            return Err(format!("host entry '{entry}' must not carry a path"));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| format!("host entry '{entry}' has no host"))?;

        // `Url::port` hides the scheme's default port, so read it back explicitly.
        let port = url.port().unwrap_or_else(|| {
            if has_explicit_port(entry) {
                url.port_or_known_default().unwrap_or(default_port)
            } else {
                default_port
            }
        });

        Ok(Self::new(host, port, scheme))
    }

    /// Base URL for REST calls, e.g. `https://sh1.example.com:8089`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Identity safe for file names: the host with every character outside
    /// `[A-Za-z0-9._-]` replaced by `_`.
    pub fn file_id(&self) -> String {
        sanitize(&self.host)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn has_explicit_port(entry: &str) -> bool {
    let authority = entry.split_once("://").map_or(entry, |(_, rest)| rest);
    match authority.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

pub(crate) fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
