//! Search Head Cluster (SHC) member model.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Status of an SHC member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub enum ShcMemberStatus {
    /// Member is up and operational
    Up,
    /// Member is down
    Down,
    /// Member is pending (joining or initializing)
    Pending,
    /// Member is restarting
    Restarting,
    /// Member was put in detention by the captain
    Detention,
    /// Member was put in detention by an operator
    ManualDetention,
    /// Unknown or unrecognized status
    #[serde(other)]
    #[default]
    Unknown,
}

impl Display for ShcMemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Pending => "Pending",
            Self::Restarting => "Restarting",
            Self::Detention => "Detention",
            Self::ManualDetention => "ManualDetention",
            Self::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// SHC member information as reported by `/services/shcluster/member/members`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ShcMember {
    /// Entry name (member GUID).
    pub id: String,
    pub label: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Management URI, e.g. `https://sh1.example.com:8089`.
    pub mgmt_uri: Option<String>,
    pub status: ShcMemberStatus,
    pub is_captain: bool,
    pub site: Option<String>,
}

impl ShcMember {
    /// Host to contact: explicit `host`, then the management URI host, then the label.
    pub fn resolved_host(&self) -> Option<String> {
        non_empty(self.host.as_deref())
            .map(str::to_string)
            .or_else(|| self.mgmt_url().and_then(|u| u.host_str().map(str::to_string)))
            .or_else(|| non_empty(self.label.as_deref()).map(str::to_string))
    }

    /// Port to contact: explicit `port`, then the management URI port.
    pub fn resolved_port(&self) -> Option<u16> {
        self.port
            .or_else(|| self.mgmt_url().and_then(|u| u.port_or_known_default()))
    }

    fn mgmt_url(&self) -> Option<url::Url> {
        self.mgmt_uri
            .as_deref()
            .and_then(|uri| url::Url::parse(uri).ok())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
