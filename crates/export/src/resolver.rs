//! Target resolution: VIP indirection or an explicit host list.
//!
//! Responsibilities:
//! - Ask the VIP for its search head cluster members (one API call) and turn
//!   each usable member into a [`Target`].
//! - Parse an explicit host list into targets, in order, without duplicates.
//! - Apply the partial-membership policy to members that are not `Up`.
//!
//! Does NOT handle:
//! - Retrying a failed member lookup.
//! - Falling back to explicit hosts after a VIP failure (see `orchestrator`).
//!
//! Invariants:
//! - Exactly one directory call per `resolve` with `vip_enabled = true`,
//!   none otherwise.
//! - Returned targets are unique by `host:port` and keep first-seen order.

use async_trait::async_trait;
use splunk_client::{ClientError, ShcMember, ShcMemberStatus, SplunkClient};
use splunk_export_config::{Config, PartialMembers, Scheme};
use tracing::{debug, info, warn};

use crate::error::{ExportError, ResolutionError};
use crate::target::Target;

/// Source of search head cluster membership.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// List the members of the cluster behind `vip`.
    async fn members(&self, vip: &Target) -> Result<Vec<ShcMember>, ClientError>;
}

#[async_trait]
impl<T: MemberDirectory + ?Sized> MemberDirectory for &T {
    async fn members(&self, vip: &Target) -> Result<Vec<ShcMember>, ClientError> {
        (**self).members(vip).await
    }
}

/// [`MemberDirectory`] backed by the Splunk REST API.
#[derive(Debug, Clone)]
pub struct SplunkMemberDirectory {
    config: Config,
    http: reqwest::Client,
}

impl SplunkMemberDirectory {
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let http = SplunkClient::builder()
            .from_config(config)
            .build_http_client()?;
        Ok(Self {
            config: config.clone(),
            http,
        })
    }
}

#[async_trait]
impl MemberDirectory for SplunkMemberDirectory {
    async fn members(&self, vip: &Target) -> Result<Vec<ShcMember>, ClientError> {
        let mut client = SplunkClient::builder()
            .from_config(&self.config)
            .base_url(vip.base_url())
            .http_client(self.http.clone())
            .build()?;
        client.shc_members().await
    }
}

/// Turns configuration into the list of targets for one run.
#[derive(Debug)]
pub struct HostResolver<D> {
    directory: D,
    default_port: u16,
    default_scheme: Scheme,
    partial_members: PartialMembers,
}

impl<D: MemberDirectory> HostResolver<D> {
    pub fn new(
        directory: D,
        default_port: u16,
        default_scheme: Scheme,
        partial_members: PartialMembers,
    ) -> Self {
        Self {
            directory,
            default_port,
            default_scheme,
            partial_members,
        }
    }

    pub fn from_config(directory: D, config: &Config) -> Self {
        Self::new(
            directory,
            config.connection.port,
            config.connection.scheme,
            config.execution.partial_members,
        )
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Resolve the targets of a run.
    ///
    /// # Errors
    ///
    /// - [`ExportError::Configuration`] when the VIP or host list is missing
    ///   or unparseable.
    /// - [`ExportError::Resolution`] when the VIP cannot produce a usable
    ///   member list.
    pub async fn resolve(
        &self,
        vip_enabled: bool,
        vip: Option<&str>,
        explicit_hosts: &[String],
    ) -> Result<Vec<Target>, ExportError> {
        if !vip_enabled {
            return self.explicit_targets(explicit_hosts);
        }

        let vip = vip
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ExportError::Configuration(
                    "vip_to_hostname is enabled but no VIP is configured".to_string(),
                )
            })?;
        let vip = Target::parse(vip, self.default_port, self.default_scheme)
            .map_err(ExportError::Configuration)?;

        info!(vip = %vip, "Resolving search heads from cluster members");
        let members = self
            .directory
            .members(&vip)
            .await
            .map_err(|source| match source {
                ClientError::InvalidResponse(message) => ResolutionError::Malformed {
                    vip: vip.to_string(),
                    message,
                },
                source => ResolutionError::Unreachable {
                    vip: vip.to_string(),
                    source,
                },
            })?;

        Ok(self.member_targets(&vip, members)?)
    }

    fn explicit_targets(&self, hosts: &[String]) -> Result<Vec<Target>, ExportError> {
        let mut targets: Vec<Target> = Vec::with_capacity(hosts.len());
        for entry in hosts.iter().filter(|h| !h.trim().is_empty()) {
            let target = Target::parse(entry, self.default_port, self.default_scheme)
                .map_err(ExportError::Configuration)?;
            if targets.contains(&target) {
                debug!(host = %target, "Dropping duplicate host entry");
                continue;
            }
            targets.push(target);
        }

        if targets.is_empty() {
            return Err(ExportError::Configuration(
                "no search heads configured: set connection.hosts or enable vip_to_hostname"
                    .to_string(),
            ));
        }
        Ok(targets)
    }

    fn member_targets(
        &self,
        vip: &Target,
        members: Vec<ShcMember>,
    ) -> Result<Vec<Target>, ResolutionError> {
        let (up, down): (Vec<_>, Vec<_>) = members
            .into_iter()
            .partition(|m| m.status == ShcMemberStatus::Up);

        if !down.is_empty() {
            let names: Vec<String> = down
                .iter()
                .map(|m| format!("{} ({})", member_name(m), m.status))
                .collect();
            match self.partial_members {
                PartialMembers::Fail => {
                    return Err(ResolutionError::UnhealthyMembers {
                        vip: vip.to_string(),
                        members: names,
                    });
                }
                PartialMembers::Proceed => {
                    warn!(
                        vip = %vip,
                        skipped = %names.join(", "),
                        "Skipping cluster members that are not up"
                    );
                }
            }
        }

        let mut targets: Vec<Target> = Vec::with_capacity(up.len());
        for member in &up {
            let Some(host) = member.resolved_host() else {
                warn!(member = %member.id, "Cluster member has no usable host, skipping");
                continue;
            };
            let port = member.resolved_port().unwrap_or(self.default_port);
            let target = Target::new(host, port, self.default_scheme);
            if !targets.contains(&target) {
                targets.push(target);
            }
        }

        if targets.is_empty() {
            return Err(ResolutionError::NoMembers {
                vip: vip.to_string(),
            });
        }

        info!(vip = %vip, count = targets.len(), "Resolved search heads");
        Ok(targets)
    }
}

fn member_name(member: &ShcMember) -> String {
    member
        .label
        .clone()
        .or_else(|| member.resolved_host())
        .unwrap_or_else(|| member.id.clone())
}
