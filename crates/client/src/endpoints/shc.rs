//! Search Head Cluster (SHC) member listing.

use reqwest::Client;
use serde_json::Value;

use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{ShcMember, ShcMemberStatus};

/// List the members of the search head cluster fronted by `base_url`.
///
/// Fails with [`ClientError::InvalidResponse`] when the body carries no
/// `entry` array. Individual entries are parsed leniently; deciding whether
/// a member is usable is left to the caller.
pub async fn get_shc_members(
    client: &Client,
    base_url: &str,
    authorization: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<ShcMember>> {
    let url = format!("{}/services/shcluster/member/members", base_url);

    let builder = client
        .get(&url)
        .header("Authorization", authorization)
        .query(&[("output_mode", "json"), ("count", "0")]);

    let response = send_request_with_retry(
        builder,
        max_retries,
        "/services/shcluster/member/members",
        "GET",
        metrics,
    )
    .await?;

    let resp: Value = response.json().await?;

    let entries = resp["entry"].as_array().ok_or_else(|| {
        ClientError::InvalidResponse("Missing entry array in SHC member response".to_string())
    })?;

    Ok(entries.iter().map(parse_member).collect())
}

fn parse_member(entry: &Value) -> ShcMember {
    let content = &entry["content"];
    let text = |v: &Value| v.as_str().map(|s| s.to_string());

    ShcMember {
        id: text(&entry["name"])
            .or_else(|| text(&content["guid"]))
            .unwrap_or_else(|| "unknown".to_string()),
        label: text(&content["label"]),
        host: text(&content["host"]),
        port: content["port"]
            .as_u64()
            .or_else(|| content["port"].as_str().and_then(|s| s.parse().ok()))
            .and_then(|p| u16::try_from(p).ok()),
        mgmt_uri: text(&content["mgmt_uri"]),
        status: content["status"]
            .as_str()
            .and_then(|s| serde_json::from_value(Value::String(s.to_string())).ok())
            .unwrap_or(ShcMemberStatus::Unknown),
        is_captain: content["is_captain"]
            .as_bool()
            .or_else(|| content["is_captain"].as_str().map(|s| s == "1"))
            .unwrap_or(false),
        site: text(&content["site"]),
    }
}
