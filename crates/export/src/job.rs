//! Search jobs: one per (target, window), with their rendered destination.
//!
//! Responsibilities:
//! - Expand targets × windows into [`SearchJob`]s in a stable order.
//! - Render the artifact file name from the configured template.
//! - Flag jobs whose destination repeats an earlier job's path.
//!
//! Invariants:
//! - A job is immutable once planned.
//! - The first job to claim a path keeps it; later ones are marked `collides`.

use chrono::{DateTime, Utc};
use splunk_client::SearchOptions;
use splunk_export_config::{Config, SearchMode};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::target::{Target, sanitize};
use crate::window::TimeWindow;

/// Where a job's artifact lands, relative to each sink's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// `/`-separated path, e.g. `2023/10/17/splunk_export_sh1_202310171200_1h.json`.
    pub relative_path: String,
    /// Another job planned earlier in this run renders the same path.
    pub collides: bool,
}

impl Destination {
    pub fn local_path(&self, root: &Path) -> PathBuf {
        self.relative_path
            .split('/')
            .fold(root.to_path_buf(), |path, part| path.join(part))
    }

    pub fn object_key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.relative_path)
    }
}

/// One search execution against one target over one window.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub target: Target,
    pub query: String,
    pub mode: SearchMode,
    pub window: TimeWindow,
    pub sample_ratio: u32,
    pub max_count: Option<u64>,
    pub job_ttl_secs: Option<u64>,
    pub destination: Destination,
    /// Position in the planned order.
    pub sequence: usize,
}

impl SearchJob {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            earliest_time: self.window.earliest_param(),
            latest_time: self.window.latest_param(),
            max_count: self.max_count,
            sample_ratio: (self.sample_ratio > 1).then_some(self.sample_ratio),
            ttl_secs: self.job_ttl_secs,
        }
    }

    /// Short identity used in logs and the run summary.
    pub fn label(&self) -> String {
        format!("{} {}", self.target, self.window)
    }
}

/// Inputs to file name rendering.
#[derive(Debug, Clone, Copy)]
pub struct NameContext<'a> {
    pub template: &'a str,
    pub target: &'a Target,
    pub timestamp: DateTime<Utc>,
    pub freq: &'a str,
    pub sample_ratio: u32,
    pub run_id: &'a str,
}

/// Render the artifact file name.
///
/// When sampling is active and the template has no `<ratio>` placeholder,
/// `_sampled_<ratio>` is inserted before the extension.
pub fn render_file_name(ctx: &NameContext<'_>) -> String {
    let mut template = ctx.template.to_string();
    if ctx.sample_ratio > 1 && !template.contains("<ratio>") {
        template = match template.rfind('.') {
            Some(dot) if dot > 0 => {
                format!("{}_sampled_<ratio>{}", &template[..dot], &template[dot..])
            }
            _ => format!("{template}_sampled_<ratio>"),
        };
    }

    let rendered = template
        .replace("<host>", &ctx.target.file_id())
        .replace("<ts>", &ctx.timestamp.format("%Y%m%d%H%M").to_string())
        .replace("<freq>", ctx.freq)
        .replace("<ratio>", &ctx.sample_ratio.to_string())
        .replace("<run>", ctx.run_id);

    // A rendered name is a single path component.
    rendered
        .split(['/', '\\'])
        .map(sanitize)
        .collect::<Vec<_>>()
        .join("_")
}

/// Expand `targets × windows` into jobs.
pub fn plan_jobs(
    config: &Config,
    targets: &[Target],
    windows: &[TimeWindow],
    run_started: DateTime<Utc>,
    run_id: &str,
) -> Vec<SearchJob> {
    let search = &config.search;
    let output = &config.output;
    let mut claimed = HashSet::new();
    let mut jobs = Vec::with_capacity(targets.len() * windows.len());

    for target in targets {
        for window in windows {
            let timestamp = window.timestamp(run_started);
            let file_name = render_file_name(&NameContext {
                template: &output.file_name_template,
                target,
                timestamp,
                freq: window.freq_label(),
                sample_ratio: search.sample_ratio,
                run_id,
            });
            let relative_path = if output.date_partition {
                format!("{}/{}", timestamp.format("%Y/%m/%d"), file_name)
            } else {
                file_name
            };
            let collides = !claimed.insert(relative_path.clone());
            if collides {
                tracing::warn!(
                    target_host = %target,
                    path = %relative_path,
                    "Artifact path already claimed by another job in this run"
                );
            }

            jobs.push(SearchJob {
                target: target.clone(),
                query: search.query.clone(),
                mode: search.mode,
                window: window.clone(),
                sample_ratio: search.sample_ratio,
                max_count: search.max_count,
                job_ttl_secs: search.job_ttl_secs,
                destination: Destination {
                    relative_path,
                    collides,
                },
                sequence: jobs.len(),
            });
        }
    }
    jobs
}
