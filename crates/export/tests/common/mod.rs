//! Shared fakes for pipeline tests.
//!
//! # Invariants
//! - Fakes count every call so tests can assert that no search or member
//!   lookup happened.
//! - Scripted searches are keyed by target host; unknown hosts yield no records.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, json};
use splunk_client::{ClientError, ShcMember, ShcMemberStatus};
use splunk_export::{
    ExecutionState, MemberDirectory, RecordStream, ResultRecord, SearchClient, SearchError,
    SearchJob, Target,
};
use splunk_export_config::Config;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What a fake execution does.
#[derive(Debug, Clone)]
pub enum Script {
    Records(usize),
    Fail(&'static str),
    Timeout,
    /// Send one record then time out on the first `timeouts` calls, then
    /// behave like `Records(records)`.
    Flaky { timeouts: usize, records: usize },
    /// Send one record, then never finish.
    Hang,
}

#[derive(Debug, Default)]
pub struct FakeSearch {
    scripts: HashMap<String, Script>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, host: &str, script: Script) -> Self {
        self.scripts.insert(host.to_string(), script);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, host: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(host)
            .copied()
            .unwrap_or_default()
    }
}

pub fn record(host: &str, n: usize) -> ResultRecord {
    let mut fields = Map::new();
    fields.insert("_time".to_string(), json!(format!("2023-10-17T12:00:0{n}Z")));
    fields.insert("host".to_string(), json!(host));
    fields.insert("n".to_string(), json!(n));
    ResultRecord::new(fields)
}

impl SearchClient for FakeSearch {
    fn execute(&self, job: &SearchJob) -> RecordStream {
        let host = job.target.host.clone();
        self.total.fetch_add(1, Ordering::SeqCst);
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(host.clone()).or_default();
            *count += 1;
            *count
        };

        let script = match self.scripts.get(&host).cloned() {
            Some(Script::Flaky { timeouts, records }) if call > timeouts => {
                Script::Records(records)
            }
            Some(script) => script,
            None => Script::Records(0),
        };
        let display = job.target.to_string();

        RecordStream::spawn(4, move |tx| async move {
            match script {
                Script::Records(n) => {
                    tx.set_state(ExecutionState::Running);
                    for i in 0..n {
                        if !tx.send(record(&host, i)).await {
                            return;
                        }
                    }
                    tx.complete();
                }
                Script::Fail(message) => {
                    tx.fail(SearchError::Execution {
                        host: display,
                        message: message.to_string(),
                    })
                    .await;
                }
                Script::Timeout => {
                    tx.fail(SearchError::Timeout {
                        host: display,
                        after: Duration::from_secs(1),
                    })
                    .await;
                }
                Script::Flaky { .. } => {
                    tx.set_state(ExecutionState::Running);
                    if !tx.send(record(&host, 0)).await {
                        return;
                    }
                    tx.fail(SearchError::Timeout {
                        host: display,
                        after: Duration::from_secs(1),
                    })
                    .await;
                }
                Script::Hang => {
                    tx.set_state(ExecutionState::Running);
                    let _ = tx.send(record(&host, 0)).await;
                    std::future::pending::<()>().await;
                }
            }
        })
    }
}

/// Member directory answering with a fixed reply.
#[derive(Debug)]
pub struct FakeDirectory {
    members: Option<Vec<ShcMember>>,
    calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn members(members: Vec<ShcMember>) -> Self {
        Self {
            members: Some(members),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            members: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MemberDirectory for FakeDirectory {
    async fn members(&self, _vip: &Target) -> Result<Vec<ShcMember>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.members {
            Some(members) => Ok(members.clone()),
            None => Err(ClientError::MaxRetriesExceeded(3)),
        }
    }
}

pub fn member(host: &str, status: ShcMemberStatus) -> ShcMember {
    ShcMember {
        id: format!("guid-{host}"),
        label: Some(host.to_string()),
        host: Some(host.to_string()),
        port: Some(8089),
        mgmt_uri: None,
        status,
        is_captain: false,
        site: None,
    }
}

/// Local-only config writing `<root>/<host>.json`, no date partitions, no retry delay.
pub fn local_config(root: &Path, hosts: &[&str]) -> Config {
    let mut config = Config::default();
    config.write_to_local_file = true;
    config.connection.hosts = hosts.iter().map(|h| h.to_string()).collect();
    config.search.query = "index=main".to_string();
    config.output.local.root = root.to_path_buf();
    config.output.file_name_template = "<host>.json".to_string();
    config.output.date_partition = false;
    config.execution.retry_delay_ms = 0;
    config
}

pub fn read_lines(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("missing artifact {}: {e}", path.display()))
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
