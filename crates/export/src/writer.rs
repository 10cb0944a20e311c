//! Artifact writing: local files and object storage.
//!
//! Responsibilities:
//! - Encode a job's records once (NDJSON or a JSON array) and fan each
//!   encoded chunk out to every enabled sink that is still healthy.
//! - Publish atomically: local artifacts are renamed into place from a
//!   temporary file in the same directory; objects are spooled to a local
//!   temporary file and uploaded with a single `write`.
//! - Report one [`SinkOutcome`] per enabled sink.
//!
//! Does NOT handle:
//! - Running searches or retrying them (see `search`, `orchestrator`).
//!
//! Invariants:
//! - At most one chunk of `chunk_records` encoded records is held in memory
//!   before it is handed to the sinks.
//! - A failed or cancelled record stream publishes nothing; temporary files
//!   are removed when dropped.
//! - A failing sink never stops the other one.

use opendal::Operator;
use serde::Serialize;
use splunk_export_config::{Config, OutputFormat, S3OutputConfig};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::cancellation::CancellationToken;
use crate::error::{ErrorKind, ExportError, LocalWriteError, RemoteWriteError, SearchError};
use crate::job::SearchJob;
use crate::record::{ExecutionState, RecordStream, ResultRecord};

const TEMP_PREFIX: &str = ".splunk-export-";

/// Local filesystem destination.
#[derive(Debug, Clone)]
pub struct LocalSink {
    pub root: PathBuf,
}

/// Object storage destination.
#[derive(Debug, Clone)]
pub struct ObjectSink {
    pub operator: Operator,
    pub key_prefix: String,
}

/// The sinks enabled for a run.
#[derive(Debug, Clone, Default)]
pub struct SinkDescriptor {
    pub local: Option<LocalSink>,
    pub object: Option<ObjectSink>,
}

impl SinkDescriptor {
    /// Build the enabled sinks.
    ///
    /// `object_store` replaces the S3 operator built from `output.s3`.
    ///
    /// # Errors
    ///
    /// [`ExportError::Configuration`] when no sink is enabled or the S3
    /// operator cannot be built.
    pub fn from_config(
        config: &Config,
        object_store: Option<Operator>,
    ) -> Result<Self, ExportError> {
        if !config.any_sink_enabled() {
            return Err(ExportError::Configuration(
                "no sink enabled: set write_to_local_file and/or write_to_s3".to_string(),
            ));
        }

        let local = config.write_to_local_file.then(|| LocalSink {
            root: config.output.local.root.clone(),
        });

        let object = if config.write_to_s3 {
            let operator = match object_store {
                Some(operator) => operator,
                None => s3_operator(&config.output.s3)?,
            };
            Some(ObjectSink {
                operator,
                key_prefix: config.output.s3.key_prefix.clone(),
            })
        } else {
            None
        };

        Ok(Self { local, object })
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_none() && self.object.is_none()
    }
}

/// Build an S3 operator from the output configuration.
pub fn s3_operator(s3: &S3OutputConfig) -> Result<Operator, ExportError> {
    use opendal::services;
    use secrecy::ExposeSecret;

    let bucket = s3
        .bucket
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| {
            ExportError::Configuration("write_to_s3 requires output.s3.bucket".to_string())
        })?;

    let mut builder = services::S3::default().bucket(bucket);
    if let Some(region) = s3.region.as_deref() {
        builder = builder.region(region);
    }
    if let Some(endpoint) = s3.endpoint.as_deref() {
        builder = builder.endpoint(endpoint);
    }
    if let Some(key) = s3.access_key_id.as_deref() {
        builder = builder.access_key_id(key);
    }
    if let Some(secret) = s3.secret_access_key.as_ref() {
        builder = builder.secret_access_key(secret.expose_secret());
    }

    Operator::new(builder)
        .map(|op| op.finish())
        .map_err(|e| ExportError::Configuration(format!("invalid S3 configuration: {e}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    Local,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkStatus {
    Written,
    Skipped,
    Failed,
}

/// Result of one sink for one job.
#[derive(Debug, Clone, Serialize)]
pub struct SinkOutcome {
    pub sink: SinkKind,
    /// Final path or object key.
    pub location: String,
    pub status: SinkStatus,
    pub bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl SinkOutcome {
    pub fn delivered(&self) -> bool {
        matches!(self.status, SinkStatus::Written | SinkStatus::Skipped)
    }
}

/// Result of writing one job's records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteResult {
    pub records: u64,
    pub bytes: u64,
    pub sinks: Vec<SinkOutcome>,
}

impl WriteResult {
    /// True if at least one sink holds the artifact.
    pub fn delivered(&self) -> bool {
        self.sinks.iter().any(SinkOutcome::delivered)
    }

    pub fn all_succeeded(&self) -> bool {
        !self.sinks.is_empty() && self.sinks.iter().all(SinkOutcome::delivered)
    }
}

/// Writes record streams to the enabled sinks.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    sinks: SinkDescriptor,
    format: OutputFormat,
    chunk_records: usize,
}

impl ResultWriter {
    pub fn new(sinks: SinkDescriptor, format: OutputFormat, chunk_records: usize) -> Self {
        Self {
            sinks,
            format,
            chunk_records: chunk_records.max(1),
        }
    }

    pub fn sinks(&self) -> &SinkDescriptor {
        &self.sinks
    }

    /// True when every enabled sink already holds the job's artifact.
    pub async fn exists(&self, job: &SearchJob) -> bool {
        if self.sinks.is_empty() {
            return false;
        }
        if let Some(local) = &self.sinks.local {
            let path = job.destination.local_path(&local.root);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return false;
            }
        }
        if let Some(object) = &self.sinks.object {
            let key = job.destination.object_key(&object.key_prefix);
            match object.operator.stat(&key).await {
                Ok(_) => {}
                Err(e) if e.kind() == opendal::ErrorKind::NotFound => return false,
                Err(e) => {
                    warn!(key = %key, error = %e, "Could not check for existing object");
                    return false;
                }
            }
        }
        true
    }

    /// Outcomes reported for a job skipped because its artifacts exist.
    pub fn skipped(&self, job: &SearchJob) -> WriteResult {
        let mut sinks = Vec::new();
        if let Some(local) = &self.sinks.local {
            sinks.push(SinkOutcome {
                sink: SinkKind::Local,
                location: job.destination.local_path(&local.root).display().to_string(),
                status: SinkStatus::Skipped,
                bytes: 0,
                error: None,
                error_kind: None,
            });
        }
        if let Some(object) = &self.sinks.object {
            sinks.push(SinkOutcome {
                sink: SinkKind::Object,
                location: job.destination.object_key(&object.key_prefix),
                status: SinkStatus::Skipped,
                bytes: 0,
                error: None,
                error_kind: None,
            });
        }
        WriteResult {
            records: 0,
            bytes: 0,
            sinks,
        }
    }

    /// Drain `records` into every enabled sink.
    ///
    /// # Errors
    ///
    /// Returns the stream's [`SearchError`] (or `Cancelled`) without
    /// publishing anything. Sink failures are reported in the returned
    /// [`WriteResult`] instead.
    pub async fn write(
        &self,
        records: &mut RecordStream,
        job: &SearchJob,
        cancel: &CancellationToken,
    ) -> Result<WriteResult, SearchError> {
        let mut pending = Vec::with_capacity(2);
        if let Some(local) = &self.sinks.local {
            pending.push(PendingSink::local(local, job).await);
        }
        if let Some(object) = &self.sinks.object {
            pending.push(PendingSink::object(object, job));
        }

        let mut encoder = Encoder::new(self.format);
        let mut chunk = Vec::new();
        let mut chunk_len = 0usize;
        let mut records_written = 0u64;
        let mut bytes = 0u64;
        encoder.open(&mut chunk);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SearchError::Cancelled),
                next = records.next_record() => next,
            };
            let record = match next {
                None => break,
                Some(Err(err)) => return Err(err),
                Some(Ok(record)) => record,
            };

            encoder
                .record(&record, &mut chunk)
                .map_err(|e| SearchError::Execution {
                    host: job.target.to_string(),
                    message: format!("failed to encode record: {e}"),
                })?;
            records_written += 1;
            chunk_len += 1;

            if chunk_len >= self.chunk_records {
                bytes += chunk.len() as u64;
                fan_out(&mut pending, &chunk).await;
                chunk.clear();
                chunk_len = 0;
                if pending.iter().all(|p| p.failure.is_some()) {
                    warn!(job = %job.label(), "Every sink failed, abandoning the record stream");
                    break;
                }
            }
        }

        if pending.iter().any(|p| p.failure.is_none())
            && records.state() != ExecutionState::Completed
        {
            return Err(SearchError::Execution {
                host: job.target.to_string(),
                message: "search ended before completion".to_string(),
            });
        }

        encoder.close(&mut chunk);
        bytes += chunk.len() as u64;
        fan_out(&mut pending, &chunk).await;

        let mut sinks = Vec::with_capacity(pending.len());
        for sink in pending {
            sinks.push(sink.publish(bytes).await);
        }

        debug!(
            job = %job.label(),
            records = records_written,
            bytes,
            "Records written"
        );
        Ok(WriteResult {
            records: records_written,
            bytes,
            sinks,
        })
    }
}

async fn fan_out(pending: &mut [PendingSink], chunk: &[u8]) {
    if chunk.is_empty() {
        return;
    }
    for sink in pending.iter_mut() {
        sink.append(chunk).await;
    }
}

/// Incremental NDJSON / JSON array encoder.
struct Encoder {
    format: OutputFormat,
    written: u64,
}

impl Encoder {
    fn new(format: OutputFormat) -> Self {
        Self { format, written: 0 }
    }

    fn open(&self, out: &mut Vec<u8>) {
        if self.format == OutputFormat::Json {
            out.push(b'[');
        }
    }

    fn record(&mut self, record: &ResultRecord, out: &mut Vec<u8>) -> serde_json::Result<()> {
        match self.format {
            OutputFormat::Ndjson => {
                serde_json::to_writer(&mut *out, record)?;
                out.push(b'\n');
            }
            OutputFormat::Json => {
                if self.written > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, record)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    fn close(&self, out: &mut Vec<u8>) {
        if self.format == OutputFormat::Json {
            out.extend_from_slice(b"]\n");
        }
    }
}

enum Publish {
    Rename(PathBuf),
    Upload { operator: Operator, key: String },
}

/// One sink's temporary file while a job is being written.
struct PendingSink {
    kind: SinkKind,
    location: String,
    publish: Publish,
    temp: Option<NamedTempFile>,
    file: Option<tokio::fs::File>,
    failure: Option<(String, ErrorKind)>,
}

impl PendingSink {
    async fn local(sink: &LocalSink, job: &SearchJob) -> Self {
        let path = job.destination.local_path(&sink.root);
        let mut pending = Self {
            kind: SinkKind::Local,
            location: path.display().to_string(),
            publish: Publish::Rename(path.clone()),
            temp: None,
            file: None,
            failure: None,
        };

        if job.destination.collides {
            pending.fail_local(LocalWriteError::PathCollision { path });
            return pending;
        }

        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        if let Err(source) = tokio::fs::create_dir_all(parent).await {
            pending.fail_local(LocalWriteError::Io {
                path: parent.to_path_buf(),
                source,
            });
            return pending;
        }

        match spool_file(Some(parent)) {
            Ok((temp, file)) => {
                pending.temp = Some(temp);
                pending.file = Some(file);
            }
            Err(source) => pending.fail_local(LocalWriteError::Io { path, source }),
        }
        pending
    }

    fn object(sink: &ObjectSink, job: &SearchJob) -> Self {
        let key = job.destination.object_key(&sink.key_prefix);
        let mut pending = Self {
            kind: SinkKind::Object,
            location: key.clone(),
            publish: Publish::Upload {
                operator: sink.operator.clone(),
                key: key.clone(),
            },
            temp: None,
            file: None,
            failure: None,
        };
        match spool_file(None) {
            Ok((temp, file)) => {
                pending.temp = Some(temp);
                pending.file = Some(file);
            }
            Err(source) => pending.fail_remote(RemoteWriteError::Spool { key, source }),
        }
        pending
    }

    async fn append(&mut self, chunk: &[u8]) {
        if self.failure.is_some() {
            return;
        }
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(source) = file.write_all(chunk).await {
            self.fail_io(source);
        }
    }

    fn fail_io(&mut self, source: std::io::Error) {
        match &self.publish {
            Publish::Rename(path) => {
                let path = path.clone();
                self.fail_local(LocalWriteError::Io { path, source });
            }
            Publish::Upload { key, .. } => {
                let key = key.clone();
                self.fail_remote(RemoteWriteError::Spool { key, source });
            }
        }
    }

    fn fail_local(&mut self, err: LocalWriteError) {
        warn!(path = %self.location, error = %err, "Local sink failed");
        self.discard();
        self.failure = Some((err.to_string(), ErrorKind::LocalWrite));
    }

    fn fail_remote(&mut self, err: RemoteWriteError) {
        warn!(key = %self.location, error = %err, "Object sink failed");
        self.discard();
        self.failure = Some((err.to_string(), ErrorKind::RemoteWrite));
    }

    fn discard(&mut self) {
        self.file = None;
        self.temp = None;
    }

    async fn finish_file(&mut self) -> std::io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        Ok(())
    }

    async fn publish(mut self, bytes: u64) -> SinkOutcome {
        if self.failure.is_none() {
            if let Err(source) = self.finish_file().await {
                self.fail_io(source);
            }
        }

        if self.failure.is_none() {
            match self.temp.take() {
                Some(temp) => match &self.publish {
                    Publish::Rename(path) => {
                        if let Err(e) = temp.persist(path) {
                            let path = path.clone();
                            self.fail_local(LocalWriteError::Io {
                                path,
                                source: e.error,
                            });
                        }
                    }
                    Publish::Upload { operator, key } => {
                        let outcome = match tokio::fs::read(temp.path()).await {
                            Ok(body) => operator
                                .write(key, body)
                                .await
                                .map(|_| ())
                                .map_err(|source| RemoteWriteError::Upload {
                                    key: key.clone(),
                                    source,
                                }),
                            Err(source) => Err(RemoteWriteError::Spool {
                                key: key.clone(),
                                source,
                            }),
                        };
                        if let Err(err) = outcome {
                            self.fail_remote(err);
                        }
                    }
                },
                None => self.fail_io(std::io::Error::other("temporary file missing")),
            }
        }

        match self.failure {
            Some((message, kind)) => SinkOutcome {
                sink: self.kind,
                location: self.location,
                status: SinkStatus::Failed,
                bytes: 0,
                error: Some(message),
                error_kind: Some(kind),
            },
            None => {
                info!(location = %self.location, bytes, "Artifact published");
                SinkOutcome {
                    sink: self.kind,
                    location: self.location,
                    status: SinkStatus::Written,
                    bytes,
                    error: None,
                    error_kind: None,
                }
            }
        }
    }
}

/// Create a temporary file in `dir` (or the system temp dir) plus an async
/// handle writing to it.
fn spool_file(dir: Option<&Path>) -> std::io::Result<(NamedTempFile, tokio::fs::File)> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX).suffix(".tmp");
    let temp = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    let file = tokio::fs::File::from_std(temp.as_file().try_clone()?);
    Ok((temp, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Destination;
    use crate::record::RecordSender;
    use crate::target::Target;
    use crate::window::TimeWindow;
    use serde_json::{Map, json};
    use splunk_export_config::{Scheme, SearchMode};

    fn job(path: &str, collides: bool) -> SearchJob {
        SearchJob {
            target: Target::new("sh1", 8089, Scheme::Https),
            query: "index=main".to_string(),
            mode: SearchMode::Export,
            window: TimeWindow::Range {
                earliest: None,
                latest: None,
            },
            sample_ratio: 1,
            max_count: None,
            job_ttl_secs: None,
            destination: Destination {
                relative_path: path.to_string(),
                collides,
            },
            sequence: 0,
        }
    }

    fn record(n: u64) -> ResultRecord {
        let mut fields = Map::new();
        fields.insert("n".to_string(), json!(n));
        fields.insert("host".to_string(), json!("web-01"));
        ResultRecord::new(fields)
    }

    fn scripted(records: Vec<ResultRecord>) -> RecordStream {
        RecordStream::spawn(2, move |tx: RecordSender| async move {
            tx.set_state(ExecutionState::Running);
            for r in records {
                if !tx.send(r).await {
                    return;
                }
            }
            tx.complete();
        })
    }

    fn local_writer(root: &Path, format: OutputFormat) -> ResultWriter {
        ResultWriter::new(
            SinkDescriptor {
                local: Some(LocalSink {
                    root: root.to_path_buf(),
                }),
                object: None,
            },
            format,
            2,
        )
    }

    fn memory_operator() -> Operator {
        Operator::new(opendal::services::Memory::default())
            .unwrap()
            .finish()
    }

    #[tokio::test]
    async fn test_ndjson_local_write() {
        let dir = tempfile::tempdir().unwrap();
        let writer = local_writer(dir.path(), OutputFormat::Ndjson);
        let job = job("2023/10/17/a.json", false);

        let mut stream = scripted((0..5).map(record).collect());
        let result = writer
            .write(&mut stream, &job, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.records, 5);
        assert!(result.all_succeeded());
        let text = std::fs::read_to_string(dir.path().join("2023/10/17/a.json")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], r#"{"n":0,"host":"web-01"}"#);
        assert_eq!(result.bytes, text.len() as u64);
    }

    #[tokio::test]
    async fn test_empty_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let writer = local_writer(dir.path(), OutputFormat::Json);
        let job = job("empty.json", false);

        let mut stream = scripted(Vec::new());
        let result = writer
            .write(&mut stream, &job, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.records, 0);
        let text = std::fs::read_to_string(dir.path().join("empty.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!([]));
    }

    #[tokio::test]
    async fn test_json_array_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let writer = local_writer(dir.path(), OutputFormat::Json);
        let job = job("three.json", false);

        let mut stream = scripted((0..3).map(record).collect());
        writer
            .write(&mut stream, &job, &CancellationToken::new())
            .await
            .unwrap();

        let parsed: Vec<serde_json::Value> =
            serde_json::from_slice(&std::fs::read(dir.path().join("three.json")).unwrap()).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[2]["n"], json!(2));
    }

    #[tokio::test]
    async fn test_stream_error_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = local_writer(dir.path(), OutputFormat::Ndjson);
        let job = job("failed.json", false);

        let mut stream = RecordStream::spawn(2, |tx| async move {
            tx.set_state(ExecutionState::Running);
            let _ = tx.send(record(1)).await;
            tx.fail(SearchError::Execution {
                host: "sh1:8089".to_string(),
                message: "boom".to_string(),
            })
            .await;
        });
        let err = writer
            .write(&mut stream, &job, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SearchExecution);
        assert!(!dir.path().join("failed.json").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_stream_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let writer = local_writer(dir.path(), OutputFormat::Ndjson);
        let job = job("partial.json", false);

        let mut stream = RecordStream::spawn(2, |tx| async move {
            let _ = tx.send(record(1)).await;
        });
        let err = writer
            .write(&mut stream, &job, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SearchExecution);
        assert!(!dir.path().join("partial.json").exists());
    }

    #[tokio::test]
    async fn test_cancellation_abandons_write() {
        let dir = tempfile::tempdir().unwrap();
        let writer = local_writer(dir.path(), OutputFormat::Ndjson);
        let job = job("cancelled.json", false);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (_tx, mut stream) = RecordStream::channel(1);
        let err = writer.write(&mut stream, &job, &cancel).await.unwrap_err();
        assert!(matches!(err, SearchError::Cancelled));
        assert!(!dir.path().join("cancelled.json").exists());
    }

    #[tokio::test]
    async fn test_path_collision_fails_local_only() {
        let dir = tempfile::tempdir().unwrap();
        let operator = memory_operator();
        let writer = ResultWriter::new(
            SinkDescriptor {
                local: Some(LocalSink {
                    root: dir.path().to_path_buf(),
                }),
                object: Some(ObjectSink {
                    operator: operator.clone(),
                    key_prefix: "raw/".to_string(),
                }),
            },
            OutputFormat::Ndjson,
            10,
        );
        let job = job("dup.json", true);

        let mut stream = scripted(vec![record(1)]);
        let result = writer
            .write(&mut stream, &job, &CancellationToken::new())
            .await
            .unwrap();

        let local = &result.sinks[0];
        assert_eq!(local.status, SinkStatus::Failed);
        assert_eq!(local.error_kind, Some(ErrorKind::LocalWrite));
        assert_eq!(result.sinks[1].status, SinkStatus::Written);
        assert!(result.delivered());
        assert!(!result.all_succeeded());
        assert!(!dir.path().join("dup.json").exists());

        let body = operator.read("raw/dup.json").await.unwrap().to_vec();
        assert_eq!(body, b"{\"n\":1,\"host\":\"web-01\"}\n");
    }

    #[tokio::test]
    async fn test_exists_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let writer = local_writer(dir.path(), OutputFormat::Ndjson);
        let job = job("2023/01/01/x.json", false);
        assert!(!writer.exists(&job).await);

        std::fs::create_dir_all(dir.path().join("2023/01/01")).unwrap();
        std::fs::write(dir.path().join("2023/01/01/x.json"), b"").unwrap();
        assert!(writer.exists(&job).await);

        let skipped = writer.skipped(&job);
        assert_eq!(skipped.sinks.len(), 1);
        assert_eq!(skipped.sinks[0].status, SinkStatus::Skipped);
        assert!(skipped.all_succeeded());
    }

    #[test]
    fn test_no_sink_is_configuration_error() {
        let config = Config::default();
        let err = SinkDescriptor::from_config(&config, None).unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
    }

    #[test]
    fn test_s3_requires_bucket() {
        let err = s3_operator(&S3OutputConfig::default()).unwrap_err();
        assert!(err.to_string().contains("bucket"));
    }
}
