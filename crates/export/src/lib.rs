//! Splunk search-result export pipeline.
//!
//! A run resolves the search heads to query (directly, or through a VIP's
//! cluster member list), executes the configured search against each of them
//! for every time window, and writes each result set to the local filesystem
//! and/or object storage. Per-target failures are isolated and reported in a
//! [`RunSummary`].
//!
//! # Example
//!
//! ```rust,ignore
//! use splunk_export::{CancellationToken, ExportOrchestrator};
//!
//! let orchestrator = ExportOrchestrator::from_config(&config, CancellationToken::new())?;
//! let summary = orchestrator.run(&config).await?;
//! println!("{}", serde_json::to_string_pretty(&summary)?);
//! ```

pub mod cancellation;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod record;
pub mod resolver;
pub mod search;
pub mod summary;
pub mod target;
pub mod telemetry;
pub mod window;
pub mod writer;

pub use cancellation::CancellationToken;
pub use error::{
    ErrorKind, ExportError, LocalWriteError, RemoteWriteError, ResolutionError, SearchError,
};
pub use job::{Destination, SearchJob, plan_jobs, render_file_name};
pub use orchestrator::ExportOrchestrator;
pub use record::{ExecutionState, RecordSender, RecordStream, ResultRecord};
pub use resolver::{HostResolver, MemberDirectory, SplunkMemberDirectory};
pub use search::{ExecutionSettings, SearchClient, SplunkSearchClient};
pub use summary::{JobOutcome, JobStatus, OverallStatus, RunSummary, TargetStatus, TargetSummary};
pub use target::Target;
pub use telemetry::{MetricsExporter, MetricsExporterError};
pub use window::{TimeWindow, plan_windows};
pub use writer::{
    LocalSink, ObjectSink, ResultWriter, SinkDescriptor, SinkKind, SinkOutcome, SinkStatus,
    WriteResult,
};
