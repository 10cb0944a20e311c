//! Result records and the bounded stream that carries them.
//!
//! Responsibilities:
//! - Define [`ResultRecord`], one row of search output with field order kept.
//! - Connect a spawned producer task to its consumer through a bounded
//!   `mpsc` channel ([`RecordStream`] / [`RecordSender`]).
//! - Expose the execution state (`Submitted → Running → Completed | Failed | TimedOut`).
//!
//! Does NOT handle:
//! - Talking to Splunk (see `search`).
//! - Encoding records (see `writer`).
//!
//! Invariants:
//! - The channel holds at most `capacity` records; a slow consumer blocks the producer.
//! - Dropping the stream aborts its producer task.
//! - A producer that stops without calling [`RecordSender::complete`] never
//!   reaches `Completed`; consumers treat that as a failed execution.

use futures::Stream;
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::SearchError;

/// One row of search output: an ordered mapping of field name to value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultRecord(Map<String, Value>);

impl ResultRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ResultRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Lifecycle of one search execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    Submitted,
    Running,
    Completed,
    Failed,
    TimedOut,
}

impl ExecutionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }
}

type Item = Result<ResultRecord, SearchError>;

/// Consumer half of one execution.
#[derive(Debug)]
pub struct RecordStream {
    receiver: mpsc::Receiver<Item>,
    state: watch::Receiver<ExecutionState>,
    task: Option<JoinHandle<()>>,
}

impl RecordStream {
    /// Spawn `producer` on the runtime and return the stream it feeds.
    pub fn spawn<F, Fut>(capacity: usize, producer: F) -> Self
    where
        F: FnOnce(RecordSender) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, mut stream) = Self::channel(capacity);
        stream.task = Some(tokio::spawn(producer(sender)));
        stream
    }

    /// A stream whose producer is driven by the caller.
    pub fn channel(capacity: usize) -> (RecordSender, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (state_tx, state_rx) = watch::channel(ExecutionState::Submitted);
        (
            RecordSender {
                sender: tx,
                state: state_tx,
            },
            Self {
                receiver: rx,
                state: state_rx,
                task: None,
            },
        )
    }

    /// A stream that fails immediately with `err`.
    pub fn failed(err: SearchError) -> Self {
        let (sender, stream) = Self::channel(1);
        sender.state.send_replace(terminal_state(&err));
        // Capacity is 1 and nothing else has been sent.
        let _ = sender.sender.try_send(Err(err));
        stream
    }

    /// Current execution state.
    pub fn state(&self) -> ExecutionState {
        *self.state.borrow()
    }

    /// Next record, `Some(Err(_))` on failure, `None` once the producer is done.
    pub async fn next_record(&mut self) -> Option<Item> {
        self.receiver.recv().await
    }
}

impl Stream for RecordStream {
    type Item = Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for RecordStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Producer half of one execution.
#[derive(Debug)]
pub struct RecordSender {
    sender: mpsc::Sender<Item>,
    state: watch::Sender<ExecutionState>,
}

impl RecordSender {
    pub fn set_state(&self, state: ExecutionState) {
        self.state.send_replace(state);
    }

    /// Hand one record to the consumer, waiting for room.
    ///
    /// Returns `false` once the consumer is gone; the producer should stop.
    pub async fn send(&self, record: ResultRecord) -> bool {
        self.sender.send(Ok(record)).await.is_ok()
    }

    /// End the execution with `err`.
    pub async fn fail(self, err: SearchError) {
        self.state.send_replace(terminal_state(&err));
        let _ = self.sender.send(Err(err)).await;
    }

    /// End the execution successfully.
    pub fn complete(self) {
        self.state.send_replace(ExecutionState::Completed);
    }
}

fn terminal_state(err: &SearchError) -> ExecutionState {
    if err.is_timeout() {
        ExecutionState::TimedOut
    } else {
        ExecutionState::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    fn record(n: u64) -> ResultRecord {
        let mut fields = Map::new();
        fields.insert("n".to_string(), json!(n));
        ResultRecord::new(fields)
    }

    #[tokio::test]
    async fn test_records_then_completed() {
        let mut stream = RecordStream::spawn(2, |tx| async move {
            tx.set_state(ExecutionState::Running);
            for n in 0..5 {
                if !tx.send(record(n)).await {
                    return;
                }
            }
            tx.complete();
        });

        let mut seen = Vec::new();
        while let Some(item) = stream.next().await {
            seen.push(item.unwrap().get("n").cloned().unwrap());
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[4], json!(4));
        assert_eq!(stream.state(), ExecutionState::Completed);
    }

    #[tokio::test]
    async fn test_failure_is_observable() {
        let mut stream = RecordStream::spawn(1, |tx| async move {
            tx.fail(SearchError::Timeout {
                host: "sh1".to_string(),
                after: std::time::Duration::from_secs(1),
            })
            .await;
        });

        let item = stream.next_record().await.unwrap();
        assert!(item.unwrap_err().is_timeout());
        assert!(stream.next_record().await.is_none());
        assert_eq!(stream.state(), ExecutionState::TimedOut);
    }

    #[tokio::test]
    async fn test_dropped_producer_never_completes() {
        let mut stream = RecordStream::spawn(1, |tx| async move {
            let _ = tx.send(record(1)).await;
        });
        assert!(stream.next_record().await.is_some());
        assert!(stream.next_record().await.is_none());
        assert!(!stream.state().is_terminal());
    }

    #[tokio::test]
    async fn test_failed_constructor() {
        let mut stream = RecordStream::failed(SearchError::Cancelled);
        assert_eq!(stream.state(), ExecutionState::Failed);
        assert!(matches!(
            stream.next_record().await,
            Some(Err(SearchError::Cancelled))
        ));
    }

    #[test]
    fn test_record_serializes_in_field_order() {
        let mut fields = Map::new();
        fields.insert("z".to_string(), json!(1));
        fields.insert("a".to_string(), json!("x"));
        let rec = ResultRecord::from(fields);
        assert_eq!(serde_json::to_string(&rec).unwrap(), r#"{"z":1,"a":"x"}"#);
    }
}
