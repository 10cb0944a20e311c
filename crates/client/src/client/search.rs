//! Export and search job methods for [`SplunkClient`].
//!
//! # What this module handles:
//! - Starting streaming exports
//! - Creating, polling, paging and cancelling search jobs
//!
//! # What this module does NOT handle:
//! - Low-level search endpoint HTTP calls (in [`crate::endpoints::search`])
//! - Progress timeouts and polling cadence (decided by the caller)

use crate::client::SplunkClient;
use crate::endpoints::{self, ExportStream, SearchOptions};
use crate::error::Result;
use crate::models::{SearchJobResults, SearchJobStatus};

impl SplunkClient {
    /// Start a streaming export of `query`.
    ///
    /// The returned stream owns the response and no longer needs the client,
    /// so callers sharing a client can release it before reading rows.
    pub async fn export(&mut self, query: &str, options: &SearchOptions) -> Result<ExportStream> {
        let query = endpoints::normalize_query(query);
        crate::retry_call!(
            self,
            __token,
            endpoints::export_search(
                &self.http,
                &self.base_url,
                &__token,
                &query,
                options,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }

    /// Create a normal (asynchronous) search job and return its SID.
    pub async fn create_search_job(
        &mut self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<String> {
        let query = endpoints::normalize_query(query);
        crate::retry_call!(
            self,
            __token,
            endpoints::create_job(
                &self.http,
                &self.base_url,
                &__token,
                &query,
                options,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }

    /// Get the status of a search job.
    pub async fn job_status(&mut self, sid: &str) -> Result<SearchJobStatus> {
        crate::retry_call!(
            self,
            __token,
            endpoints::get_job_status(
                &self.http,
                &self.base_url,
                &__token,
                sid,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }

    /// Get one page of results from a search job.
    pub async fn job_results(
        &mut self,
        sid: &str,
        count: u64,
        offset: u64,
    ) -> Result<SearchJobResults> {
        crate::retry_call!(
            self,
            __token,
            endpoints::get_results(
                &self.http,
                &self.base_url,
                &__token,
                sid,
                count,
                offset,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }

    /// Cancel a search job.
    pub async fn cancel_job(&mut self, sid: &str) -> Result<()> {
        crate::retry_call!(
            self,
            __token,
            endpoints::cancel_job(
                &self.http,
                &self.base_url,
                &__token,
                sid,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }
}
