//! Search parameters shared by job creation and streaming export.

/// Optional parameters of a search submission.
///
/// Empty time bounds are dropped because Splunk answers them with HTTP 400.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Inclusive lower time bound (epoch seconds or Splunk time modifier).
    pub earliest_time: Option<String>,
    /// Exclusive upper time bound.
    pub latest_time: Option<String>,
    /// Maximum number of results the search may produce.
    pub max_count: Option<u64>,
    /// Event sampling ratio; only sent when above 1.
    pub sample_ratio: Option<u32>,
    /// Seconds to keep the job after processing stops.
    pub ttl_secs: Option<u64>,
}

impl SearchOptions {
    /// Form parameters for this submission, excluding `search` and `output_mode`.
    pub fn form_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(earliest) = self.earliest_time.as_deref().map(str::trim)
            && !earliest.is_empty()
        {
            params.push(("earliest_time", earliest.to_string()));
        }
        if let Some(latest) = self.latest_time.as_deref().map(str::trim)
            && !latest.is_empty()
        {
            params.push(("latest_time", latest.to_string()));
        }
        if let Some(max_count) = self.max_count {
            params.push(("max_count", max_count.to_string()));
        }
        if let Some(ratio) = self.sample_ratio
            && ratio > 1
        {
            params.push(("sample_ratio", ratio.to_string()));
        }
        if let Some(ttl) = self.ttl_secs {
            params.push(("timeout", ttl.to_string()));
        }
        params
    }
}
