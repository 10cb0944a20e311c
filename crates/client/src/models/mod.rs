//! Data models for Splunk API responses.

mod common;
mod jobs;
mod shc;

pub use common::{MessageType, SplunkMessage, SplunkMessages};
pub use jobs::{SearchJobResults, SearchJobStatus};
pub use shc::{ShcMember, ShcMemberStatus};
