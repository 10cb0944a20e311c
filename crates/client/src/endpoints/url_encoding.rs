//! Percent-encoding for values interpolated into REST paths.
//!
//! Search IDs come back from the server and are echoed into paths such as
//! `/services/search/jobs/{sid}`; a `/` in one must never create a nested path.
//!
//! ```
//! use splunk_client::endpoints::url_encoding::encode_path_segment;
//!
//! assert_eq!(encode_path_segment("scheduler__admin/search"), "scheduler__admin%2Fsearch");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Characters that must be percent-encoded in a single path segment.
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'~')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'+')
    .add(b',')
    .add(b';')
    .add(b'[')
    .add(b']');

/// Percent-encode a string for safe use as one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}
