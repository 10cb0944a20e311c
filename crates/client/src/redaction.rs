//! Redaction helpers for logging user-supplied SPL.
//!
//! Search queries may contain PII, tokens or incident identifiers, so they
//! are never logged verbatim. Operators can still correlate log lines by the
//! length and hash prefix.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Redact a query string for logging, showing only length and a short hash prefix.
pub fn redact_query(query: &str) -> String {
    let mut hasher = DefaultHasher::new();
    query.hash(&mut hasher);
    let hash = hasher.finish();
    format!("<{} chars, hash={:08x}>", query.len(), hash)
}
