//! Catalog error types.
//!
//! Only two conditions surface to callers as hard errors: a stream that
//! fails mid-read and a search pattern that does not compile. Per-record
//! problems never abort ingestion; they are absorbed and reported through
//! [`IngestSummary`](crate::ingest::IngestSummary) counters.

use thiserror::Error;

/// Errors surfaced by catalog ingestion and search.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog stream failed before reaching end-of-stream.
    ///
    /// Records admitted before the failure stay in the index; retrying means
    /// re-ingesting a fresh stream.
    #[error("failed to read catalog stream at line {line}")]
    StreamRead {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// The search pattern is not a valid regular expression.
    ///
    /// Raised before the index is touched; a failed search never returns a
    /// partial result.
    #[error("invalid search pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
