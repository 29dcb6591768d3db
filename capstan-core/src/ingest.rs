//! Streaming catalog ingestion.
//!
//! Rendered catalogs arrive as newline-delimited JSON of arbitrary size, so
//! ingestion reads one line at a time instead of buffering the payload. One
//! bad line never aborts the pass; only a failed read does. Everything that
//! gets dropped is counted, so callers can tell a clean catalog from a noisy
//! one without the stream erroring out.

use std::io::BufRead;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::index::PackageIndex;
use crate::record::{BundleRecord, RecordOutcome};

/// Counters describing one ingestion pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Lines admitted as `olm.bundle` records and appended to the index.
    pub admitted: usize,
    /// Lines that failed to decode as a JSON object.
    pub decode_failures: usize,
    /// Decoded records excluded by schema or missing/non-string name.
    pub filtered: usize,
    /// Bundle records dropped because their name has no `.` separator.
    pub malformed_names: usize,
    /// Total lines consumed, empty ones included.
    pub lines: usize,
}

/// Ingest a catalog stream into `index`.
///
/// Reads `reader` to end-of-stream, appending one `(package, version)` pair
/// per admitted bundle record in stream order. The index is the sole output;
/// the returned summary only counts what happened. A read failure other than
/// clean end-of-stream returns [`CatalogError::StreamRead`] and leaves
/// already-admitted records in place.
pub fn ingest_stream<R: BufRead>(
    reader: R,
    index: &mut PackageIndex,
) -> Result<IngestSummary, CatalogError> {
    let mut summary = IngestSummary::default();

    for line in reader.lines() {
        summary.lines += 1;
        let line = line.map_err(|source| CatalogError::StreamRead {
            line: summary.lines,
            source,
        })?;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = match BundleRecord::from_line(line) {
            Ok(record) => record,
            Err(err) => {
                summary.decode_failures += 1;
                debug!("dropping undecodable catalog line {}: {}", summary.lines, err);
                continue;
            }
        };

        match record.classify() {
            RecordOutcome::Bundle { package, version } => {
                index.append(package, version);
                summary.admitted += 1;
            }
            RecordOutcome::Filtered => {
                summary.filtered += 1;
            }
            RecordOutcome::MalformedName(name) => {
                summary.malformed_names += 1;
                warn!("bundle name '{}' has no package separator, dropping record", name);
            }
        }
    }

    Ok(summary)
}
