//! Bundle record decoding.
//!
//! Each line of a rendered catalog is a standalone JSON object tagged with a
//! `schema` field. Only `olm.bundle` records carry package information; the
//! rest of the stream (packages, channels, properties) is skipped here.

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;

/// Schema tag identifying bundle records in a catalog stream.
pub const BUNDLE_SCHEMA: &str = "olm.bundle";

/// One decoded catalog record, reduced to the two fields ingestion reads.
///
/// Bundles carry plenty of other metadata (properties, images, related
/// references); all of it is ignored. `name` is kept as a raw value so a
/// non-string name filters the record instead of failing the decode.
#[derive(Debug, Deserialize)]
pub struct BundleRecord {
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub name: Option<Value>,
}

/// Outcome of examining one decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// An admitted bundle: package name plus the version remainder.
    Bundle { package: String, version: String },
    /// Wrong or missing schema, or no usable `name`. Skipped silently.
    Filtered,
    /// An `olm.bundle` whose name has no `.` separator. Skipped with a report.
    MalformedName(String),
}

impl BundleRecord {
    /// Decode a single catalog line.
    ///
    /// Only JSON objects are recognized; any other value type on a line
    /// counts as a decode failure upstream. The object check is explicit:
    /// derived deserialization alone would also admit a sequence form.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        if !value.is_object() {
            return Err(serde_json::Error::custom("expected a JSON object"));
        }
        Self::deserialize(value)
    }

    /// Classify the record and split its bundle name.
    ///
    /// Bundle names are compound: `<package>.<version-remainder>`, split at
    /// the first `.`. Everything after the first separator is the version,
    /// further dots included. A name with no separator cannot yield a
    /// package/version pair and is reported rather than guessed at.
    pub fn classify(self) -> RecordOutcome {
        if self.schema.as_deref() != Some(BUNDLE_SCHEMA) {
            return RecordOutcome::Filtered;
        }

        let name = match self.name {
            Some(Value::String(name)) => name,
            _ => return RecordOutcome::Filtered,
        };

        match name.split_once('.') {
            Some((package, version)) => RecordOutcome::Bundle {
                package: package.to_string(),
                version: version.to_string(),
            },
            None => RecordOutcome::MalformedName(name),
        }
    }
}
