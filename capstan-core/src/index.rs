//! In-memory package index.
//!
//! Maps package name to the versions seen for it, in ingestion order. The
//! index is strictly append-only: nothing is ever removed or deduplicated,
//! so re-ingesting a stream doubles its version lists. Package names are
//! compared by exact string equality, no normalization.

use std::collections::HashMap;

use regex::Regex;

/// Append-only mapping from package name to its version history.
#[derive(Debug, Default, Clone)]
pub struct PackageIndex {
    entries: HashMap<String, Vec<String>>,
}

impl PackageIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `version` to `package`, creating the package on first sight.
    ///
    /// Never fails and never deduplicates.
    pub fn append(&mut self, package: impl Into<String>, version: impl Into<String>) {
        self.entries
            .entry(package.into())
            .or_default()
            .push(version.into());
    }

    /// Full view of the index for enumeration.
    pub fn snapshot(&self) -> &HashMap<String, Vec<String>> {
        &self.entries
    }

    /// Versions recorded for one package, in ingestion order.
    pub fn versions(&self, package: &str) -> Option<&[String]> {
        self.entries.get(package).map(Vec::as_slice)
    }

    /// Packages whose name matches `pattern` anywhere, each with its full
    /// version list.
    ///
    /// The match is unanchored: `prometheus` matches
    /// `ack-prometheusservice-controller` too. Key order of the returned map
    /// is unspecified; the key set and per-key version order are not.
    pub fn search(&self, pattern: &Regex) -> HashMap<String, Vec<String>> {
        self.entries
            .iter()
            .filter(|(package, _)| pattern.is_match(package))
            .map(|(package, versions)| (package.clone(), versions.clone()))
            .collect()
    }

    /// Number of distinct packages.
    pub fn package_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of versions across all packages.
    pub fn version_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
