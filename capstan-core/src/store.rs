//! Shared catalog store.
//!
//! One `CatalogStore` is constructed by whoever wires the subsystem together
//! and handed out behind `Arc`; ingestion and search both go through it. A
//! read/write lock keeps the discipline the index needs: ingestion holds the
//! write lock for a whole stream pass, searches and snapshots share the read
//! lock. Nothing ever swaps the index out wholesale.

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::RwLock;

use regex::Regex;

use crate::error::CatalogError;
use crate::index::PackageIndex;
use crate::ingest::{ingest_stream, IngestSummary};

/// Thread-safe handle around a [`PackageIndex`].
#[derive(Debug, Default)]
pub struct CatalogStore {
    index: RwLock<PackageIndex>,
}

impl CatalogStore {
    /// Create a store with an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing index, e.g. one built ahead of time.
    pub fn with_index(index: PackageIndex) -> Self {
        Self {
            index: RwLock::new(index),
        }
    }

    /// Ingest a catalog stream under the write lock.
    ///
    /// The lock is held for the whole pass, so a search never observes a
    /// half-ingested stream. Blocks only on `reader`.
    pub fn ingest<R: BufRead>(&self, reader: R) -> Result<IngestSummary, CatalogError> {
        let mut index = self.index.write().expect("catalog index lock poisoned");
        ingest_stream(reader, &mut index)
    }

    /// Search package names with a regular expression.
    ///
    /// The pattern is compiled before the read lock is taken; an invalid
    /// pattern returns [`CatalogError::InvalidPattern`] without touching the
    /// index. Matching is unanchored over each package name.
    pub fn search(&self, pattern: &str) -> Result<HashMap<String, Vec<String>>, CatalogError> {
        let regex = Regex::new(pattern).map_err(|source| CatalogError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let index = self.index.read().expect("catalog index lock poisoned");
        Ok(index.search(&regex))
    }

    /// Cloned view of the full index.
    pub fn snapshot(&self) -> HashMap<String, Vec<String>> {
        let index = self.index.read().expect("catalog index lock poisoned");
        index.snapshot().clone()
    }

    /// Number of distinct packages currently indexed.
    pub fn package_count(&self) -> usize {
        let index = self.index.read().expect("catalog index lock poisoned");
        index.package_count()
    }

    /// Total number of versions across all packages.
    pub fn version_count(&self) -> usize {
        let index = self.index.read().expect("catalog index lock poisoned");
        index.version_count()
    }

    pub fn is_empty(&self) -> bool {
        let index = self.index.read().expect("catalog index lock poisoned");
        index.is_empty()
    }
}
