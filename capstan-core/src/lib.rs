//! Capstan core - OLM catalog ingestion and package search
//!
//! This crate indexes rendered OLM catalog payloads in memory and answers
//! package lookups against the result.
//!
//! # Overview
//!
//! A rendered catalog arrives as newline-delimited JSON: one metadata record
//! per line, of which only `olm.bundle` records matter here. Ingestion
//! decodes the stream line by line, extracts `(package, version)` pairs from
//! bundle names, and appends them to an in-memory index. Searches compile a
//! caller-supplied regular expression and return every indexed package whose
//! name matches, together with its full version history.
//!
//! # Architecture
//!
//! ```text
//! catalog payload (NDJSON)
//!        │
//!        ▼
//! ingest::ingest_stream    ← decode, filter, split bundle names
//!        │
//!        ▼
//! index::PackageIndex      ← package → [versions], append-only
//!        │                   (write-locked inside store::CatalogStore)
//!        ▼
//! CatalogStore::search     ← regex scan over package names, read-locked
//! ```
//!
//! `CatalogStore` is the shared entry point: whoever composes the subsystem
//! constructs one and hands it out behind `Arc`. Ingestion and search never
//! construct their own index.

pub mod error;
pub mod index;
pub mod ingest;
pub mod record;
pub mod store;

// Remote catalog retrieval
#[cfg(feature = "remote")]
pub mod remote;

// Re-export types for public API
pub use error::CatalogError;
pub use index::PackageIndex;
pub use ingest::{ingest_stream, IngestSummary};
pub use record::{BundleRecord, RecordOutcome, BUNDLE_SCHEMA};
pub use store::CatalogStore;
