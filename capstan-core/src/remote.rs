//! Remote catalog retrieval.
//!
//! Catalog services expose their full rendered payload at
//! `<base>/api/v1/all`. This helper performs a single GET of that endpoint
//! and pipes the body through the streaming ingester. No retries and no
//! authentication; callers bound the fetch with the client timeout and retry
//! by calling again with a fresh URL.

use anyhow::{Context, Result};
use tracing::debug;

use crate::ingest::IngestSummary;
use crate::store::CatalogStore;

/// Path of the full-payload endpoint on a catalog service.
const ALL_ENDPOINT: &str = "api/v1/all";

/// Join the full-payload endpoint onto a catalog service base URL.
pub fn catalog_endpoint(base: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), ALL_ENDPOINT)
}

/// Fetch a rendered catalog payload and ingest it into `store`.
///
/// Fails on connection errors and non-success HTTP statuses; per-record
/// problems inside the payload are absorbed by ingestion as usual and show
/// up in the returned summary.
pub async fn fetch_catalog(store: &CatalogStore, url: &str) -> Result<IngestSummary> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("capstan/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch catalog from {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Failed to fetch catalog: HTTP {} from {}",
            response.status(),
            url
        );
    }

    let body = response
        .bytes()
        .await
        .context("Failed to read catalog response body")?;
    debug!("fetched {} catalog bytes from {}", body.len(), url);

    let summary = store
        .ingest(body.as_ref())
        .with_context(|| format!("Failed to ingest catalog from {url}"))?;

    Ok(summary)
}
