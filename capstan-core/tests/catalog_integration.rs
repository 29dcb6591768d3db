//! End-to-end tests for catalog ingestion and search through the public API.

use std::fs::File;
use std::io::{BufReader, Write};

use capstan_core::{CatalogError, CatalogStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn bundle_line(name: &str) -> String {
    format!(r#"{{"schema":"olm.bundle","name":"{name}"}}"#)
}

#[test]
fn n_distinct_bundles_yield_n_entries() {
    let store = CatalogStore::new();

    let mut payload = String::new();
    for pkg in 0..10 {
        for ver in 0..3 {
            payload.push_str(&bundle_line(&format!("package-{pkg}.1.{ver}.0")));
            payload.push('\n');
        }
    }

    let summary = store.ingest(payload.as_bytes()).unwrap();

    assert_eq!(summary.admitted, 30);
    assert_eq!(store.package_count(), 10);
    assert_eq!(store.version_count(), 30);

    // Per-package sequences reflect ingestion order.
    let snapshot = store.snapshot();
    assert_eq!(
        snapshot["package-0"],
        vec!["1.0.0".to_string(), "1.1.0".to_string(), "1.2.0".to_string()]
    );
}

#[test]
fn noisy_stream_only_admits_well_formed_bundles() {
    let store = CatalogStore::new();

    let payload = concat!(
        r#"{"schema":"olm.bundle","name":"prometheus-operator.1.2.3"}"#,
        "\n",
        "not json at all\n",
        r#"{"schema":"other.kind","name":"x.1.0.0"}"#,
        "\n",
        "\n",
        r#"{"schema":"olm.bundle"}"#,
        "\n",
        r#"{"schema":"olm.bundle","name":"prometheus-operator.1.3.0"}"#,
        "\n",
    );

    let summary = store.ingest(payload.as_bytes()).unwrap();

    assert_eq!(summary.admitted, 2);
    assert_eq!(summary.decode_failures, 1);
    assert_eq!(summary.filtered, 2);

    // Scenario C: the filtered-out schema never minted a package.
    assert!(store.search("^x$").unwrap().is_empty());

    // Scenario B: search returns the full version list.
    let results = store.search("prometheus.*").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results["prometheus-operator"],
        vec!["1.2.3".to_string(), "1.3.0".to_string()]
    );
}

#[test]
fn search_all_equals_snapshot_value_for_value() {
    let store = CatalogStore::new();
    let payload = [
        bundle_line("alpha.1.0.0"),
        bundle_line("beta.2.0.0"),
        bundle_line("gamma.3.0.0"),
    ]
    .join("\n");
    store.ingest(payload.as_bytes()).unwrap();

    let everything = store.search(".*").unwrap();
    assert_eq!(everything, store.snapshot());

    let nothing = store.search("zz-no-such-package").unwrap();
    assert!(nothing.is_empty());
}

#[test]
fn append_only_law_across_reingestion() {
    let store = CatalogStore::new();
    let payload = [bundle_line("alpha.1.0.0"), bundle_line("beta.2.0.0")].join("\n");

    store.ingest(payload.as_bytes()).unwrap();
    store.ingest(payload.as_bytes()).unwrap();

    let snapshot = store.snapshot();
    assert_eq!(
        snapshot["alpha"],
        vec!["1.0.0".to_string(), "1.0.0".to_string()]
    );
    assert_eq!(store.version_count(), 4);
}

#[test]
fn invalid_pattern_reports_before_touching_the_index() {
    let store = CatalogStore::new();
    store.ingest(bundle_line("alpha.1.0.0").as_bytes()).unwrap();

    let err = store.search("*leading-star").unwrap_err();
    assert!(matches!(err, CatalogError::InvalidPattern { .. }));
    // Printable, with the offending pattern in the message.
    assert!(err.to_string().contains("*leading-star"));
}

#[test]
fn ingests_from_a_catalog_file_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("operatorhubio.json");

    let mut file = File::create(&path).unwrap();
    writeln!(file, "{}", bundle_line("argocd-operator.0.8.0")).unwrap();
    writeln!(file, "{}", bundle_line("argocd-operator.0.9.1")).unwrap();
    writeln!(file, r#"{{"schema":"olm.package","name":"argocd-operator"}}"#).unwrap();
    drop(file);

    let store = CatalogStore::new();
    let reader = BufReader::new(File::open(&path).unwrap());
    let summary = store.ingest(reader).unwrap();

    assert_eq!(summary.admitted, 2);
    assert_eq!(summary.filtered, 1);

    let results = store.search("argocd").unwrap();
    assert_eq!(
        results["argocd-operator"],
        vec!["0.8.0".to_string(), "0.9.1".to_string()]
    );
}

#[test]
fn search_results_serialize_as_a_json_object_of_arrays() {
    let store = CatalogStore::new();
    store
        .ingest(bundle_line("prometheus-operator.1.2.3").as_bytes())
        .unwrap();

    let results = store.search("prometheus.*").unwrap();
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"prometheus-operator": ["1.2.3"]})
    );
}
