use std::io::Write;
use std::path::Path;

use super::*;

fn entry(keyword: &str, technology: Technology, monitored: bool) -> CatalogEntry {
    CatalogEntry {
        keyword: keyword.to_string(),
        technology,
        monitored,
    }
}

#[test]
fn normalize_keyword_trims_and_lowercases() {
    assert_eq!(normalize_keyword("  Ultraformer  "), "ultraformer");
    assert_eq!(normalize_keyword("COOL   Sonic"), "cool sonic");
    assert_eq!(normalize_keyword("쿨페이즈"), "쿨페이즈");
}

#[test]
fn lookup_tolerates_case_and_whitespace() {
    let catalog = Catalog::from_entries(vec![
        entry("Coolphase", Technology::Rf, true),
        entry("Ulthera", Technology::Hifu, false),
    ])
    .expect("valid catalog");

    let hit = catalog.lookup("  coolPHASE ").expect("should match");
    assert_eq!(hit.keyword, "Coolphase");
    assert_eq!(hit.technology, Technology::Rf);
    assert!(hit.monitored);
    assert!(catalog.lookup("unknown-device").is_none());
}

#[test]
fn from_entries_rejects_empty_catalog() {
    let err = Catalog::from_entries(vec![]).unwrap_err();
    assert!(err.to_string().contains("at least one product"));
}

#[test]
fn from_entries_rejects_blank_keyword() {
    let err = Catalog::from_entries(vec![entry("   ", Technology::Rf, false)]).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn from_entries_rejects_duplicate_after_normalization() {
    let err = Catalog::from_entries(vec![
        entry("Shrink", Technology::Hifu, false),
        entry("  shrink ", Technology::Hifu, false),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("duplicate product keyword"));
}

#[test]
fn technology_serializes_as_upper_case() {
    assert_eq!(
        serde_json::to_string(&Technology::Rf).expect("serialize"),
        "\"RF\""
    );
    assert_eq!(
        serde_json::to_string(&Technology::Hifu).expect("serialize"),
        "\"HIFU\""
    );
    assert_eq!(Technology::Rf.to_string(), "RF");
}

#[test]
fn load_catalog_parses_yaml_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.yaml");
    let mut file = std::fs::File::create(&path).expect("create catalog file");
    writeln!(
        file,
        "products:\n  - keyword: Coolphase\n    technology: RF\n    monitored: true\n  - keyword: Ulthera\n    technology: HIFU"
    )
    .expect("write catalog");

    let catalog = load_catalog(&path).expect("catalog should load");
    assert_eq!(catalog.len(), 2);
    assert!(catalog.lookup("ulthera").is_some());
    // `monitored` defaults to false when omitted.
    assert!(!catalog.lookup("ulthera").expect("entry").monitored);
}

#[test]
fn load_catalog_missing_file_is_io_error() {
    let result = load_catalog(Path::new("/nonexistent/catalog.yaml"));
    assert!(
        matches!(result, Err(ConfigError::CatalogFileIo { .. })),
        "expected CatalogFileIo, got: {result:?}"
    );
}

#[test]
fn load_catalog_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("catalog.yaml");
    assert!(
        path.exists(),
        "catalog.yaml missing at {path:?} — required for this test"
    );
    let catalog = load_catalog(&path).expect("repo catalog should load");
    assert!(!catalog.is_empty());
    assert!(
        catalog.entries().iter().any(|e| e.monitored),
        "repo catalog should mark the monitored product line"
    );
}
