use lottoforge_core::config::EngineConfig;
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.batch_rows, 50);
    assert_eq!(cfg.phase2_runs, 100);
    assert_eq!(cfg.dedup_retries, 10);
    assert!(!cfg.sequential);
}

#[test]
fn test_load_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.json");
    std::fs::write(&path, r#"{ "phase2_runs": 25, "sequential": true }"#).unwrap();

    let cfg = EngineConfig::load_from_file(&path).unwrap();
    assert_eq!(cfg.phase2_runs, 25);
    assert!(cfg.sequential);
    assert_eq!(cfg.history_window, 20);
}

#[test]
fn test_load_errors_are_described() {
    let dir = tempdir().unwrap();
    let missing = EngineConfig::load_from_file(dir.path().join("nope.json")).unwrap_err();
    assert!(missing.contains("Failed to read"));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let err = EngineConfig::load_from_file(&bad).unwrap_err();
    assert!(err.contains("Failed to parse"));
}
