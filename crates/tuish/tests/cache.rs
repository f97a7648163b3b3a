//! On-disk cache behavior: atomicity guarantees, tolerance of corrupt and
//! absent files, and the content-addressed filename scheme.

use tempfile::TempDir;
use tuish::cache::{CachedLicense, LicenseCache, REFRESH_INTERVAL_MS, file_name};

const NOW_MS: i64 = 1_700_000_000_000;

fn cache_in(dir: &TempDir) -> LicenseCache {
    LicenseCache::new(dir.path().to_path_buf())
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);

    cache.save("prod_a", "license-token", "fp-1", NOW_MS);
    let record = cache.load("prod_a").unwrap();

    assert_eq!(record.license_key, "license-token");
    assert_eq!(record.product_id, "prod_a");
    assert_eq!(record.machine_fingerprint, "fp-1");
    assert_eq!(record.cached_at, NOW_MS);
    assert_eq!(record.refresh_at, NOW_MS + REFRESH_INTERVAL_MS);
}

#[test]
fn save_overwrites_previous_record() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);

    cache.save("prod_a", "old-token", "fp-1", NOW_MS - 1_000);
    cache.save("prod_a", "new-token", "fp-2", NOW_MS);

    let record = cache.load("prod_a").unwrap();
    assert_eq!(record.license_key, "new-token");
    assert_eq!(record.machine_fingerprint, "fp-2");
    assert_eq!(record.cached_at, NOW_MS);

    // Exactly one record file, no leftover temp files.
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![file_name("prod_a")]);
}

#[test]
fn load_missing_returns_none_without_creating_dir() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("never-created");
    let cache = LicenseCache::new(nested.clone());

    assert_eq!(cache.load("prod_a"), None);
    assert!(!nested.exists(), "reads must not create the storage directory");
}

#[test]
fn save_creates_directory_lazily() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("deep").join("licenses");
    let cache = LicenseCache::new(nested.clone());

    assert!(!nested.exists());
    cache.save("prod_a", "token", "fp", NOW_MS);
    assert!(nested.exists());
    assert!(cache.load("prod_a").is_some());
}

#[test]
fn corrupt_records_load_as_none() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);

    cache.save("prod_a", "token", "fp", NOW_MS);
    let path = cache.file_path("prod_a");

    for garbage in ["", "{", "42", r#"{"license_key": "token"}"#] {
        std::fs::write(&path, garbage).unwrap();
        assert_eq!(cache.load("prod_a"), None, "content: {garbage:?}");
    }
}

#[test]
fn remove_is_silent_on_absence() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);

    cache.remove("prod_never_saved");

    cache.save("prod_a", "token", "fp", NOW_MS);
    cache.remove("prod_a");
    assert_eq!(cache.load("prod_a"), None);
    cache.remove("prod_a");
}

#[test]
fn clear_all_deletes_every_json_record() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);

    cache.save("prod_a", "token-a", "fp", NOW_MS);
    cache.save("prod_b", "token-b", "fp", NOW_MS);
    std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

    cache.clear_all();

    assert_eq!(cache.load("prod_a"), None);
    assert_eq!(cache.load("prod_b"), None);
    assert!(dir.path().join("notes.txt").exists(), "only *.json records are cleared");
}

#[test]
fn filenames_are_disjoint_per_product() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);

    cache.save("prod_a", "token-a", "fp", NOW_MS);
    cache.save("prod_b", "token-b", "fp", NOW_MS);

    assert_eq!(cache.load("prod_a").unwrap().license_key, "token-a");
    assert_eq!(cache.load("prod_b").unwrap().license_key, "token-b");
    assert_ne!(cache.file_path("prod_a"), cache.file_path("prod_b"));
}

#[test]
fn record_serialization_uses_the_shared_field_names() {
    let record = CachedLicense {
        license_key: "k".to_owned(),
        cached_at: 1,
        refresh_at: 2,
        product_id: "p".to_owned(),
        machine_fingerprint: "m".to_owned(),
    };
    let json = serde_json::to_value(&record).unwrap();
    for field in ["license_key", "cached_at", "refresh_at", "product_id", "machine_fingerprint"] {
        assert!(json.get(field).is_some(), "missing on-disk field {field}");
    }
}
