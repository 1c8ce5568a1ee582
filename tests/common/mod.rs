//! Shared test helpers for gate tests.

#![allow(dead_code)]

use keygate::{KeyStore, LicenseMap, SessionTracker};
use tempfile::TempDir;

/// Fresh key store backed by a temp directory (file not yet created).
pub fn temp_key_store() -> (TempDir, KeyStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = KeyStore::new(dir.path().join("license_keys.json"));
    (dir, store)
}

/// Key store whose persisted file is a well-formed empty map, so the
/// default seed does not apply.
pub fn empty_key_store() -> (TempDir, KeyStore) {
    let (dir, store) = temp_key_store();
    store.save(&LicenseMap::new()).unwrap();
    (dir, store)
}

/// Fresh session tracker backed by a temp directory.
pub fn temp_session_tracker() -> (TempDir, SessionTracker) {
    let dir = tempfile::tempdir().unwrap();
    let tracker = SessionTracker::new(dir.path().join("session.json"));
    (dir, tracker)
}

/// Fresh key store + session tracker sharing one temp directory.
pub fn gate() -> (TempDir, KeyStore, SessionTracker) {
    let dir = tempfile::tempdir().unwrap();
    let store = KeyStore::new(dir.path().join("license_keys.json"));
    let tracker = SessionTracker::new(dir.path().join("session.json"));
    (dir, store, tracker)
}

/// Asserts `key` matches `VIP\d{2}-[A-Z0-9]{8}`.
pub fn assert_default_key_pattern(key: &str) {
    assert_eq!(key.len(), 14, "unexpected length for {key}");
    assert!(key.starts_with("VIP"), "missing prefix in {key}");
    assert!(
        key[3..5].chars().all(|c| c.is_ascii_digit()),
        "missing year digits in {key}"
    );
    assert_eq!(&key[5..6], "-", "missing separator in {key}");
    assert!(
        key[6..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        "suffix outside alphabet in {key}"
    );
}
