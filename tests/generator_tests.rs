mod common;

use common::{assert_default_key_pattern, empty_key_store};
use keygate::{KeyGenerator, LicenseMap, KEY_ALPHABET};
use std::collections::BTreeSet;

// ── Key format ───────────────────────────────────────────────────

#[test]
fn generated_key_matches_pattern() {
    let gen = KeyGenerator::default();
    let key = gen.generate(&LicenseMap::new());
    assert_default_key_pattern(&key);
}

#[test]
fn generated_key_embeds_current_year() {
    use chrono::Datelike;
    let gen = KeyGenerator::default();
    let key = gen.generate(&LicenseMap::new());
    let expected = format!("VIP{:02}-", chrono::Utc::now().year() % 100);
    assert!(key.starts_with(&expected));
}

#[test]
fn custom_prefix_and_length() {
    let gen = KeyGenerator::new("DEMO", 4);
    let key = gen.generate(&LicenseMap::new());
    assert!(key.starts_with("DEMO"));
    // DEMO + yy + '-' + 4
    assert_eq!(key.len(), 4 + 2 + 1 + 4);
}

#[test]
fn alphabet_is_uppercase_alphanumeric() {
    assert_eq!(KEY_ALPHABET.len(), 36);
    for &b in KEY_ALPHABET {
        let c = b as char;
        assert!(c.is_ascii_uppercase() || c.is_ascii_digit());
    }
}

// ── Uniqueness ───────────────────────────────────────────────────

#[test]
fn batch_has_no_internal_duplicates() {
    let (_dir, store) = empty_key_store();
    let gen = KeyGenerator::default();
    let keys = gen.generate_batch(50, &store).unwrap();

    let distinct: BTreeSet<_> = keys.iter().collect();
    assert_eq!(distinct.len(), 50);
}

#[test]
fn tiny_keyspace_forces_retry_until_unique() {
    // One random character from a 36-char alphabet: a 40-key batch is
    // impossible, but 10 distinct keys must come out of retries alone.
    let (_dir, store) = empty_key_store();
    let gen = KeyGenerator::new("T", 1);
    let keys = gen.generate_batch(10, &store).unwrap();

    let distinct: BTreeSet<_> = keys.iter().collect();
    assert_eq!(distinct.len(), 10);
}

// ── Batch persistence ────────────────────────────────────────────

#[test]
fn batch_keys_absent_before_present_unused_after() {
    let (_dir, store) = empty_key_store();
    let before = store.load().unwrap();

    let gen = KeyGenerator::default();
    let new_keys = gen.generate_batch(3, &store).unwrap();

    let after = store.load().unwrap();
    for key in &new_keys {
        assert!(!before.contains_key(key));
        let record = &after[key];
        assert!(!record.used);
        assert!(record.created > 0);
    }
    assert_eq!(after.len(), 3);
}

#[test]
fn batch_on_fresh_store_adds_to_seeded_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = keygate::KeyStore::new(dir.path().join("license_keys.json"));

    let gen = KeyGenerator::default();
    gen.generate_batch(2, &store).unwrap();

    // 5 seeded defaults + 2 generated.
    assert_eq!(store.load().unwrap().len(), 7);
}

#[test]
fn batch_is_persisted_in_one_save() {
    let (_dir, store) = empty_key_store();
    let gen = KeyGenerator::default();
    let new_keys = gen.generate_batch(5, &store).unwrap();

    // A separate handle over the same file sees the whole batch.
    let other = keygate::KeyStore::new(store.path());
    let loaded = other.load().unwrap();
    for key in &new_keys {
        assert!(loaded.contains_key(key));
    }
}
