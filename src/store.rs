//! Persistent license key records.
//!
//! The store is a single JSON file mapping key strings to their records:
//! `{ "VIP2023-0001": { "created": 1700000000000, "used": false } }`.
//!
//! On first use (file absent) the store seeds a fixed default set. Malformed
//! file contents are treated the same as an absent file — the store reseeds
//! rather than surfacing an error, which is a recovery policy for local data
//! this crate itself wrote.

use crate::error::{GateError, GateResult};
use crate::now_millis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// The default key set seeded into an empty store.
pub const DEFAULT_KEYS: [&str; 5] = [
    "VIP2023-0001",
    "VIP2023-0002",
    "VIP2023-0003",
    "VIP2023-0004",
    "VIP2023-0005",
];

/// The full key → record mapping held by a [`KeyStore`].
///
/// A `BTreeMap` keeps listing order stable within one load.
pub type LicenseMap = BTreeMap<String, LicenseRecord>;

/// A single license key's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Creation time (milliseconds since Unix epoch).
    pub created: i64,
    /// Whether the key has been consumed. Never reverts to `false`.
    pub used: bool,
}

impl LicenseRecord {
    /// Creates an unused record stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            created: now_millis(),
            used: false,
        }
    }
}

impl Default for LicenseRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle over the persisted key mapping.
///
/// All mutation goes through [`KeyStore::update`], which holds an internal
/// lock across the whole read-modify-write so the single-use invariant
/// survives concurrent callers.
pub struct KeyStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl KeyStore {
    /// Creates a store handle backed by the given file path.
    ///
    /// The file need not exist yet; the first load seeds it.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted mapping, seeding defaults if absent or malformed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read (other than not existing)
    /// or the seeded defaults cannot be written.
    pub fn load(&self) -> GateResult<LicenseMap> {
        let _guard = self.lock.lock().unwrap();
        self.read_or_seed()
    }

    /// Replaces the persisted mapping wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, keys: &LicenseMap) -> GateResult<()> {
        let _guard = self.lock.lock().unwrap();
        self.write(keys)
    }

    /// Applies a read-modify-write to the mapping in one critical section.
    ///
    /// The closure receives the current mapping; if it changes the mapping,
    /// the result is persisted before the lock is released. Closures that
    /// only read leave the file untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the load or the save fails.
    pub fn update<R>(&self, f: impl FnOnce(&mut LicenseMap) -> R) -> GateResult<R> {
        let _guard = self.lock.lock().unwrap();
        let mut keys = self.read_or_seed()?;
        let before = keys.clone();
        let out = f(&mut keys);
        if keys != before {
            self.write(&keys)?;
        }
        Ok(out)
    }

    fn read_or_seed(&self) -> GateResult<LicenseMap> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return self.seed(),
            Err(e) => {
                return Err(GateError::Storage(format!(
                    "failed to read key store {}: {e}",
                    self.path.display()
                )))
            }
        };

        match serde_json::from_str(&raw) {
            Ok(keys) => Ok(keys),
            Err(e) => {
                warn!("malformed key store, reseeding defaults: {e}");
                self.seed()
            }
        }
    }

    fn seed(&self) -> GateResult<LicenseMap> {
        let mut keys = LicenseMap::new();
        for key in DEFAULT_KEYS {
            keys.insert(key.to_string(), LicenseRecord::new());
        }
        self.write(&keys)?;
        debug!(count = keys.len(), "seeded default license keys");
        Ok(keys)
    }

    fn write(&self, keys: &LicenseMap) -> GateResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    GateError::Storage(format!(
                        "failed to create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(keys)?;
        std::fs::write(&self.path, json).map_err(|e| {
            GateError::Storage(format!(
                "failed to write key store {}: {e}",
                self.path.display()
            ))
        })
    }
}
