//! Administrative operations: listing, deletion, batch generation.

use crate::error::{GateError, GateResult};
use crate::generator::KeyGenerator;
use crate::store::{KeyStore, LicenseRecord};

/// Smallest accepted batch generation count.
pub const GENERATE_MIN: usize = 1;

/// Largest accepted batch generation count.
pub const GENERATE_MAX: usize = 100;

/// Administrative interface over a key store.
pub struct AdminFacade<'a> {
    store: &'a KeyStore,
    generator: KeyGenerator,
}

impl<'a> AdminFacade<'a> {
    /// Creates an admin facade with the default key generator.
    #[must_use]
    pub fn new(store: &'a KeyStore) -> Self {
        Self::with_generator(store, KeyGenerator::default())
    }

    /// Creates an admin facade with a custom key generator.
    #[must_use]
    pub fn with_generator(store: &'a KeyStore, generator: KeyGenerator) -> Self {
        Self { store, generator }
    }

    /// Returns a snapshot of all keys and their records.
    ///
    /// Order is stable within one load.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_all(&self) -> GateResult<Vec<(String, LicenseRecord)>> {
        Ok(self.store.load()?.into_iter().collect())
    }

    /// Deletes a key if present and persists. Idempotent: deleting an
    /// absent key is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn delete_key(&self, key: &str) -> GateResult<()> {
        self.store.update(|keys| {
            keys.remove(key);
        })
    }

    /// Generates `count` new keys, persists them, and returns them for
    /// display.
    ///
    /// Counts outside `GENERATE_MIN..=GENERATE_MAX` are rejected before any
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::CountOutOfRange`] for a rejected count, or a
    /// storage error if the store cannot be read or written.
    pub fn generate_keys(&self, count: usize) -> GateResult<Vec<String>> {
        if !(GENERATE_MIN..=GENERATE_MAX).contains(&count) {
            return Err(GateError::CountOutOfRange {
                got: count,
                min: GENERATE_MIN,
                max: GENERATE_MAX,
            });
        }
        self.generator.generate_batch(count, self.store)
    }
}
