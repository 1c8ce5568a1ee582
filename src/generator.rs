//! Random license key production.
//!
//! Keys are formatted as `PREFIX + 2-digit-year + "-" + N` random characters
//! drawn from a 36-character alphabet (A–Z, 0–9), e.g. `VIP25-K3QX9A7B`.
//! Candidates colliding with an existing key are redrawn; the collision
//! space (36^8 by default) makes retries astronomically rare, but the loop
//! is a correctness requirement, not an optimization.

use crate::error::GateResult;
use crate::store::{KeyStore, LicenseMap, LicenseRecord};
use chrono::Datelike;
use rand::Rng;

/// Alphabet keys are drawn from.
pub const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Produces unique, unused license key strings.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    prefix: String,
    suffix_len: usize,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new("VIP", 8)
    }
}

impl KeyGenerator {
    /// Creates a generator with a custom prefix and random-suffix length.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix_len: usize) -> Self {
        Self {
            prefix: prefix.into(),
            suffix_len,
        }
    }

    /// Generates one key guaranteed absent from `existing`.
    #[must_use]
    pub fn generate(&self, existing: &LicenseMap) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = self.draw(&mut rng);
            if !existing.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Generates `count` keys and persists them to the store as unused
    /// records in a single save.
    ///
    /// Generation runs against a single evolving view of the store: each new
    /// key joins the existing set before the next draw, so a batch never
    /// contains internal duplicates. Range enforcement on `count` belongs to
    /// the admin boundary, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn generate_batch(&self, count: usize, store: &KeyStore) -> GateResult<Vec<String>> {
        store.update(|keys| {
            let mut new_keys = Vec::with_capacity(count);
            for _ in 0..count {
                let key = self.generate(keys);
                keys.insert(key.clone(), LicenseRecord::new());
                new_keys.push(key);
            }
            new_keys
        })
    }

    fn draw(&self, rng: &mut impl Rng) -> String {
        let year = chrono::Utc::now().year() % 100;
        let suffix: String = (0..self.suffix_len)
            .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
            .collect();
        format!("{}{year:02}-{suffix}", self.prefix)
    }
}
