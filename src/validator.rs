//! Key submission state machine.
//!
//! Each submission resolves to exactly one [`Validation`] outcome. Side
//! effects happen only on the granting paths: `Granted` marks the key used
//! and records a time-limited session, `DeveloperGranted` records an
//! indefinite session without touching the key store. `InvalidKey` and
//! `AlreadyUsed` are pure reads.

use crate::error::GateResult;
use crate::now_millis;
use crate::session::SessionTracker;
use crate::store::KeyStore;

/// The developer override key. Never stored, never marked used, always
/// grants indefinite access. By design there is no revocation path for it
/// beyond clearing the session.
pub const DEVELOPER_KEY: &str = "DEVELOPER_UNLIMITED_ACCESS_2024";

/// How long a non-developer session stays valid after grant (24 hours).
pub const VALIDITY_PERIOD_MS: i64 = 24 * 60 * 60 * 1000;

/// The outcome of one key submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// The key was valid and unused; it is now consumed and a session
    /// recorded.
    Granted {
        /// When the granted session expires (milliseconds since Unix epoch).
        expire_time: i64,
    },
    /// The developer key was submitted; an indefinite session is recorded.
    DeveloperGranted,
    /// The key is not present in the store. Indistinguishable from a
    /// deleted key — there are no tombstones.
    InvalidKey,
    /// The key exists but was already consumed.
    AlreadyUsed,
}

impl Validation {
    /// Returns true if this outcome grants access.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. } | Self::DeveloperGranted)
    }

    /// Returns the user-facing message for this outcome.
    ///
    /// Invalid and already-used keys get distinct messages; clarity is
    /// preferred over hiding whether a key ever existed.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Granted { .. } => "License key accepted!",
            Self::DeveloperGranted => "Developer verified!",
            Self::InvalidKey => "Invalid license key, please try again.",
            Self::AlreadyUsed => "This license key has already been used, please use a new one.",
        }
    }
}

/// Decides whether a submitted key grants access.
pub struct Validator<'a> {
    keys: &'a KeyStore,
    sessions: &'a SessionTracker,
}

impl<'a> Validator<'a> {
    /// Creates a validator over the given stores.
    #[must_use]
    pub fn new(keys: &'a KeyStore, sessions: &'a SessionTracker) -> Self {
        Self { keys, sessions }
    }

    /// Validates a raw submitted string and applies the outcome's side
    /// effects.
    ///
    /// The input is trimmed of surrounding whitespace. The mark-used
    /// read-modify-write runs in a single [`KeyStore::update`] critical
    /// section, so no two submissions can consume the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if a store cannot be read or written.
    pub fn submit(&self, raw: &str) -> GateResult<Validation> {
        let key = raw.trim();

        if key == DEVELOPER_KEY {
            self.sessions.grant_developer_session(key)?;
            return Ok(Validation::DeveloperGranted);
        }

        let outcome = self.keys.update(|keys| match keys.get_mut(key) {
            None => Validation::InvalidKey,
            Some(record) if record.used => Validation::AlreadyUsed,
            Some(record) => {
                record.used = true;
                Validation::Granted {
                    expire_time: now_millis() + VALIDITY_PERIOD_MS,
                }
            }
        })?;

        if let Validation::Granted { expire_time } = outcome {
            self.sessions.grant_session(key, expire_time)?;
        }

        Ok(outcome)
    }
}
