//! Single-use license key gate with time-limited session tracking.
//!
//! This crate handles:
//! - License key generation (`VIP` + 2-digit year + random suffix)
//! - Single-use validation with a developer override key
//! - Time-limited session tracking (24 hour validity)
//! - Administrative operations (batch generation, listing, deletion)
//!
//! # Design Principles
//!
//! - **Explicit stores**: `KeyStore` and `SessionTracker` are handles passed
//!   into `Validator` and `AdminFacade` — no process-wide singletons, so each
//!   test constructs a fresh store.
//! - **Outcomes, not rendering**: the core returns tagged outcome enums
//!   ([`Validation`], [`SessionState`]); all presentation lives outside.
//! - **Recover, don't surface**: malformed persisted data falls back to
//!   defaults (or an absent session) instead of erroring.
//! - **Not a security boundary**: the stores are trusted local records; the
//!   gate is a soft access-control mechanism, not authentication.
//!
//! # Persisted State
//!
//! Two independent JSON records:
//! - the key store: `{ "<key>": { "created": <epoch-ms>, "used": <bool> } }`
//! - the session: `{ "licenseKey": ..., "expireTime": <epoch-ms>, "isDeveloper": <bool> }`

mod admin;
mod error;
mod generator;
mod session;
mod store;
mod validator;

pub use admin::{AdminFacade, GENERATE_MAX, GENERATE_MIN};
pub use error::{GateError, GateResult};
pub use generator::{KeyGenerator, KEY_ALPHABET};
pub use session::{Countdown, SessionRecord, SessionState, SessionTracker};
pub use store::{KeyStore, LicenseMap, LicenseRecord, DEFAULT_KEYS};
pub use validator::{Validation, Validator, DEVELOPER_KEY, VALIDITY_PERIOD_MS};

/// Returns the current wall-clock time as milliseconds since the Unix epoch.
#[must_use]
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
