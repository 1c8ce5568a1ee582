//! Session tracking for granted access.
//!
//! A successful validation (or developer override) is recorded as exactly
//! one persisted session record. Access checks project that record into a
//! [`SessionState`]; an expired record is cleared as a side effect of the
//! check that finds it, so stale sessions are never retained.
//!
//! The expected countdown refresh pattern is to re-query
//! [`SessionTracker::check_access`] every second — each query is independent
//! and idempotent apart from the expiry-clears-record side effect.

use crate::error::{GateError, GateResult};
use crate::now_millis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// The persisted outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// The key that granted access.
    pub license_key: String,
    /// Expiry time (milliseconds since Unix epoch). Absent for developer
    /// sessions, which never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
    /// Whether this session came from the developer override key.
    #[serde(default)]
    pub is_developer: bool,
}

/// The current access state derived from the persisted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session recorded; the gate should prompt for a key.
    NoSession,
    /// Developer session; access never expires.
    DeveloperAccess,
    /// Active session with time remaining.
    ActiveAccess {
        /// Milliseconds until expiry.
        remaining_ms: i64,
    },
    /// The session expired; its record has been cleared.
    Expired,
}

impl SessionState {
    /// Returns true if this state grants entry to the gated page.
    #[must_use]
    pub fn grants_entry(&self) -> bool {
        matches!(self, Self::DeveloperAccess | Self::ActiveAccess { .. })
    }
}

/// Records validation outcomes and answers access checks.
pub struct SessionTracker {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SessionTracker {
    /// Creates a tracker backed by the given session file path.
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

    /// Records a time-limited session for `key`, replacing any prior session.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn grant_session(&self, key: &str, expire_time: i64) -> GateResult<()> {
        let _guard = self.lock.lock().unwrap();
        self.write(&SessionRecord {
            license_key: key.to_string(),
            expire_time: Some(expire_time),
            is_developer: false,
        })
    }

    /// Records an indefinite developer session, replacing any prior session.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn grant_developer_session(&self, key: &str) -> GateResult<()> {
        let _guard = self.lock.lock().unwrap();
        self.write(&SessionRecord {
            license_key: key.to_string(),
            expire_time: None,
            is_developer: true,
        })
    }

    /// Determines the current access state from the persisted record.
    ///
    /// An expired record is cleared before returning [`SessionState::Expired`];
    /// a malformed record is cleared and treated as no session.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or cleared.
    pub fn check_access(&self) -> GateResult<SessionState> {
        self.check_access_at(now_millis())
    }

    /// [`Self::check_access`] with an explicit clock, for expiry boundary
    /// testing. A session is active iff `now_ms` is strictly before its
    /// expiry.
    pub fn check_access_at(&self, now_ms: i64) -> GateResult<SessionState> {
        let _guard = self.lock.lock().unwrap();

        let Some(record) = self.read()? else {
            return Ok(SessionState::NoSession);
        };

        if record.is_developer {
            return Ok(SessionState::DeveloperAccess);
        }

        let Some(expire_time) = record.expire_time else {
            // Non-developer record without an expiry is malformed.
            warn!("session record missing expiry, clearing");
            self.remove()?;
            return Ok(SessionState::NoSession);
        };

        if now_ms < expire_time {
            Ok(SessionState::ActiveAccess {
                remaining_ms: expire_time - now_ms,
            })
        } else {
            self.remove()?;
            Ok(SessionState::Expired)
        }
    }

    /// Returns a snapshot of the persisted record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read.
    pub fn current(&self) -> GateResult<Option<SessionRecord>> {
        let _guard = self.lock.lock().unwrap();
        self.read()
    }

    /// Clears the persisted session. No-op if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    pub fn clear(&self) -> GateResult<()> {
        let _guard = self.lock.lock().unwrap();
        self.remove()
    }

    fn read(&self) -> GateResult<Option<SessionRecord>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(GateError::Storage(format!(
                    "failed to read session {}: {e}",
                    self.path.display()
                )))
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("malformed session record, clearing: {e}");
                self.remove()?;
                Ok(None)
            }
        }
    }

    fn write(&self, record: &SessionRecord) -> GateResult<()> {
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
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, json).map_err(|e| {
            GateError::Storage(format!(
                "failed to write session {}: {e}",
                self.path.display()
            ))
        })
    }

    fn remove(&self) -> GateResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GateError::Storage(format!(
                "failed to clear session {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// A display projection of remaining session time.
///
/// Derived from repeated [`SessionTracker::check_access`] samples; not part
/// of the state machine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    /// Whole hours remaining.
    pub hours: i64,
    /// Minutes remaining within the hour.
    pub minutes: i64,
    /// Seconds remaining within the minute.
    pub seconds: i64,
}

impl Countdown {
    /// Breaks a remaining-millisecond count into h/m/s components.
    ///
    /// Negative input is treated as zero remaining.
    #[must_use]
    pub fn from_millis(remaining_ms: i64) -> Self {
        let ms = remaining_ms.max(0);
        Self {
            hours: ms / (1000 * 60 * 60),
            minutes: (ms % (1000 * 60 * 60)) / (1000 * 60),
            seconds: (ms % (1000 * 60)) / 1000,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}
