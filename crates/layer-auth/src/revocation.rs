//! Revoked token subjects.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Default lifetime of a revocation entry (matches the default token TTL).
pub const DEFAULT_REVOCATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Storage for revoked token subjects, injected into [`crate::AuthGuard`].
///
/// Implementations must be safe to share between request handlers.
pub trait RevocationStore: Send + Sync + fmt::Debug {
    /// Revoke every token issued to `subject`.
    fn revoke(&self, subject: &str);

    /// Whether tokens for `subject` are currently revoked.
    fn is_revoked(&self, subject: &str) -> bool;
}

/// Process-local revocation store whose entries expire after a TTL.
///
/// Entries are not persisted; a restart forgets every revocation. The TTL
/// should be at least the token lifetime so a revoked token cannot outlive
/// its entry.
pub struct InMemoryRevocationStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, Instant>>,
}

impl fmt::Debug for InMemoryRevocationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRevocationStore")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}

impl Default for InMemoryRevocationStore {
    fn default() -> Self {
        Self::new(DEFAULT_REVOCATION_TTL)
    }
}

impl InMemoryRevocationStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries, including ones that expired but were not yet purged.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, revoked_at| revoked_at.elapsed() < self.ttl);
        before - entries.len()
    }
}

impl RevocationStore for InMemoryRevocationStore {
    fn revoke(&self, subject: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(subject.to_string(), Instant::now());
        tracing::info!(subject, "revoked token subject");
    }

    fn is_revoked(&self, subject: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = match entries.get(subject) {
            None => return false,
            Some(revoked_at) => revoked_at.elapsed() >= self.ttl,
        };
        if expired {
            entries.remove(subject);
            tracing::debug!(subject, "revocation entry expired");
        }
        !expired
    }
}
