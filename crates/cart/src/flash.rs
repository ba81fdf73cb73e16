//! One-shot user notifications, kept per session until the next page shows them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use cartkit_core::{DomainError, DomainResult, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }
}

pub trait FlashStore: Send + Sync {
    fn push(&self, session: SessionId, flash: Flash) -> DomainResult<()>;

    /// Remove and return everything queued for `session`, oldest first.
    fn drain(&self, session: &SessionId) -> DomainResult<Vec<Flash>>;

    /// Drop queues last pushed to before `cutoff`; returns how many went.
    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> DomainResult<usize>;
}

impl<F> FlashStore for Arc<F>
where
    F: FlashStore + ?Sized,
{
    fn push(&self, session: SessionId, flash: Flash) -> DomainResult<()> {
        (**self).push(session, flash)
    }

    fn drain(&self, session: &SessionId) -> DomainResult<Vec<Flash>> {
        (**self).drain(session)
    }

    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        (**self).purge_older_than(cutoff)
    }
}

#[derive(Debug)]
struct FlashQueue {
    pushed_at: DateTime<Utc>,
    flashes: Vec<Flash>,
}

/// In-memory flash queues.
///
/// With a max age set, every push also drops queues of sessions that have not been
/// pushed to within that age (sessions that never rendered another page).
#[derive(Debug, Default)]
pub struct InMemoryFlashStore {
    inner: Mutex<HashMap<SessionId, FlashQueue>>,
    max_age: Option<Duration>,
}

impl InMemoryFlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            inner: Mutex::default(),
            max_age: Some(max_age),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> DomainResult<std::sync::MutexGuard<'_, HashMap<SessionId, FlashQueue>>> {
        self.inner
            .lock()
            .map_err(|_| DomainError::storage("flash store lock poisoned"))
    }
}

fn retain_since(map: &mut HashMap<SessionId, FlashQueue>, cutoff: DateTime<Utc>) -> usize {
    let before = map.len();
    map.retain(|_, queue| queue.pushed_at >= cutoff);
    before - map.len()
}

impl FlashStore for InMemoryFlashStore {
    fn push(&self, session: SessionId, flash: Flash) -> DomainResult<()> {
        let now = Utc::now();
        let mut map = self.lock()?;
        if let Some(max_age) = self.max_age {
            retain_since(&mut map, now - max_age);
        }

        let queue = map.entry(session).or_insert_with(|| FlashQueue {
            pushed_at: now,
            flashes: Vec::new(),
        });
        queue.pushed_at = now;
        queue.flashes.push(flash);
        Ok(())
    }

    fn drain(&self, session: &SessionId) -> DomainResult<Vec<Flash>> {
        let mut map = self.lock()?;
        Ok(map.remove(session).map(|q| q.flashes).unwrap_or_default())
    }

    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        let mut map = self.lock()?;
        Ok(retain_since(&mut map, cutoff))
    }
}
