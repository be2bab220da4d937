use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{poisoned, DatasetHandle, DatasetStore, SessionId};
use crate::error::{GroupdocError, GroupdocResult};
use crate::types::Dataset;

struct Entry {
    dataset: Arc<Dataset>,
    created: Instant,
}

/// One dataset per upload session, bounded by capacity and time-to-live
pub struct SessionStore {
    entries: RwLock<HashMap<SessionId, Entry>>,
    capacity: usize,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register with an explicit clock reading
    pub fn register_at(&self, dataset: Dataset, now: Instant) -> GroupdocResult<SessionId> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let expired = Self::sweep(&mut entries, self.ttl, now);
        if expired > 0 {
            debug!(expired, "evicted expired sessions");
        }

        while entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.created)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    entries.remove(&id);
                    debug!(session = %id, "evicted oldest session");
                }
                None => break,
            }
        }

        let id = SessionId::new_random();
        entries.insert(
            id,
            Entry {
                dataset: Arc::new(dataset),
                created: now,
            },
        );
        Ok(id)
    }

    /// Look up with an explicit clock reading; expired entries are invisible
    pub fn get_at(&self, id: &SessionId, now: Instant) -> GroupdocResult<Arc<Dataset>> {
        let entries = self.entries.read().map_err(poisoned)?;
        match entries.get(id) {
            Some(entry) if !is_expired(entry, self.ttl, now) => Ok(Arc::clone(&entry.dataset)),
            _ => Err(GroupdocError::SessionNotFound(id.to_string())),
        }
    }

    /// Remove every session older than the TTL; returns how many were removed
    pub fn evict_expired(&self, now: Instant) -> GroupdocResult<usize> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(Self::sweep(&mut entries, self.ttl, now))
    }

    /// Drop one session
    pub fn remove(&self, id: &SessionId) -> GroupdocResult<bool> {
        Ok(self.entries.write().map_err(poisoned)?.remove(id).is_some())
    }

    fn sweep(entries: &mut HashMap<SessionId, Entry>, ttl: Duration, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, e| !is_expired(e, ttl, now));
        before - entries.len()
    }
}

fn is_expired(entry: &Entry, ttl: Duration, now: Instant) -> bool {
    now.saturating_duration_since(entry.created) > ttl
}

impl DatasetStore for SessionStore {
    fn register(&self, dataset: Dataset) -> GroupdocResult<DatasetHandle> {
        self.register_at(dataset, Instant::now())
            .map(DatasetHandle::Session)
    }

    fn get(&self, handle: &DatasetHandle) -> GroupdocResult<Arc<Dataset>> {
        match handle {
            DatasetHandle::Session(id) => self.get_at(id, Instant::now()),
            DatasetHandle::Global => Err(GroupdocError::SessionNotFound(
                "no session id given".to_string(),
            )),
        }
    }
}
