//! Dataset stores
//!
//! Two lifetimes behind one trait:
//! - [`GlobalSlotStore`]: one dataset at a time, last upload wins, optionally
//!   backed by a disk snapshot that survives restarts
//! - [`SessionStore`]: one dataset per upload session, bounded by capacity and TTL

mod global;
mod persist;
mod session;

pub use global::GlobalSlotStore;
pub use persist::{DiskSnapshot, SnapshotPersistence, DATASET_FILE, GROUPING_COLUMN_FILE};
pub use session::SessionStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{GroupdocError, GroupdocResult};
use crate::types::Dataset;

/// Random identifier minted per upload session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = GroupdocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(SessionId)
            .map_err(|_| GroupdocError::SessionNotFound(s.to_string()))
    }
}

/// How a caller refers to a registered dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetHandle {
    Global,
    Session(SessionId),
}

impl DatasetHandle {
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            DatasetHandle::Global => None,
            DatasetHandle::Session(id) => Some(*id),
        }
    }
}

impl fmt::Display for DatasetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetHandle::Global => f.write_str("global"),
            DatasetHandle::Session(id) => write!(f, "session {}", id),
        }
    }
}

/// Registry of uploaded datasets
pub trait DatasetStore: Send + Sync {
    /// Store a dataset and return the handle to reach it
    fn register(&self, dataset: Dataset) -> GroupdocResult<DatasetHandle>;

    /// Fetch a dataset snapshot
    fn get(&self, handle: &DatasetHandle) -> GroupdocResult<Arc<Dataset>>;

    /// Distinct group keys of a dataset
    fn groups(&self, handle: &DatasetHandle) -> GroupdocResult<Vec<String>> {
        Ok(self.get(handle)?.group_keys())
    }
}

pub(crate) fn poisoned<T>(_: T) -> GroupdocError {
    GroupdocError::StoreUnavailable("store lock poisoned".to_string())
}
