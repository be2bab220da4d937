use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use super::{poisoned, DatasetHandle, DatasetStore, SnapshotPersistence};
use crate::error::{GroupdocError, GroupdocResult};
use crate::types::Dataset;

/// Single active dataset; each upload replaces the previous one
pub struct GlobalSlotStore {
    slot: RwLock<Option<Arc<Dataset>>>,
    persistence: Option<Box<dyn SnapshotPersistence>>,
}

impl GlobalSlotStore {
    /// In-memory only
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            persistence: None,
        }
    }

    /// Saves every upload and reloads the snapshot when memory is empty
    pub fn with_persistence(persistence: Box<dyn SnapshotPersistence>) -> Self {
        Self {
            slot: RwLock::new(None),
            persistence: Some(persistence),
        }
    }

    /// Drop the current dataset (and its snapshot)
    pub fn clear(&self) -> GroupdocResult<()> {
        let mut slot = self.slot.write().map_err(poisoned)?;
        if let Some(persistence) = &self.persistence {
            persistence.clear()?;
        }
        *slot = None;
        Ok(())
    }

    fn recover(&self) -> GroupdocResult<Option<Arc<Dataset>>> {
        let Some(persistence) = &self.persistence else {
            return Ok(None);
        };
        // snapshot reads and writes both happen under the write lock
        let mut slot = self.slot.write().map_err(poisoned)?;
        if let Some(current) = slot.as_ref() {
            return Ok(Some(Arc::clone(current)));
        }
        let loaded = match persistence.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "failed to load dataset snapshot");
                return Err(e);
            }
        };
        let Some(dataset) = loaded else {
            return Ok(None);
        };

        let dataset = Arc::new(dataset);
        *slot = Some(Arc::clone(&dataset));
        info!(
            rows = dataset.table().row_count(),
            grouping_column = dataset.grouping_column(),
            "recovered dataset from snapshot"
        );
        Ok(Some(dataset))
    }
}

impl Default for GlobalSlotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore for GlobalSlotStore {
    /// Snapshot and memory are replaced together: the slot stays locked until both are done
    fn register(&self, dataset: Dataset) -> GroupdocResult<DatasetHandle> {
        let mut slot = self.slot.write().map_err(poisoned)?;
        if let Some(persistence) = &self.persistence {
            persistence.save(&dataset)?;
        }
        *slot = Some(Arc::new(dataset));
        Ok(DatasetHandle::Global)
    }

    /// Session ids are ignored: there is only one slot
    fn get(&self, _handle: &DatasetHandle) -> GroupdocResult<Arc<Dataset>> {
        if let Some(current) = self.slot.read().map_err(poisoned)?.as_ref() {
            return Ok(Arc::clone(current));
        }
        self.recover()?.ok_or(GroupdocError::NoDatasetLoaded)
    }
}
