use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::GroupdocResult;
use crate::types::{Dataset, Table};

/// Serialized dataset snapshot (table plus grouping column); the commit point of a save
pub const DATASET_FILE: &str = "dataset.yaml";
/// Plain-text grouping column name
pub const GROUPING_COLUMN_FILE: &str = "grouping_column.txt";

/// Save/load of the current dataset snapshot
pub trait SnapshotPersistence: Send + Sync {
    fn save(&self, dataset: &Dataset) -> GroupdocResult<()>;
    /// `None` when no snapshot has been written
    fn load(&self) -> GroupdocResult<Option<Dataset>>;
    fn clear(&self) -> GroupdocResult<()>;
}

/// Two sibling files in a directory: the dataset as YAML and the grouping column as text
#[derive(Debug, Clone)]
pub struct DiskSnapshot {
    dir: PathBuf,
}

impl DiskSnapshot {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn dataset_path(&self) -> PathBuf {
        self.dir.join(DATASET_FILE)
    }

    fn column_path(&self) -> PathBuf {
        self.dir.join(GROUPING_COLUMN_FILE)
    }
}

/// Write through a temp file so readers never see a half-written snapshot
fn write_atomic(path: &Path, content: &str) -> GroupdocResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl SnapshotPersistence for DiskSnapshot {
    /// The column file goes first and `dataset.yaml` last, so an interrupted
    /// save leaves the previous `dataset.yaml` as the consistent snapshot.
    fn save(&self, dataset: &Dataset) -> GroupdocResult<()> {
        fs::create_dir_all(&self.dir)?;
        let yaml = serde_yaml::to_string(dataset)?;
        write_atomic(&self.column_path(), dataset.grouping_column())?;
        write_atomic(&self.dataset_path(), &yaml)?;
        Ok(())
    }

    fn load(&self) -> GroupdocResult<Option<Dataset>> {
        let dataset_path = self.dataset_path();
        let column_path = self.column_path();
        if !dataset_path.exists() || !column_path.exists() {
            return Ok(None);
        }
        let raw: Dataset = serde_yaml::from_str(&fs::read_to_string(dataset_path)?)?;
        // re-check column lengths, names and the grouping column
        let table = Table::from_columns(raw.table().columns().to_vec())?;
        let dataset = Dataset::new(table, raw.grouping_column())?;

        let column = fs::read_to_string(column_path)?;
        if column.trim() != dataset.grouping_column() {
            warn!(
                column_file = column.trim(),
                snapshot = dataset.grouping_column(),
                "grouping column file disagrees with snapshot, using snapshot"
            );
        }
        Ok(Some(dataset))
    }

    fn clear(&self) -> GroupdocResult<()> {
        for path in [self.dataset_path(), self.column_path()] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
