use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub last_updated: DateTime<Utc>,
    pub sections: Vec<Section>,
}

/// Every tracked document's record, keyed by filename. Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterStore {
    pub files: Vec<DocumentRecord>,
}

impl MasterStore {
    pub fn get(&self, filename: &str) -> Option<&DocumentRecord> {
        self.files.iter().find(|r| r.filename == filename)
    }

    /// Replace the record with the same filename, or append it.
    pub fn upsert(&mut self, record: DocumentRecord) {
        match self.files.iter_mut().find(|r| r.filename == record.filename) {
            Some(slot) => *slot = record,
            None => self.files.push(record),
        }
    }

    pub fn section_count(&self) -> usize {
        self.files.iter().map(|r| r.sections.len()).sum()
    }
}

/// The master store file on disk.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted store. A missing file yields an empty store.
    pub fn load(&self) -> Result<MasterStore, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No store at {:?}, starting empty", self.path);
                return Ok(MasterStore::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let master: MasterStore =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            "Loaded {} documents ({} sections) from {:?}",
            master.files.len(),
            master.section_count(),
            self.path
        );
        Ok(master)
    }

    /// Persist the whole store, replacing prior content atomically.
    pub fn save(&self, master: &MasterStore) -> Result<(), StoreError> {
        let bytes = serialize(master)?;
        write_atomic(&self.path, &bytes)?;
        info!(
            "Saved {} documents to {:?}",
            master.files.len(),
            self.path
        );
        Ok(())
    }
}

/// Serialization shared by the master store and snapshots.
pub fn serialize(master: &MasterStore) -> Result<Vec<u8>, StoreError> {
    let mut bytes = serde_json::to_vec_pretty(master).map_err(StoreError::Serialize)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write to a sibling temp file, fsync, then rename over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let wrap = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let written = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(wrap(e));
    }

    sync_parent_dir(path).map_err(wrap)
}

fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::File::open(parent)?.sync_all()?;
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

// ── Tests ──
