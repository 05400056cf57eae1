use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::StoreError;
use crate::store::{self, MasterStore, Store};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dated copies of the master store, one file per UTC calendar date.
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotWriter { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", date.format(DATE_FORMAT)))
    }

    /// Write `master` as the snapshot for `date`, replacing any earlier one that day.
    pub fn write(&self, master: &MasterStore, date: NaiveDate) -> Result<PathBuf, StoreError> {
        let path = self.path_for(date);
        store::write_atomic(&path, &store::serialize(master)?)?;
        info!("Snapshot written to {:?}", path);
        Ok(path)
    }

    pub fn load(&self, date: NaiveDate) -> Result<MasterStore, StoreError> {
        Store::new(self.path_for(date)).load()
    }

    /// Dates with a snapshot on disk, ascending. Unrelated files are ignored.
    pub fn list(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Read {
                path: self.dir.clone(),
                source,
            })?;
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if let Ok(date) = NaiveDate::parse_from_str(stem, DATE_FORMAT) {
                dates.push(date);
            }
        }
        dates.sort();
        Ok(dates)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentRecord, Section};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn master(content: &str) -> MasterStore {
        MasterStore {
            files: vec![DocumentRecord {
                filename: "ai.md".into(),
                last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
                sections: vec![Section {
                    id: "sec1".into(),
                    content: content.into(),
                }],
            }],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn named_by_date() {
        let writer = SnapshotWriter::new("/tmp/snaps");
        assert_eq!(
            writer.path_for(date(2024, 1, 1)),
            PathBuf::from("/tmp/snaps/2024-01-01.json")
        );
    }

    #[test]
    fn same_day_overwrites() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("snapshots"));
        let day = date(2024, 1, 1);

        writer.write(&master("morning"), day).unwrap();
        writer.write(&master("evening"), day).unwrap();

        assert_eq!(writer.list().unwrap(), vec![day]);
        assert_eq!(writer.load(day).unwrap(), master("evening"));
        let files = fs::read_dir(writer.dir()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn matches_store_serialization() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("snapshots"));
        let store = Store::new(dir.path().join("master.json"));
        let m = master("same");

        store.save(&m).unwrap();
        let snap = writer.write(&m, date(2024, 5, 6)).unwrap();

        assert_eq!(fs::read(store.path()).unwrap(), fs::read(snap).unwrap());
    }

    #[test]
    fn list_sorts_and_skips_unrelated() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        writer.write(&master("b"), date(2024, 2, 1)).unwrap();
        writer.write(&master("a"), date(2023, 12, 31)).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("latest.json"), "{}").unwrap();

        assert_eq!(
            writer.list().unwrap(),
            vec![date(2023, 12, 31), date(2024, 2, 1)]
        );
    }

    #[test]
    fn missing_dir_lists_nothing() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("nope"));
        assert!(writer.list().unwrap().is_empty());
    }
}
