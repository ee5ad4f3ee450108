use crate::{LockError, LockRecord};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The persisted-store capability the `Locker` operates over: a single
/// file-like resource with whole-content replace semantics.
pub trait LockResource: Send + Sync {
    fn exists(&self) -> bool;

    fn read(&self) -> Result<LockRecord, LockError>;

    /// Replace the entire record. Implementations must never leave a
    /// partially written record observable.
    fn write(&self, record: &LockRecord) -> Result<(), LockError>;

    /// The identifying path of the resource, for diagnostics.
    fn path(&self) -> &Path;
}

/// A lock record stored as a JSON file on disk.
///
/// Writes go through a temp file in the same directory and an atomic
/// rename, so a crash mid-write can never leave a truncated record behind.
#[derive(Debug, Clone)]
pub struct JsonLockFile {
    path: PathBuf,
}

impl JsonLockFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LockResource for JsonLockFile {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> Result<LockRecord, LockError> {
        let content = fs::read_to_string(&self.path)?;
        let record: LockRecord = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), entries = record.len(), "read lock record");
        Ok(record)
    }

    fn write(&self, record: &LockRecord) -> Result<(), LockError> {
        let content = serde_json::to_string_pretty(record)?;
        let dir = self.path.parent().unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| LockError::Io(e.error))?;
        // Fsync the parent directory so the rename is durable on power loss.
        if let Ok(f) = fs::File::open(dir) {
            let _ = f.sync_all();
        }
        debug!(path = %self.path.display(), entries = record.len(), "wrote lock record");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LockEntry;

    fn entry(package: &str, version: &str) -> LockEntry {
        LockEntry {
            package: package.to_owned(),
            version: version.to_owned(),
        }
    }

    #[test]
    fn exists_reflects_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let lock = JsonLockFile::new(dir.path().join("libretto.lock"));
        assert!(!lock.exists());
        lock.write(&LockRecord::default()).unwrap();
        assert!(lock.exists());
    }

    #[test]
    fn write_then_read_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let lock = JsonLockFile::new(dir.path().join("libretto.lock"));
        let record = LockRecord::new(vec![entry("pkg1", "1.0.0-beta"), entry("pkg2", "0.1.10")]);
        lock.write(&record).unwrap();
        assert_eq!(lock.read().unwrap(), record);
    }

    #[test]
    fn write_replaces_the_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let lock = JsonLockFile::new(dir.path().join("libretto.lock"));
        let long = LockRecord::new(vec![
            entry("pkg1", "1.0.0"),
            entry("pkg2", "2.0.0"),
            entry("pkg3", "3.0.0"),
        ]);
        let short = LockRecord::new(vec![entry("pkg9", "9.0.0")]);

        lock.write(&long).unwrap();
        lock.write(&short).unwrap();

        assert_eq!(lock.read().unwrap(), short);
        let raw = fs::read_to_string(lock.path()).unwrap();
        assert!(!raw.contains("pkg1"), "no trailing bytes of the prior record");
    }

    #[test]
    fn reading_a_missing_file_is_an_io_error() {
        let lock = JsonLockFile::new("/nonexistent/libretto.lock");
        assert!(matches!(lock.read(), Err(LockError::Io(_))));
    }

    #[test]
    fn reading_garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libretto.lock");
        fs::write(&path, "{not json").unwrap();
        let lock = JsonLockFile::new(&path);
        assert!(matches!(lock.read(), Err(LockError::ParseJson(_))));
    }
}
