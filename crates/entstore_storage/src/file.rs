//! File-based key-value store for persistent storage.

use crate::error::{KvError, KvResult};
use crate::store::KvStore;
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file-based key-value store.
///
/// Each storage key maps to one file inside the store's directory, so
/// values survive process restarts. Writes go to a sibling temporary file
/// first and are moved into place with a rename, so a reader never observes
/// a half-written value.
///
/// # Keys
///
/// Keys become file names. A key must be non-empty and must not contain
/// path separators or traversal components; anything else is rejected with
/// [`KvError::InvalidKey`].
///
/// # Thread Safety
///
/// This store is thread-safe. A directory-wide lock serializes writes;
/// reads go straight to the filesystem.
///
/// # Example
///
/// ```no_run
/// use entstore_storage::{FileKv, KvStore};
/// use std::path::Path;
///
/// let kv = FileKv::open(Path::new("./data")).unwrap();
/// kv.write("todos", "{\"byId\":{}}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileKv {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKv {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: &Path) -> KvResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the directory this store reads and writes.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> KvResult<PathBuf> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains('/')
            || key.contains('\\')
        {
            return Err(KvError::invalid_key(key));
        }
        Ok(self.dir.join(key))
    }
}

impl KvStore for FileKv {
    fn read(&self, key: &str) -> KvResult<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> KvResult<()> {
        let path = self.entry_path(key)?;
        let tmp = self.dir.join(format!("{key}.tmp"));

        let _guard = self.write_lock.lock();
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
