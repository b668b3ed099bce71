//! Crash-safe file writes.
//!
//! Writes go to a hidden temp file in the target directory, are fsynced and
//! then renamed over the target. Read-modify-write cycles additionally hold
//! an exclusive `fs2` lock on a sibling `.lock` file.

use crate::paths::ensure_dir;
use alumni_core::AlumniError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<StorageError> for AlumniError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TomlDe(e) => AlumniError::from(e),
            StorageError::TomlSer(e) => AlumniError::from(e),
            StorageError::Json(e) => AlumniError::from(e),
            StorageError::Io(e) => AlumniError::from(e),
            other => AlumniError::io(other.to_string()),
        }
    }
}

/// On-disk encoding of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    /// `.json` files are JSON; everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        }
    }

    fn encode<T: Serialize>(self, data: &T) -> Result<String, StorageError> {
        Ok(match self {
            FileFormat::Toml => toml::to_string_pretty(data)?,
            FileFormat::Json => serde_json::to_string_pretty(data)?,
        })
    }

    fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T, StorageError> {
        Ok(match self {
            FileFormat::Toml => toml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
        })
    }
}

/// A typed document stored in a single file.
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<T>,
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Format is taken from the file extension.
    pub fn new(path: PathBuf) -> Self {
        let format = FileFormat::from_path(&path);
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Returns
    ///
    /// - `Ok(Some(T))`: Loaded and decoded
    /// - `Ok(None)`: File missing or blank
    /// - `Err`: Unreadable or malformed
    pub fn load(&self) -> Result<Option<T>, StorageError> {
        match read_text(&self.path)? {
            Some(content) if !content.trim().is_empty() => {
                Ok(Some(self.format.decode(&content)?))
            }
            _ => Ok(None),
        }
    }

    pub fn save(&self, data: &T) -> Result<(), StorageError> {
        let encoded = self.format.encode(data)?;
        write_atomic(&self.path, encoded.as_bytes())
    }

    /// Loads (or starts from `default_value`), applies `f` and saves, all
    /// under an exclusive lock. Nothing is written if `f` fails.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut T) -> Result<(), StorageError>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)?;
        Ok(data)
    }
}

/// Reads a whole file; a missing file is `Ok(None)`.
pub fn read_text(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replaces `path` with `bytes` via temp file, fsync and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let parent = path
        .parent()
        .ok_or_else(|| StorageError::InvalidPath(format!("{} has no parent", path.display())))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| StorageError::InvalidPath(format!("{} has no file name", path.display())))?;
    ensure_dir(parent)?;

    let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));
    let mut tmp_file = File::create(&tmp_path)?;
    tmp_file.write_all(bytes)?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Exclusive lock on `<path>.lock`, released and removed on drop.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            ensure_dir(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| StorageError::Lock(format!("{}: {}", lock_path.display(), e)))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    fn counter(count: u32) -> Counter {
        Counter {
            name: "angkatan".to_string(),
            count,
        }
    }

    #[test]
    fn missing_and_blank_files_load_as_none() {
        let dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::new(dir.path().join("counter.toml"));
        assert!(file.load().unwrap().is_none());

        fs::write(file.path(), "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn saves_toml_and_json_by_extension() {
        let dir = TempDir::new().unwrap();
        let toml_file = AtomicFile::<Counter>::new(dir.path().join("nested/counter.toml"));
        let json_file = AtomicFile::<Counter>::new(dir.path().join("counter.json"));

        toml_file.save(&counter(3)).unwrap();
        json_file.save(&counter(4)).unwrap();

        let raw = fs::read_to_string(toml_file.path()).unwrap();
        assert!(raw.contains("count = 3"));
        let raw = fs::read_to_string(json_file.path()).unwrap();
        assert!(raw.contains("\"count\": 4"));
        assert_eq!(json_file.load().unwrap(), Some(counter(4)));
    }

    #[test]
    fn update_starts_from_default_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counter.toml");
        let file = AtomicFile::<Counter>::new(path.clone());

        file.update(counter(0), |c| {
            c.count += 10;
            Ok(())
        })
        .unwrap();
        let updated = file
            .update(counter(0), |c| {
                c.count += 5;
                Ok(())
            })
            .unwrap();

        assert_eq!(updated.count, 15);
        assert_eq!(file.load().unwrap(), Some(counter(15)));
        assert!(!dir.path().join(".counter.toml.tmp").exists());
        assert!(!dir.path().join("counter.lock").exists());
    }

    #[test]
    fn failed_update_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::new(dir.path().join("counter.toml"));
        file.save(&counter(1)).unwrap();

        let result = file.update(counter(0), |c| {
            c.count = 99;
            Err(StorageError::Lock("rejected".into()))
        });
        assert!(result.is_err());
        assert_eq!(file.load().unwrap(), Some(counter(1)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::new(dir.path().join("counter.toml"));
        fs::write(file.path(), "count = [").unwrap();

        let err = AlumniError::from(file.load().unwrap_err());
        assert!(matches!(err, AlumniError::Serialization { .. }));
    }
}
