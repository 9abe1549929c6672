//! Atomic TOML file operations.
//!
//! Writes go to a sibling tmp file which is fsynced and renamed over the
//! target while an exclusive `fs2` lock is held on a `.lock` companion file.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use diq_core::DiqError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<AtomicTomlError> for DiqError {
    fn from(err: AtomicTomlError) -> Self {
        DiqError::storage(err.to_string())
    }
}

/// Typed handle to a TOML file that is only ever replaced atomically.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    private: bool,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            private: false,
            _phantom: PhantomData,
        }
    }

    /// Marks the file as private: on Unix it is written with mode 600.
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file.
    ///
    /// A missing or whitespace-only file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write_unlocked(data)
    }

    /// Deletes the file. Removing a missing file is not an error.
    pub fn remove(&self) -> Result<(), AtomicTomlError> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_unlocked(&self, data: &T) -> Result<(), AtomicTomlError> {
        let body = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        if self.private {
            restrict_permissions(&tmp_path)?;
        }
        tmp_file.write_all(body.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AtomicTomlError::InvalidPath("no parent directory".to_string()))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AtomicTomlError::InvalidPath("no file name".to_string()))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), AtomicTomlError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), AtomicTomlError> {
    Ok(())
}

/// Exclusive lock on `<path>.lock`, released and removed on drop.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| AtomicTomlError::Lock(format!("{}: {}", lock_path.display(), e)))?;

        Ok(Self { file, lock_path })
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
    struct Sample {
        token: String,
    }

    #[test]
    fn test_missing_and_blank_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let file = AtomicTomlFile::<Sample>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_tmp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("session.toml");
        let file = AtomicTomlFile::<Sample>::new(path.clone());

        file.save(&Sample {
            token: "abc".to_string(),
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().token, "abc");
        assert!(!temp_dir.path().join("nested").join(".session.toml.tmp").exists());
        assert!(!temp_dir.path().join("nested").join("session.lock").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let file = AtomicTomlFile::<Sample>::new(path.clone());

        file.save(&Sample {
            token: "abc".to_string(),
        })
        .unwrap();
        file.remove().unwrap();
        file.remove().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        fs::write(&path, "token = ").unwrap();

        let file = AtomicTomlFile::<Sample>::new(path);
        assert!(matches!(file.load(), Err(AtomicTomlError::Parse(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_private_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let file = AtomicTomlFile::<Sample>::new(path.clone()).private();
        file.save(&Sample {
            token: "abc".to_string(),
        })
        .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
