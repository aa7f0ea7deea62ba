use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::key_store::{KeyStore, KeyStoreError};
use crate::crypto::SecretKey;

/// Key store backed by a single PEM file on disk
///
/// Writes go to a temporary file in the same directory which is then
/// linked into place without clobbering, so the key file either does
/// not exist or holds a complete key.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Write `key` to a synced temporary file next to the key file
    fn stage(&self, key: &SecretKey) -> Result<NamedTempFile, KeyStoreError> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(key.to_pem().as_bytes())?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }
}

impl KeyStore for FileKeyStore {
    fn get(&self) -> Result<Option<SecretKey>, KeyStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(pem) => Ok(Some(SecretKey::from_pem(&pem)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &SecretKey) -> Result<SecretKey, KeyStoreError> {
        let tmp = self.stage(key)?;
        match tmp.persist_noclobber(&self.path) {
            Ok(_) => {
                tracing::debug!("persisted key to {}", self.path.display());
                Ok(key.clone())
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(
                    "key already present at {}, keeping it",
                    self.path.display()
                );
                self.get()?.ok_or_else(|| {
                    KeyStoreError::Internal(format!(
                        "key at {} vanished while persisting",
                        self.path.display()
                    ))
                })
            }
            Err(e) => Err(e.error.into()),
        }
    }

    fn replace(&self, key: &SecretKey) -> Result<(), KeyStoreError> {
        // rename over the old file, so readers see one key or the other
        self.stage(key)?
            .persist(&self.path)
            .map_err(|e| KeyStoreError::Io(e.error))?;
        tracing::debug!("replaced key at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), KeyStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_on_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyStore::new(temp.path().join("key.pem"));
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyStore::new(temp.path().join("nested").join("key.pem"));
        let key = SecretKey::generate();

        let persisted = store.put(&key).unwrap();
        assert_eq!(persisted.to_bytes(), key.to_bytes());

        let loaded = store.get().unwrap().unwrap();
        assert_eq!(loaded.to_bytes(), key.to_bytes());
    }

    #[test]
    fn test_put_does_not_overwrite() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyStore::new(temp.path().join("key.pem"));
        let first = SecretKey::generate();
        let second = SecretKey::generate();

        store.put(&first).unwrap();
        let persisted = store.put(&second).unwrap();

        assert_eq!(persisted.to_bytes(), first.to_bytes());
        assert_eq!(store.get().unwrap().unwrap().to_bytes(), first.to_bytes());
    }

    #[test]
    fn test_replace_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyStore::new(temp.path().join("key.pem"));
        let first = SecretKey::generate();
        let second = SecretKey::generate();

        store.put(&first).unwrap();
        store.replace(&second).unwrap();
        assert_eq!(store.get().unwrap().unwrap().to_bytes(), second.to_bytes());

        // no temporary files are left behind
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_clear() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyStore::new(temp.path().join("key.pem"));

        store.put(&SecretKey::generate()).unwrap();
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());

        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("key.pem");
        fs::write(&path, "garbage").unwrap();

        let store = FileKeyStore::new(path);
        assert!(matches!(store.get(), Err(KeyStoreError::InvalidKey(_))));
    }
}
