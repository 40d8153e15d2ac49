use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::store::{KeyValueBackend, StoreError};
use crate::config::StorageConfig;

/// Process-local storage, used by tests and when no directory is configured.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryBackend {
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Opens (creating if needed) the storage directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        let io_error = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        fs::write(&staging, value).map_err(io_error)?;
        fs::rename(&staging, &path).map_err(io_error)?;
        debug!(key, path = %path.display(), "stored value");
        Ok(())
    }
}

/// Backend chosen from configuration: a directory when one is set, memory
/// otherwise.
#[derive(Debug)]
pub enum StorageBackend {
    Memory(InMemoryBackend),
    File(FileBackend),
}

impl StorageBackend {
    pub fn from_config(config: &StorageConfig) -> Result<Self, StoreError> {
        match &config.store_dir {
            Some(dir) => FileBackend::open(dir).map(Self::File),
            None => Ok(Self::Memory(InMemoryBackend::default())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StorageBackend::Memory(_) => "in-memory".to_string(),
            StorageBackend::File(backend) => format!("file:{}", backend.root().display()),
        }
    }
}

impl KeyValueBackend for StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            StorageBackend::Memory(backend) => backend.get(key),
            StorageBackend::File(backend) => backend.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            StorageBackend::Memory(backend) => backend.set(key, value),
            StorageBackend::File(backend) => backend.set(key, value),
        }
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
