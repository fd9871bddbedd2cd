//! Session storage seam
//!
//! Key-value persistence used for the audit tail. Every call site goes
//! through [`best_effort`], so a full, disabled or corrupt store degrades to
//! "no persistence" instead of failing the surrounding operation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::error::{RegistryError, RegistryResult};

/// Session-scoped key-value store
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> RegistryResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RegistryResult<()>;
    fn remove(&self, key: &str) -> RegistryResult<()>;
}

/// Run a storage operation whose failure is deliberately discarded.
///
/// Returns `None` on failure after logging it at debug level.
pub fn best_effort<T>(context: &str, op: impl FnOnce() -> RegistryResult<T>) -> Option<T> {
    match op() {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Ignoring session storage failure during {}: {}", context, e);
            None
        }
    }
}

/// In-memory session store with an optional byte quota
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys plus values exceed `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RegistryResult<()> {
        let mut entries = self.entries.lock();
        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > quota {
                return Err(RegistryError::storage(format!(
                    "quota of {} bytes exceeded writing '{}'",
                    quota, key
                )));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RegistryResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Session store backed by a JSON object file
///
/// The whole file is rewritten on every `set`/`remove`. A missing file reads
/// as empty.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> RegistryResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> RegistryResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> RegistryResult<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> RegistryResult<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
