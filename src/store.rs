use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

const STORAGE_FILE_NAME : &str = "storage.json";

/// Same order of magnitude browsers give a single origin.
pub const DEFAULT_QUOTA_BYTES : usize = 5 * 1024 * 1024;

pub const KEY_IDENTITY : &str = "launcher_identity";
pub const KEY_SETTINGS : &str = "launcher_settings";
pub const KEY_PLAYTIME : &str = "playtime";
pub const KEY_LAST_SESSION : &str = "lastSession";
pub const KEY_PROFILE : &str = "profile";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a key lives. Identity-scoped keys are suffixed with the identity
/// so two users on the same machine never read each other's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace<'a> {
    Global,
    Identity(&'a str),
}

pub fn storage_key(namespace: Namespace<'_>, key: &str) -> String {
    match namespace {
        Namespace::Global => key.to_string(),
        Namespace::Identity(identity) => format!("{key}_{identity}"),
    }
}

/// Raw string storage. Writes may fail; reads never do.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryBackend {
    #[cfg(test)]
    pub fn with_quota(quota: usize) -> Self {
        Self { quota: Some(quota), ..Default::default() }
    }

    fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All entries in one JSON object on disk, rewritten on every mutation.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    quota: usize,
}

impl FileBackend {
    /// Opens `storage.json` in `dir`. A missing file is an empty store; a
    /// corrupt one is logged and also treated as empty.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(STORAGE_FILE_NAME);
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring unreadable storage file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Couldn't read storage file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        debug!("Opened storage {} with {} entries", path.display(), entries.len());

        Self { path, entries, quota: DEFAULT_QUOTA_BYTES }
    }

    #[cfg(test)]
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string(&self.entries)?;
        if text.len() > self.quota {
            return Err(StoreError::QuotaExceeded { needed: text.len(), quota: self.quota });
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }
        fs::write(&self.path, text)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_string(), value);
        let result = self.flush();
        if result.is_err() {
            // A rejected write must not linger in memory either.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
        }
        result
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        let result = self.flush();
        if result.is_err() {
            // Still on disk, so still here.
            self.entries.insert(key.to_string(), previous);
        }
        result
    }
}

/// Best-effort front for a backend. Failures are logged and dropped, so a
/// caller only ever learns that a value is or isn't there.
pub struct Store {
    backend: Box<dyn StorageBackend>,
}

impl Store {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::default()))
    }

    pub fn get(&self, namespace: Namespace<'_>, key: &str) -> Option<String> {
        self.backend.read(&storage_key(namespace, key))
    }

    pub fn set(&mut self, namespace: Namespace<'_>, key: &str, value: impl Into<String>) {
        let full_key = storage_key(namespace, key);
        if let Err(e) = self.backend.write(&full_key, value.into()) {
            warn!("Couldn't store {}: {}", full_key, e);
        }
    }

    pub fn remove(&mut self, namespace: Namespace<'_>, key: &str) {
        let full_key = storage_key(namespace, key);
        if let Err(e) = self.backend.delete(&full_key) {
            warn!("Couldn't remove {}: {}", full_key, e);
        }
    }

    pub fn get_parsed<T: FromStr>(&self, namespace: Namespace<'_>, key: &str) -> Option<T> {
        let raw = self.get(namespace, key)?;
        let parsed = raw.trim().parse().ok();
        if parsed.is_none() {
            warn!("Ignoring malformed value for {}: {:?}", storage_key(namespace, key), raw);
        }
        parsed
    }

    pub fn get_json<T: DeserializeOwned>(&self, namespace: Namespace<'_>, key: &str) -> Option<T> {
        let raw = self.get(namespace, key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed record {}: {}", storage_key(namespace, key), e);
                None
            }
        }
    }

    pub fn set_json<T: Serialize>(&mut self, namespace: Namespace<'_>, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(text) => self.set(namespace, key, text),
            Err(e) => warn!("Couldn't serialize {}: {}", storage_key(namespace, key), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keys_are_suffixed() {
        assert_eq!(storage_key(Namespace::Identity("Steve"), KEY_PLAYTIME), "playtime_Steve");
        assert_eq!(storage_key(Namespace::Identity("Alex"), KEY_LAST_SESSION), "lastSession_Alex");
        assert_eq!(storage_key(Namespace::Global, KEY_SETTINGS), "launcher_settings");
    }

    #[test]
    fn namespaces_do_not_leak() {
        let mut store = Store::in_memory();
        store.set(Namespace::Identity("Steve"), KEY_PLAYTIME, "10");
        assert_eq!(store.get(Namespace::Identity("Alex"), KEY_PLAYTIME), None);
        assert_eq!(store.get_parsed::<u64>(Namespace::Identity("Steve"), KEY_PLAYTIME), Some(10));
    }

    #[test]
    fn remove_deletes_only_the_named_key() {
        let mut store = Store::in_memory();
        store.set(Namespace::Global, KEY_IDENTITY, "Steve");
        store.set(Namespace::Identity("Steve"), KEY_PLAYTIME, "3");
        store.remove(Namespace::Global, KEY_IDENTITY);
        assert_eq!(store.get(Namespace::Global, KEY_IDENTITY), None);
        assert_eq!(store.get(Namespace::Identity("Steve"), KEY_PLAYTIME).as_deref(), Some("3"));
    }

    #[test]
    fn quota_failure_is_swallowed_and_value_not_remembered() {
        let mut store = Store::new(Box::new(MemoryBackend::with_quota(16)));
        store.set(Namespace::Global, "k", "small");
        store.set(Namespace::Global, "big", "x".repeat(64));
        assert_eq!(store.get(Namespace::Global, "k").as_deref(), Some("small"));
        assert_eq!(store.get(Namespace::Global, "big"), None);
    }

    #[test]
    fn malformed_scalars_read_as_absent() {
        let mut store = Store::in_memory();
        store.set(Namespace::Identity("Steve"), KEY_PLAYTIME, "lots");
        assert_eq!(store.get_parsed::<u64>(Namespace::Identity("Steve"), KEY_PLAYTIME), None);
    }

    #[test]
    fn file_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = Store::new(Box::new(FileBackend::open(dir.path())));
            store.set(Namespace::Identity("Steve"), KEY_PLAYTIME, "65");
            store.set(Namespace::Global, KEY_IDENTITY, "Steve");
        }
        let store = Store::new(Box::new(FileBackend::open(dir.path())));
        assert_eq!(store.get(Namespace::Identity("Steve"), KEY_PLAYTIME).as_deref(), Some("65"));
        assert_eq!(store.get(Namespace::Global, KEY_IDENTITY).as_deref(), Some("Steve"));
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORAGE_FILE_NAME), "{not json").unwrap();
        let backend = FileBackend::open(dir.path());
        assert_eq!(backend.read(KEY_IDENTITY), None);
    }

    #[test]
    fn file_backend_rejects_writes_over_quota() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path()).with_quota(32);
        assert!(backend.write("a", "1".into()).is_ok());
        let err = backend.write("b", "y".repeat(100)).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(backend.read("b"), None);

        let reopened = FileBackend::open(dir.path());
        assert_eq!(reopened.read("a").as_deref(), Some("1"));
    }

    #[test]
    fn failed_delete_keeps_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path());
        backend.write(KEY_IDENTITY, "Steve".into()).unwrap();

        // A directory where the file should be makes every rewrite fail.
        let file = dir.path().join(STORAGE_FILE_NAME);
        fs::remove_file(&file).unwrap();
        fs::create_dir(&file).unwrap();

        assert!(matches!(backend.delete(KEY_IDENTITY), Err(StoreError::Io { .. })));
        assert_eq!(backend.read(KEY_IDENTITY).as_deref(), Some("Steve"));
    }

    #[test]
    fn deleting_a_missing_key_does_not_touch_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path());
        assert!(backend.delete(KEY_IDENTITY).is_ok());
        assert!(!dir.path().join(STORAGE_FILE_NAME).exists());
    }
}
