use crate::errors::EngineError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::error;

pub const THEME_KEY: &str = "theme";
pub const PROFILE_KEY: &str = "profileData";

/// Persistent key-value space surviving page loads. Only the theme
/// controller writes the theme key; the profile loader reads its override
/// key. Implementations must tolerate concurrent readers on one task.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str) -> Result<(), EngineError>;
    async fn remove(&self, key: &str) -> Result<(), EngineError>;
}

/// File-backed store: one JSON object of string pairs, rewritten whole on
/// every change.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub async fn open(path: PathBuf) -> Self {
        let entries = load_entries(&path).await;
        JsonFileStore {
            path,
            entries: Mutex::new(entries),
        }
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), EngineError> {
        let payload = serde_json::to_vec_pretty(entries)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}

async fn load_entries(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse store file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read store file: {err}");
            BTreeMap::new()
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), EngineError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), EngineError> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        self.persist(&entries).await
    }
}

/// Volatile store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), EngineError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), EngineError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
