//! Persistence of tracker state. State is a handful of named collections, every collection is a
//! single JSON document that's replaced as a whole on each write.

use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use fs4::tokio::AsyncFileExt;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;

pub const PROJECTS_KEY: &str = "projects";
pub const LOGS_KEY: &str = "logs";
pub const STARTED_LOGS_KEY: &str = "started-logs";
pub const ACTIVITIES_KEY: &str = "activities";

/// Key value storage of serialized collections.
pub trait StateStore {
    /// Returns the stored document or [None] if nothing was written under `key` yet.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Replaces the document under `key`.
    fn write(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Deref> StateStore for T
where
    T::Target: StateStore,
{
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        self.deref().read(key)
    }

    fn write(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send {
        self.deref().write(key, value)
    }
}

pub async fn load_collection<T: DeserializeOwned>(
    store: &impl StateStore,
    key: &str,
) -> Result<Vec<T>> {
    match store.read(key).await? {
        Some(document) => serde_json::from_str(&document)
            .with_context(|| format!("Stored collection {key} is malformed")),
        None => Ok(vec![]),
    }
}

pub async fn save_collection<T: Serialize>(
    store: &impl StateStore,
    key: &str,
    values: &[T],
) -> Result<()> {
    let document = serde_json::to_string(values)?;
    store.write(key, document).await
}

/// Stores every collection as `<key>.json` inside a directory. Writes go through a temporary
/// file and a rename, so readers see either the old or the new document. A `.lock` file
/// serializes access between processes.
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    pub fn new(state_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&state_dir)?;

        Ok(Self { state_dir })
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{key}.json"))
    }

    async fn open_lock(&self) -> Result<File> {
        let path = self.state_dir.join(".lock");
        File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await
            .with_context(|| format!("Can't open lock file {path:?}"))
    }

    async fn read_document(path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {path:?}")),
        }
    }

    async fn write_document(path: &Path, value: &str) -> Result<()> {
        let temporary = path.with_extension("json.tmp");
        let mut file = File::create(&temporary).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        tokio::fs::rename(&temporary, path)
            .await
            .with_context(|| format!("Failed to replace {path:?}"))
    }
}

impl StateStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.document_path(key);
        debug!("Reading {path:?}");
        let lock = self.open_lock().await?;
        lock.lock_shared()?;
        let result = Self::read_document(&path).await;
        lock.unlock_async().await?;
        result
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        let path = self.document_path(key);
        debug!("Writing {path:?}");
        let lock = self.open_lock().await?;
        lock.lock_exclusive()?;
        let result = Self::write_document(&path, &value).await;
        lock.unlock_async().await?;
        result
    }
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use std::{collections::HashMap, sync::Mutex};

    use anyhow::Result;

    use super::StateStore;

    /// Store for tests. Remembers the order of writes.
    #[derive(Default)]
    pub struct MemoryStore {
        documents: Mutex<HashMap<String, String>>,
        writes: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        pub fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }

        pub fn document(&self, key: &str) -> Option<String> {
            self.documents.lock().unwrap().get(key).cloned()
        }
    }

    impl StateStore for MemoryStore {
        async fn read(&self, key: &str) -> Result<Option<String>> {
            Ok(self.document(key))
        }

        async fn write(&self, key: &str, value: String) -> Result<()> {
            self.documents.lock().unwrap().insert(key.to_owned(), value);
            self.writes.lock().unwrap().push(key.to_owned());
            Ok(())
        }
    }
}
