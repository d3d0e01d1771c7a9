use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Serialize, de::DeserializeOwned};

/// Key/value collaborator holding every persisted document as UTF-8 text.
///
/// Writes replace whole documents; callers serialize mutations against the
/// same key themselves.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key).await
    }
}

/// Reads and decodes a JSON document, `None` when the key is absent.
pub async fn load_json<T: DeserializeOwned>(
    storage: &(impl Storage + ?Sized),
    key: &str,
) -> crate::Result<Option<T>> {
    let Some(raw) = storage.get(key).await.map_err(crate::Error::Persistence)? else {
        return Ok(None);
    };

    Ok(Some(serde_json::from_str(&raw)?))
}

pub async fn save_json<T: Serialize + ?Sized>(
    storage: &(impl Storage + ?Sized),
    key: &str,
    value: &T,
) -> crate::Result<()> {
    let raw = serde_json::to_string(value)?;

    storage.set(key, &raw).await.map_err(|err| {
        tracing::warn!(key, error = %err, "failed to persist document");
        crate::Error::Persistence(err)
    })
}

pub async fn remove_key(storage: &(impl Storage + ?Sized), key: &str) -> crate::Result<()> {
    storage.remove(key).await.map_err(crate::Error::Persistence)
}

/// In-process storage, used by tests and throwaway sessions.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let Ok(entries) = self.entries.read() else {
            return vec![];
        };

        let mut keys = entries.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;

        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;

        entries.insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;

        entries.remove(key);

        Ok(())
    }
}
