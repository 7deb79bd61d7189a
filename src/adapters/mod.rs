// Adapters layer: concrete storage collaborators behind the `PersonStore` port.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::domain::model::{RecordId, StoredPerson, ValidatedPerson};
use crate::domain::ports::{PersonStore, ReadyState};
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use url::Url;

/// Store selected at startup from a storage URI.
#[derive(Debug)]
pub enum ConfiguredStore {
    Memory(MemoryStore),
    JsonFile(JsonFileStore),
}

impl ConfiguredStore {
    /// Opens the store named by `uri` (`memory://` or `file:///path.json`).
    pub async fn connect(uri: &Url) -> StoreResult<Self> {
        match uri.scheme() {
            "memory" => Ok(ConfiguredStore::Memory(MemoryStore::new())),
            "file" => {
                let path = uri.to_file_path().map_err(|_| StoreError::Unavailable {
                    message: format!("not a local file path: {}", uri),
                })?;
                tracing::info!("Opening person store at {}", path.display());
                Ok(ConfiguredStore::JsonFile(JsonFileStore::open(path).await?))
            }
            scheme => Err(StoreError::Unavailable {
                message: format!("unsupported storage scheme: {}", scheme),
            }),
        }
    }

    fn inner(&self) -> &dyn PersonStore {
        match self {
            ConfiguredStore::Memory(store) => store,
            ConfiguredStore::JsonFile(store) => store,
        }
    }
}

#[async_trait]
impl PersonStore for ConfiguredStore {
    async fn find_all(&self) -> StoreResult<Vec<StoredPerson>> {
        self.inner().find_all().await
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<StoredPerson>> {
        self.inner().find_by_id(id).await
    }

    async fn find_one_by_name(&self, name: &str) -> StoreResult<Option<StoredPerson>> {
        self.inner().find_one_by_name(name).await
    }

    async fn count(&self) -> StoreResult<usize> {
        self.inner().count().await
    }

    async fn insert(&self, person: &ValidatedPerson) -> StoreResult<StoredPerson> {
        self.inner().insert(person).await
    }

    async fn update_by_id(
        &self,
        id: RecordId,
        person: &ValidatedPerson,
    ) -> StoreResult<Option<StoredPerson>> {
        self.inner().update_by_id(id, person).await
    }

    async fn delete_by_id(&self, id: RecordId) -> StoreResult<Option<StoredPerson>> {
        self.inner().delete_by_id(id).await
    }

    fn ready_state(&self) -> ReadyState {
        self.inner().ready_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory_uri() {
        let uri = Url::parse("memory://").unwrap();
        let store = ConfiguredStore::connect(&uri).await.unwrap();
        assert!(matches!(store, ConfiguredStore::Memory(_)));
        assert_eq!(store.ready_state(), ReadyState::Connected);
    }

    #[tokio::test]
    async fn test_connect_file_uri() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("persons.json");
        let uri = Url::from_file_path(&path).unwrap();

        let store = ConfiguredStore::connect(&uri).await.unwrap();
        assert!(matches!(store, ConfiguredStore::JsonFile(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_connect_rejects_unknown_scheme() {
        let uri = Url::parse("mongodb://localhost/phonebook").unwrap();
        assert!(ConfiguredStore::connect(&uri).await.is_err());
    }
}
