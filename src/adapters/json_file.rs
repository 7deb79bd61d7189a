use crate::adapters::memory::Documents;
use crate::domain::model::{RecordId, StoredPerson, ValidatedPerson};
use crate::domain::ports::{PersonStore, ReadyState};
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::RwLock;

/// Person documents persisted as a JSON array in a single file.
///
/// Every mutation is applied to a copy, written to disk, and only then made
/// visible, so the in-memory view never runs ahead of the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    documents: RwLock<Documents>,
    state: AtomicU8,
}

impl JsonFileStore {
    /// Creates an unconnected store; call [`JsonFileStore::connect`] before use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            documents: RwLock::new(Documents::default()),
            state: AtomicU8::new(ReadyState::Connecting.code()),
        }
    }

    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self::new(path);
        store.connect().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads existing documents; a missing file starts an empty collection.
    pub async fn connect(&self) -> StoreResult<()> {
        self.set_state(ReadyState::Connecting);

        let people = match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => match serde_json::from_slice::<Vec<StoredPerson>>(&bytes) {
                Ok(people) => people,
                Err(e) => {
                    self.set_state(ReadyState::Error);
                    return Err(e.into());
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                self.set_state(ReadyState::Error);
                return Err(e.into());
            }
        };

        tracing::debug!(
            "Loaded {} person documents from {}",
            people.len(),
            self.path.display()
        );
        *self.documents.write().await = Documents::from_vec(people);
        self.set_state(ReadyState::Connected);
        Ok(())
    }

    fn set_state(&self, state: ReadyState) {
        self.state.store(state.code(), Ordering::SeqCst);
    }

    fn ensure_connected(&self) -> StoreResult<()> {
        match self.ready_state() {
            ReadyState::Connected => Ok(()),
            state => Err(StoreError::Unavailable {
                message: format!("store at {} is {:?}", self.path.display(), state),
            }),
        }
    }

    async fn flush(&self, documents: &Documents) -> StoreResult<()> {
        let result = self.write_file(documents).await;
        if result.is_err() {
            self.set_state(ReadyState::Error);
        }
        result
    }

    async fn write_file(&self, documents: &Documents) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(documents.as_slice())?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl PersonStore for JsonFileStore {
    async fn find_all(&self) -> StoreResult<Vec<StoredPerson>> {
        self.ensure_connected()?;
        Ok(self.documents.read().await.as_slice().to_vec())
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<StoredPerson>> {
        self.ensure_connected()?;
        Ok(self.documents.read().await.find_by_id(id).cloned())
    }

    async fn find_one_by_name(&self, name: &str) -> StoreResult<Option<StoredPerson>> {
        self.ensure_connected()?;
        Ok(self.documents.read().await.find_by_name(name).cloned())
    }

    async fn count(&self) -> StoreResult<usize> {
        self.ensure_connected()?;
        Ok(self.documents.read().await.as_slice().len())
    }

    async fn insert(&self, person: &ValidatedPerson) -> StoreResult<StoredPerson> {
        self.ensure_connected()?;
        let mut documents = self.documents.write().await;

        let mut next = documents.clone();
        let stored = next.insert(person)?;
        self.flush(&next).await?;

        *documents = next;
        Ok(stored)
    }

    async fn update_by_id(
        &self,
        id: RecordId,
        person: &ValidatedPerson,
    ) -> StoreResult<Option<StoredPerson>> {
        self.ensure_connected()?;
        let mut documents = self.documents.write().await;

        let mut next = documents.clone();
        let Some(updated) = next.update(id, person)? else {
            return Ok(None);
        };
        self.flush(&next).await?;

        *documents = next;
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: RecordId) -> StoreResult<Option<StoredPerson>> {
        self.ensure_connected()?;
        let mut documents = self.documents.write().await;

        let mut next = documents.clone();
        let Some(deleted) = next.delete(id) else {
            return Ok(None);
        };
        self.flush(&next).await?;

        *documents = next;
        Ok(Some(deleted))
    }

    fn ready_state(&self) -> ReadyState {
        match self.state.load(Ordering::SeqCst) {
            0 => ReadyState::Disconnected,
            1 => ReadyState::Connected,
            2 => ReadyState::Connecting,
            _ => ReadyState::Error,
        }
    }
}
