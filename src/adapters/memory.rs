use crate::domain::model::{RecordId, StoredPerson, ValidatedPerson};
use crate::domain::ports::{PersonStore, ReadyState};
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Insertion-ordered documents with a unique index on `name`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Documents {
    people: Vec<StoredPerson>,
}

impl Documents {
    pub(crate) fn from_vec(people: Vec<StoredPerson>) -> Self {
        Self { people }
    }

    pub(crate) fn as_slice(&self) -> &[StoredPerson] {
        &self.people
    }

    pub(crate) fn find_by_id(&self, id: RecordId) -> Option<&StoredPerson> {
        self.people.iter().find(|p| p.id == id)
    }

    pub(crate) fn find_by_name(&self, name: &str) -> Option<&StoredPerson> {
        self.people.iter().find(|p| p.name == name)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<RecordId>) -> StoreResult<()> {
        let taken = self
            .people
            .iter()
            .any(|p| p.name == name && Some(p.id) != except);
        if taken {
            return Err(StoreError::DuplicateKey {
                field: "name".to_string(),
                value: name.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, person: &ValidatedPerson) -> StoreResult<StoredPerson> {
        self.ensure_unique_name(person.name(), None)?;
        let stored = StoredPerson::new(RecordId::generate(), person);
        self.people.push(stored.clone());
        Ok(stored)
    }

    pub(crate) fn update(
        &mut self,
        id: RecordId,
        person: &ValidatedPerson,
    ) -> StoreResult<Option<StoredPerson>> {
        if self.find_by_id(id).is_none() {
            return Ok(None);
        }
        self.ensure_unique_name(person.name(), Some(id))?;

        let Some(existing) = self.people.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        existing.name = person.name().to_string();
        existing.number = person.number().to_string();
        existing.revision += 1;
        Ok(Some(existing.clone()))
    }

    pub(crate) fn delete(&mut self, id: RecordId) -> Option<StoredPerson> {
        let index = self.people.iter().position(|p| p.id == id)?;
        Some(self.people.remove(index))
    }
}

/// Process-local store; always connected.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<StoredPerson>> {
        Ok(self.documents.read().await.as_slice().to_vec())
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<StoredPerson>> {
        Ok(self.documents.read().await.find_by_id(id).cloned())
    }

    async fn find_one_by_name(&self, name: &str) -> StoreResult<Option<StoredPerson>> {
        Ok(self.documents.read().await.find_by_name(name).cloned())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.documents.read().await.as_slice().len())
    }

    async fn insert(&self, person: &ValidatedPerson) -> StoreResult<StoredPerson> {
        self.documents.write().await.insert(person)
    }

    async fn update_by_id(
        &self,
        id: RecordId,
        person: &ValidatedPerson,
    ) -> StoreResult<Option<StoredPerson>> {
        self.documents.write().await.update(id, person)
    }

    async fn delete_by_id(&self, id: RecordId) -> StoreResult<Option<StoredPerson>> {
        Ok(self.documents.write().await.delete(id))
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::Connected
    }
}
