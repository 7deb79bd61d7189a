use crate::domain::model::{RecordId, StoredPerson, ValidatedPerson};
use crate::utils::error::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Connectivity of a storage collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Disconnected,
    Connected,
    Connecting,
    Error,
}

impl ReadyState {
    /// Numeric driver-style code.
    pub fn code(&self) -> u8 {
        match self {
            ReadyState::Disconnected => 0,
            ReadyState::Connected => 1,
            ReadyState::Connecting => 2,
            ReadyState::Error => 3,
        }
    }
}

/// Document store holding person records.
///
/// Implementations keep a unique index on `name`: `insert` and
/// `update_by_id` fail with `StoreError::DuplicateKey` instead of writing a
/// second record with the same name.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn find_all(&self) -> StoreResult<Vec<StoredPerson>>;
    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<StoredPerson>>;
    async fn find_one_by_name(&self, name: &str) -> StoreResult<Option<StoredPerson>>;
    async fn count(&self) -> StoreResult<usize>;
    /// Assigns the identifier and persists the record.
    async fn insert(&self, person: &ValidatedPerson) -> StoreResult<StoredPerson>;
    /// Replaces name and number; returns the post-update document.
    async fn update_by_id(
        &self,
        id: RecordId,
        person: &ValidatedPerson,
    ) -> StoreResult<Option<StoredPerson>>;
    /// Returns the removed document.
    async fn delete_by_id(&self, id: RecordId) -> StoreResult<Option<StoredPerson>>;
    fn ready_state(&self) -> ReadyState;
}
