//! Directory use-case service.
//!
//! # Invariants
//! - Every write goes through `PersonDraft::validate` first.
//! - Name uniqueness is enforced by the store's unique index, in the same
//!   storage operation as the write.
//! - No record state is kept between calls.

use crate::domain::model::{PersonDraft, RecordId, ValidatedPerson, WirePerson};
use crate::domain::ports::{PersonStore, ReadyState};
use crate::utils::error::{PhonebookError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Record count at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhonebookInfo {
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

impl PhonebookInfo {
    pub fn render(&self) -> String {
        format!(
            "<p>Phonebook has info for {} people</p>\n<p>{}</p>",
            self.count,
            self.timestamp.to_rfc2822()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub database: ReadyState,
}

pub struct DirectoryService<S: PersonStore> {
    store: Arc<S>,
}

impl<S: PersonStore> Clone for DirectoryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PersonStore> DirectoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn list_all(&self) -> Result<Vec<WirePerson>> {
        let people = self.store.find_all().await.map_err(storage_failure)?;
        tracing::info!("Retrieved {} persons", people.len());
        Ok(people.iter().map(|p| p.to_wire()).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<WirePerson> {
        let record_id = parse_id(id)?;
        self.store
            .find_by_id(record_id)
            .await
            .map_err(storage_failure)?
            .map(|p| p.to_wire())
            .ok_or_else(|| not_found(id))
    }

    /// Creates a record. Uniqueness is decided by the insert itself, so two
    /// concurrent creates with the same name cannot both succeed.
    pub async fn create(&self, draft: &PersonDraft) -> Result<WirePerson> {
        let person = check_draft(draft)?;

        let stored = self.store.insert(&person).await.map_err(storage_failure)?;
        tracing::info!("Added new person {} ({})", stored.name, stored.id);
        Ok(stored.to_wire())
    }

    /// Replaces name and number wholesale.
    pub async fn update(&self, id: &str, draft: &PersonDraft) -> Result<WirePerson> {
        let person = check_draft(draft)?;
        let record_id = parse_id(id)?;

        let updated = self
            .store
            .update_by_id(record_id, &person)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Updated person {} (revision {})", updated.id, updated.revision);
        Ok(updated.to_wire())
    }

    /// A second delete of the same id reports `NotFound`.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let record_id = parse_id(id)?;
        self.store
            .delete_by_id(record_id)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Deleted person with id {}", record_id);
        Ok(())
    }

    pub async fn count_and_timestamp(&self) -> Result<PhonebookInfo> {
        let count = self.store.count().await.map_err(storage_failure)?;
        Ok(PhonebookInfo {
            count,
            timestamp: Utc::now(),
        })
    }

    pub fn health_check(&self) -> HealthReport {
        HealthReport {
            status: "OK".to_string(),
            database: self.store.ready_state(),
        }
    }
}

fn check_draft(draft: &PersonDraft) -> Result<ValidatedPerson> {
    if !draft.is_complete() {
        return Err(PhonebookError::MissingField);
    }

    draft.validate().map_err(|errors| {
        // Only the first violation is reported to callers.
        let first = errors.into_iter().next();
        match first {
            Some(error) => PhonebookError::ValidationError {
                field: error.field,
                message: error.message,
            },
            None => PhonebookError::MissingField,
        }
    })
}

fn parse_id(id: &str) -> Result<RecordId> {
    RecordId::parse(id).ok_or_else(|| PhonebookError::MalformedIdentifier {
        value: id.to_string(),
    })
}

fn not_found(id: &str) -> PhonebookError {
    PhonebookError::NotFound { id: id.to_string() }
}

fn storage_failure(err: crate::utils::error::StoreError) -> PhonebookError {
    let err = PhonebookError::from(err);
    if let PhonebookError::StorageError { message } = &err {
        tracing::error!("Storage operation failed: {}", message);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn service() -> DirectoryService<MemoryStore> {
        DirectoryService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_missing_field_precedes_validation() {
        let svc = service();
        let draft = PersonDraft {
            name: Some("Al".to_string()),
            number: None,
        };
        assert_eq!(svc.create(&draft).await, Err(PhonebookError::MissingField));

        let draft = PersonDraft::new("", "040-1234567");
        assert_eq!(svc.create(&draft).await, Err(PhonebookError::MissingField));
    }

    #[tokio::test]
    async fn test_first_violation_is_reported() {
        let err = service()
            .create(&PersonDraft::new("Al", "12-3"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PhonebookError::ValidationError {
                field: "name".to_string(),
                message: "Name must be at least 3 characters long".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_update_validates_before_parsing_id() {
        let err = service()
            .update("not-an-id", &PersonDraft::new("Arto", "12-3"))
            .await
            .unwrap_err();
        assert!(matches!(err, PhonebookError::ValidationError { ref field, .. } if field == "number"));
    }

    #[tokio::test]
    async fn test_info_render() {
        let svc = service();
        svc.create(&PersonDraft::new("Arto Hellas", "040-1234567"))
            .await
            .unwrap();

        let info = svc.count_and_timestamp().await.unwrap();
        assert_eq!(info.count, 1);
        assert!(info
            .render()
            .starts_with("<p>Phonebook has info for 1 people</p>"));
    }

    #[test]
    fn test_health_reports_store_state() {
        let report = service().health_check();
        assert_eq!(report.status, "OK");
        assert_eq!(report.database, ReadyState::Connected);
    }
}
