pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::PhonebookConfig;

pub use adapters::{ConfiguredStore, JsonFileStore, MemoryStore};
pub use crate::core::{
    directory::{DirectoryService, HealthReport, PhonebookInfo},
    router::{ApiRequest, ApiResponse, Method, ResponseBody, Router},
};
pub use domain::model::{PersonDraft, RecordId, WirePerson};
pub use domain::ports::{PersonStore, ReadyState};
pub use utils::error::{PhonebookError, Result};
