use thiserror::Error;

/// Failures surfaced by directory operations.
///
/// One variant per outcome the routing shell distinguishes; storage details
/// never leave this type verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhonebookError {
    #[error("Missing field: name and number are required")]
    MissingField,

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Malformed identifier: {value}")]
    MalformedIdentifier { value: String },

    #[error("Person not found: {id}")]
    NotFound { id: String },

    #[error("Name already exists: {name}")]
    DuplicateName { name: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

impl PhonebookError {
    /// HTTP-style status the routing shell answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            PhonebookError::MissingField => 400,
            PhonebookError::ValidationError { .. } => 400,
            PhonebookError::MalformedIdentifier { .. } => 400,
            PhonebookError::NotFound { .. } => 404,
            PhonebookError::DuplicateName { .. } => 409,
            PhonebookError::StorageError { .. } => 500,
        }
    }

    /// Normalized message shown to clients.
    pub fn public_message(&self) -> String {
        match self {
            PhonebookError::MissingField => "Name and number are required".to_string(),
            PhonebookError::ValidationError { message, .. } => message.clone(),
            PhonebookError::MalformedIdentifier { .. } => "Malformatted ID".to_string(),
            PhonebookError::NotFound { .. } => "Person not found".to_string(),
            PhonebookError::DuplicateName { .. } => "Name already exists".to_string(),
            PhonebookError::StorageError { .. } => "Server error".to_string(),
        }
    }
}

/// Failures raised by a storage collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key on unique index {field}: {value}")]
    DuplicateKey { field: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl From<StoreError> for PhonebookError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { value, .. } => PhonebookError::DuplicateName { name: value },
            other => PhonebookError::StorageError {
                message: other.to_string(),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid configuration value for {field}: '{value}' - {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhonebookError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
