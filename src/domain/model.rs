//! Person record model.
//!
//! # Invariants
//! - `name` has at least [`NAME_MIN_LENGTH`] characters.
//! - `number` matches `DD-D+` or `DDD-D+` and carries at least
//!   [`NUMBER_MIN_DIGITS`] digits once the hyphen is dropped.
//! - `_id` is assigned by storage once and never reused.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const NAME_MIN_LENGTH: usize = 3;
pub const NUMBER_MIN_DIGITS: usize = 8;

// ASCII digits only; `\d` would accept other Unicode digit classes.
static NUMBER_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2,3}-[0-9]+$").expect("number pattern is valid"));

/// Storage-assigned identifier for a person record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Only storage collaborators should call this.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier token, `None` when it is structurally invalid.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::try_parse(value).ok().map(Self)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Candidate fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub name: Option<String>,
    pub number: Option<String>,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            number: Some(number.into()),
        }
    }

    /// Both fields present and non-empty.
    pub fn is_complete(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());
        filled(&self.name) && filled(&self.number)
    }

    /// Applies every field rule and collects all violations.
    pub fn validate(&self) -> Result<ValidatedPerson, Vec<FieldError>> {
        let mut errors = Vec::new();

        match self.name.as_deref() {
            None | Some("") => errors.push(FieldError::new("name", name_required_message())),
            Some(name) if !is_valid_name(name) => {
                errors.push(FieldError::new("name", name_too_short_message()))
            }
            Some(_) => {}
        }

        match self.number.as_deref() {
            None | Some("") => errors.push(FieldError::new("number", number_required_message())),
            Some(number) if !is_valid_number(number) => {
                errors.push(FieldError::new("number", invalid_number_message(number)))
            }
            Some(_) => {}
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedPerson {
            name: self.name.clone().unwrap_or_default(),
            number: self.number.clone().unwrap_or_default(),
        })
    }
}

/// A rule violation on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
        }
    }
}

/// Fields that passed [`PersonDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPerson {
    name: String,
    number: String,
}

impl ValidatedPerson {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

/// The document as held by storage, bookkeeping fields included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPerson {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub number: String,
    /// Revision marker, bumped on every update.
    #[serde(rename = "__v", default)]
    pub revision: u32,
}

impl StoredPerson {
    pub fn new(id: RecordId, person: &ValidatedPerson) -> Self {
        Self {
            id,
            name: person.name.clone(),
            number: person.number.clone(),
            revision: 0,
        }
    }

    pub fn to_wire(&self) -> WirePerson {
        WirePerson {
            id: self.id.to_string(),
            name: self.name.clone(),
            number: self.number.clone(),
        }
    }
}

/// Outward representation of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePerson {
    pub id: String,
    pub name: String,
    pub number: String,
}

pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() >= NAME_MIN_LENGTH
}

pub fn is_valid_number(number: &str) -> bool {
    NUMBER_FORMAT.is_match(number)
        && number.chars().filter(|c| c.is_ascii_digit()).count() >= NUMBER_MIN_DIGITS
}

pub fn name_required_message() -> String {
    "Name is required".to_string()
}

pub fn name_too_short_message() -> String {
    format!("Name must be at least {} characters long", NAME_MIN_LENGTH)
}

pub fn number_required_message() -> String {
    "Number is required".to_string()
}

pub fn invalid_number_message(value: &str) -> String {
    format!(
        "{} is not a valid phone number! Format: XX-XXXXXXX or XXX-XXXXXXX",
        value
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_format_examples() {
        assert!(is_valid_number("09-1234567"));
        assert!(is_valid_number("123-45678"));
        assert!(is_valid_number("12-345678"));
        assert!(!is_valid_number("12-34567"));
        assert!(!is_valid_number("123-4567"));
        assert!(!is_valid_number("091234567"));
        assert!(!is_valid_number("1-2345678"));
        assert!(!is_valid_number("1234-567890"));
        assert!(!is_valid_number("12-3456-789"));
        assert!(!is_valid_number("12-"));
        assert!(!is_valid_number("１２-3456789"));
    }

    #[test]
    fn test_name_length_counts_characters() {
        assert!(!is_valid_name("Al"));
        assert!(is_valid_name("Ada"));
        assert!(is_valid_name("Åsa"));
        assert!(!is_valid_name("Ås"));
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let errors = PersonDraft::new("Al", "12-3456").validate().unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].message, "Name must be at least 3 characters long");
        assert_eq!(errors[1].field, "number");
        assert_eq!(
            errors[1].message,
            "12-3456 is not a valid phone number! Format: XX-XXXXXXX or XXX-XXXXXXX"
        );
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let errors = PersonDraft::default().validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "number"]);
    }

    #[test]
    fn test_wire_form_hides_bookkeeping() {
        let valid = PersonDraft::new("Ada Lovelace", "39-445323523").validate().unwrap();
        let mut stored = StoredPerson::new(RecordId::generate(), &valid);
        stored.revision = 4;

        let json = serde_json::to_value(stored.to_wire()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(object["id"], stored.id.to_string());
        assert_eq!(object["name"], "Ada Lovelace");
        assert_eq!(object["number"], "39-445323523");
        assert!(!object.contains_key("_id"));
        assert!(!object.contains_key("__v"));
    }

    #[test]
    fn test_record_id_parse() {
        let id = RecordId::generate();
        assert_eq!(RecordId::parse(&id.to_string()), Some(id));
        assert_eq!(RecordId::parse("5c41c90e84d891c15dfa3431x"), None);
        assert_eq!(RecordId::parse(""), None);
    }
}
