//! Request routing shell.
//!
//! Maps transport-neutral requests onto [`DirectoryService`] calls and turns
//! every outcome into a status plus body. A socket listener only needs to
//! build an [`ApiRequest`] and write back the [`ApiResponse`].

use crate::core::directory::DirectoryService;
use crate::domain::model::PersonDraft;
use crate::domain::ports::PersonStore;
use crate::utils::error::PhonebookError;
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PERSONS_PATH: &str = "/api/persons";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            other => Err(format!("Unsupported method: {}", other)),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Raw request body, expected to be a JSON object when present.
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json(self, body: &Value) -> Self {
        self.with_body(body.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Html(String),
    Empty,
}

impl Display for ResponseBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{}", value),
            ResponseBody::Html(html) => write!(f, "{}", html),
            ResponseBody::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    fn json(status: u16, value: Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(value),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The JSON body, or `Value::Null` for non-JSON bodies.
    pub fn json_body(&self) -> Value {
        match &self.body {
            ResponseBody::Json(value) => value.clone(),
            _ => Value::Null,
        }
    }
}

enum Route<'a> {
    ListPersons,
    GetPerson(&'a str),
    CreatePerson,
    UpdatePerson(&'a str),
    DeletePerson(&'a str),
    Info,
    Health,
    Unknown,
}

fn resolve(method: Method, path: &str) -> Route<'_> {
    let path = path.split('?').next().unwrap_or_default();
    let trimmed = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);

    let person_id = trimmed
        .strip_prefix(PERSONS_PATH)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|id| !id.is_empty() && !id.contains('/'));

    match (method, trimmed, person_id) {
        (Method::Get, PERSONS_PATH, _) => Route::ListPersons,
        (Method::Post, PERSONS_PATH, _) => Route::CreatePerson,
        (Method::Get, _, Some(id)) => Route::GetPerson(id),
        (Method::Put, _, Some(id)) => Route::UpdatePerson(id),
        (Method::Delete, _, Some(id)) => Route::DeletePerson(id),
        (Method::Get, "/info", _) => Route::Info,
        (Method::Get, "/health", _) => Route::Health,
        _ => Route::Unknown,
    }
}

/// Reads `name` and `number` from a JSON body. Anything that is not a
/// string, including an unparsable body, counts as absent.
fn parse_draft(body: Option<&str>) -> PersonDraft {
    let value = body
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .unwrap_or(Value::Null);
    let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    PersonDraft {
        name: field("name"),
        number: field("number"),
    }
}

pub struct Router<S: PersonStore> {
    service: DirectoryService<S>,
}

impl<S: PersonStore> Router<S> {
    pub fn new(service: DirectoryService<S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &DirectoryService<S> {
        &self.service
    }

    pub async fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        tracing::debug!("{} {}", request.method, request.path);

        let result = match resolve(request.method, &request.path) {
            Route::ListPersons => self
                .service
                .list_all()
                .await
                .map(|people| ApiResponse::json(200, json!(people))),
            Route::GetPerson(id) => self
                .service
                .get_by_id(id)
                .await
                .map(|person| ApiResponse::json(200, json!(person))),
            Route::CreatePerson => {
                let draft = parse_draft(request.body.as_deref());
                self.service
                    .create(&draft)
                    .await
                    .map(|person| ApiResponse::json(201, json!(person)))
            }
            Route::UpdatePerson(id) => {
                let draft = parse_draft(request.body.as_deref());
                self.service
                    .update(id, &draft)
                    .await
                    .map(|person| ApiResponse::json(200, json!(person)))
            }
            Route::DeletePerson(id) => self.service.delete(id).await.map(|()| ApiResponse {
                status: 204,
                body: ResponseBody::Empty,
            }),
            Route::Info => self
                .service
                .count_and_timestamp()
                .await
                .map(|info| ApiResponse {
                    status: 200,
                    body: ResponseBody::Html(info.render()),
                }),
            Route::Health => Ok(ApiResponse::json(200, json!(self.service.health_check()))),
            Route::Unknown => Ok(ApiResponse::json(404, json!({ "error": "Unknown endpoint" }))),
        };

        result.unwrap_or_else(|err| error_response(&err))
    }
}

pub fn error_response(err: &PhonebookError) -> ApiResponse {
    match err {
        PhonebookError::ValidationError { field, .. } => {
            tracing::warn!("Rejected request: {}", err);
            ApiResponse::json(
                err.status_code(),
                json!({ "error": err.public_message(), "field": field }),
            )
        }
        PhonebookError::StorageError { .. } => {
            tracing::error!("Request failed: {}", err);
            ApiResponse::json(err.status_code(), json!({ "error": err.public_message() }))
        }
        PhonebookError::MissingField
        | PhonebookError::MalformedIdentifier { .. }
        | PhonebookError::NotFound { .. }
        | PhonebookError::DuplicateName { .. } => {
            tracing::warn!("Rejected request: {}", err);
            ApiResponse::json(err.status_code(), json!({ "error": err.public_message() }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_routes() {
        assert!(matches!(resolve(Method::Get, "/api/persons"), Route::ListPersons));
        assert!(matches!(resolve(Method::Get, "/api/persons/"), Route::ListPersons));
        assert!(matches!(resolve(Method::Post, "/api/persons"), Route::CreatePerson));
        assert!(matches!(resolve(Method::Get, "/api/persons/abc"), Route::GetPerson("abc")));
        assert!(matches!(resolve(Method::Put, "/api/persons/abc"), Route::UpdatePerson("abc")));
        assert!(matches!(
            resolve(Method::Delete, "/api/persons/abc?x=1"),
            Route::DeletePerson("abc")
        ));
        assert!(matches!(resolve(Method::Get, "/info"), Route::Info));
        assert!(matches!(resolve(Method::Get, "/health"), Route::Health));
        assert!(matches!(resolve(Method::Delete, "/api/persons"), Route::Unknown));
        assert!(matches!(resolve(Method::Get, "/api/persons/a/b"), Route::Unknown));
        assert!(matches!(resolve(Method::Post, "/info"), Route::Unknown));
        assert!(matches!(resolve(Method::Get, "/api/personsabc"), Route::Unknown));
    }

    #[test]
    fn test_parse_draft_ignores_non_strings() {
        let draft = parse_draft(Some(r#"{"name": "Arto Hellas", "number": 401234567}"#));
        assert_eq!(draft.name.as_deref(), Some("Arto Hellas"));
        assert_eq!(draft.number, None);

        assert_eq!(parse_draft(Some("{not json")), PersonDraft::default());
        assert_eq!(parse_draft(None), PersonDraft::default());
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("delete".parse::<Method>(), Ok(Method::Delete));
        assert_eq!("head".parse::<Method>(), Ok(Method::Head));
        assert_eq!(Method::Options.to_string(), "OPTIONS");
        assert!("BREW".parse::<Method>().is_err());
    }
}
