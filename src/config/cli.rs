use crate::core::router::{ApiRequest, Method};
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Debug, Clone, Parser)]
#[command(name = "phonebook")]
#[command(about = "Phonebook directory: manage named contacts with validated numbers")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Storage URI, overrides config file and environment
    #[arg(long)]
    pub storage_uri: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every person
    List,
    /// Show one person by id
    Get { id: String },
    /// Add a person
    Add { name: String, number: String },
    /// Replace a person's name and number
    Update {
        id: String,
        name: String,
        number: String,
    },
    /// Delete a person by id
    Delete { id: String },
    /// Show record count and server time
    Info,
    /// Show service and storage status
    Health,
    /// Send a raw request through the router
    Request {
        method: Method,
        path: String,
        #[arg(long)]
        body: Option<String>,
    },
}

impl Command {
    pub fn to_request(&self) -> ApiRequest {
        match self {
            Command::List => ApiRequest::new(Method::Get, "/api/persons"),
            Command::Get { id } => ApiRequest::new(Method::Get, format!("/api/persons/{}", id)),
            Command::Add { name, number } => ApiRequest::new(Method::Post, "/api/persons")
                .with_json(&json!({ "name": name, "number": number })),
            Command::Update { id, name, number } => {
                ApiRequest::new(Method::Put, format!("/api/persons/{}", id))
                    .with_json(&json!({ "name": name, "number": number }))
            }
            Command::Delete { id } => {
                ApiRequest::new(Method::Delete, format!("/api/persons/{}", id))
            }
            Command::Info => ApiRequest::new(Method::Get, "/info"),
            Command::Health => ApiRequest::new(Method::Get, "/health"),
            Command::Request { method, path, body } => {
                let request = ApiRequest::new(*method, path.clone());
                match body {
                    Some(body) => request.with_body(body.clone()),
                    None => request,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_command() {
        let cli = CliConfig::parse_from(["phonebook", "add", "Arto Hellas", "040-1234567"]);
        let request = cli.command.to_request();

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/api/persons");
        let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Arto Hellas");
        assert_eq!(body["number"], "040-1234567");
    }

    #[test]
    fn test_parse_raw_request() {
        let cli = CliConfig::parse_from([
            "phonebook",
            "--storage-uri",
            "memory://",
            "request",
            "delete",
            "/api/persons/abc",
        ]);

        assert_eq!(cli.storage_uri.as_deref(), Some("memory://"));
        let request = cli.command.to_request();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.body, None);
    }
}
