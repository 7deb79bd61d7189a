use anyhow::Context;
use clap::Parser;
use phonebook::utils::{logger, validation::Validate};
use phonebook::{CliConfig, ConfiguredStore, DirectoryService, PhonebookConfig, Router};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => PhonebookConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => PhonebookConfig::default(),
    }
    .with_env_overrides();

    if let Some(uri) = &cli.storage_uri {
        config.set_storage_uri(uri.clone());
    }

    logger::init_logger(config.log_level(), config.log_format(), cli.verbose);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    tracing::debug!("Config: {:?}", config);

    let storage_url = config.storage_url()?;
    let store = ConfiguredStore::connect(&storage_url)
        .await
        .with_context(|| format!("Failed to connect to storage at {}", storage_url))?;
    tracing::info!("Connected to storage: {}", storage_url);

    let router = Router::new(DirectoryService::new(Arc::new(store)));
    let request = cli.command.to_request();
    let response = router.dispatch(&request).await;

    println!("{}", response.status);
    let body = response.body.to_string();
    if !body.is_empty() {
        println!("{}", body);
    }

    if !response.is_success() {
        std::process::exit(2);
    }
    Ok(())
}
