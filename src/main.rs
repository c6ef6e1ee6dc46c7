use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use spectre_client::api::ApiClient;
use spectre_client::cli;
use spectre_client::config::load_config;
use spectre_client::identity::SessionStore;
use spectre_client::store::CredentialStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let api_base =
        std::env::var("SPECTRE_API_BASE").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let state_dir = std::env::var("SPECTRE_STATE_DIR").unwrap_or_else(|_| ".spectre".to_string());
    info!(
        target: "spectre",
        "Spectre client starting: RUST_LOG='{}', api_base='{}', state_dir='{}'",
        rust_log, api_base, state_dir
    );

    let api = ApiClient::new(&api_base)?;
    let store = CredentialStore::new(&PathBuf::from(&state_dir));
    let session = Arc::new(SessionStore::new(api.clone(), store));

    // Bootstrap: config first (never fatal), then adopt any persisted
    // credential and resolve it before the shell renders anything
    let config = load_config(&api).await;
    session.load_persisted().await;

    cli::run(cli::App { api, session, config }).await
}
