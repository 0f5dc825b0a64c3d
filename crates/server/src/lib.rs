// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! docops-server: the HTTP boundary of the platform.
//!
//! Jobs are created and advanced by explicit requests; the run endpoint
//! invokes the engine and owns the FAILED-drive / ERROR-audit handling
//! for run failures. Binary: `docopsd`.

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use docops_core::ToolPolicy;
use docops_storage::SqliteStore;
use docops_tools::{default_registry, ExtractionConfig};

pub use config::Config;
pub use error::ServerError;
pub use state::AppState;

/// Build application state from configuration: open the store and build
/// the tool registry (once; read-only afterwards).
pub fn build_state(config: &Config) -> Result<AppState, ServerError> {
    let store = SqliteStore::open(&config.database_path)?;

    let mut extraction = ExtractionConfig::default().model(config.openai_model.clone());
    if let Some(key) = &config.openai_api_key {
        extraction = extraction.api_key(key.clone());
    }
    let tools = default_registry(extraction);

    Ok(AppState::new(Arc::new(store), Arc::new(tools), ToolPolicy::default_policy()))
}

/// Serve the jobs API until the process is stopped.
pub async fn serve(config: Config) -> Result<(), ServerError> {
    let state = build_state(&config)?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind { addr: config.bind_addr, source })?;
    tracing::info!(
        addr = %config.bind_addr,
        app_env = %config.app_env,
        db = %config.database_path.display(),
        "docops server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
