// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the server crate.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Service version (from Cargo.toml)
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: String,
    pub log_level: String,
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
}

impl Config {
    /// Resolve configuration from the environment.
    ///
    /// Recognized keys: `APP_ENV` (default `dev`), `LOG_LEVEL` (default
    /// `INFO`), `DATABASE_URL` (default `sqlite:./docops.db`),
    /// `BIND_ADDR` (default `127.0.0.1:8080`), `OPENAI_API_KEY`,
    /// `OPENAI_MODEL` (default `gpt-4.1-mini`).
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./docops.db".to_string());
        Self {
            app_env: std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string()),
            database_path: database_path(&database_url),
            bind_addr: std::env::var("BIND_ADDR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080))),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            openai_model: std::env::var("OPENAI_MODEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "gpt-4.1-mini".to_string()),
        }
    }
}

/// Extract the filesystem path from a sqlite-style database URL.
///
/// Accepts bare paths, `sqlite:` URLs, and the async-driver spelling
/// `sqlite+aiosqlite:///./docops.db`.
pub fn database_path(url: &str) -> PathBuf {
    let mut rest = url;
    for prefix in ["sqlite+aiosqlite://", "sqlite://", "sqlite:"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    // "sqlite:///./docops.db" leaves "/./docops.db"; keep it relative.
    if let Some(relative) = rest.strip_prefix("/.") {
        if relative.starts_with('/') {
            return PathBuf::from(format!(".{relative}"));
        }
    }
    PathBuf::from(rest)
}
