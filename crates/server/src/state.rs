// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared application state handed to every request handler.

use docops_core::{SystemClock, ToolPolicy};
use docops_storage::Store;
use docops_tools::ToolRegistry;
use std::sync::Arc;

/// Immutable service dependencies: the store handle, the read-only tool
/// registry built at startup, and the capability policy.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tools: Arc<ToolRegistry>,
    pub policy: Arc<ToolPolicy>,
    pub clock: SystemClock,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tools: Arc<ToolRegistry>, policy: ToolPolicy) -> Self {
        Self { store, tools, policy: Arc::new(policy), clock: SystemClock }
    }
}
