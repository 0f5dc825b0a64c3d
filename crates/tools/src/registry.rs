// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool name → tool lookup.

use crate::actions::{CreateTicketTool, DraftEmailTool, ExportJsonTool};
use crate::extraction::{ExtractionConfig, ExtractionTool};
use crate::tool::Tool;
use crate::verification::VerificationTool;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable-after-startup mapping from tool name to implementation.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name. Re-registering a name replaces
    /// the previous entry.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Build the standard registry: the real extraction adapter plus the
/// deterministic verifier and the three action stubs.
pub fn default_registry(extraction: ExtractionConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ExtractionTool::new(extraction)));
    registry.register(Arc::new(VerificationTool));
    registry.register(Arc::new(ExportJsonTool));
    registry.register(Arc::new(DraftEmailTool));
    registry.register(Arc::new(CreateTicketTool));
    registry
}
