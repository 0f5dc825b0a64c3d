// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Tool` trait and its call context.

use async_trait::async_trait;
use docops_core::{JobId, Signals, ToolInputs};
use indexmap::IndexMap;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default per-tool timeout (dominated by LLM extraction latency).
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(20);

/// Loose key/value result returned by a tool.
pub type ToolOutput = IndexMap<String, Value>;

/// Tool-layer failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("tool {tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },
    #[error("tool {tool} failed: {message}")]
    Execution { tool: String, message: String },
    #[error("tool {tool}: invalid input: {message}")]
    InvalidInput { tool: String, message: String },
}

/// Per-call context handed to every tool.
///
/// `signals` is the runner's working copy at the time of the call; tools
/// may read it but their only output channel is the returned map.
#[derive(Debug, Clone)]
pub struct ToolCtx {
    pub job_id: JobId,
    pub domain: String,
    pub signals: Signals,
    pub tool_timeout: Duration,
}

impl ToolCtx {
    pub fn new(job_id: JobId, domain: impl Into<String>) -> Self {
        Self {
            job_id,
            domain: domain.into(),
            signals: Signals::new(),
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    docops_core::setters! {
        set {
            signals: Signals,
            tool_timeout: Duration,
        }
    }
}

/// A named async callable: `(inputs, ctx) -> result map`.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, inputs: &ToolInputs, ctx: &ToolCtx) -> Result<ToolOutput, ToolError>;
}
