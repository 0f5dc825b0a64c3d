// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action tool stubs: export, email draft, ticket creation.
//!
//! These stand in for real downstream integrations; they validate their
//! inputs and return the canonical output shapes.

use async_trait::async_trait;
use docops_core::{tool_names, ToolInputs};

use crate::contracts::{
    decode_inputs, encode_output, CreateTicketInput, CreateTicketOutput, DraftEmailInput,
    DraftEmailOutput, ExportJsonInput, ExportJsonOutput,
};
use crate::tool::{Tool, ToolCtx, ToolError, ToolOutput};

/// Queue used when the plan does not name one.
const DEFAULT_TICKET_QUEUE: &str = "ops";

/// The `actions.export_json` tool.
pub struct ExportJsonTool;

#[async_trait]
impl Tool for ExportJsonTool {
    fn name(&self) -> &str {
        tool_names::ACTIONS_EXPORT_JSON
    }

    async fn run(&self, inputs: &ToolInputs, _ctx: &ToolCtx) -> Result<ToolOutput, ToolError> {
        let _input: ExportJsonInput = decode_inputs(self.name(), inputs)?;
        encode_output(self.name(), &ExportJsonOutput { exported: true })
    }
}

/// The `actions.draft_email` tool.
pub struct DraftEmailTool;

#[async_trait]
impl Tool for DraftEmailTool {
    fn name(&self) -> &str {
        tool_names::ACTIONS_DRAFT_EMAIL
    }

    async fn run(&self, inputs: &ToolInputs, _ctx: &ToolCtx) -> Result<ToolOutput, ToolError> {
        let input: DraftEmailInput = decode_inputs(self.name(), inputs)?;
        let output = DraftEmailOutput {
            subject: format!("[DOCOPS] {}", input.template_id),
            body: "Draft email body (stub) based on extracted data.".to_string(),
            to: input.to,
        };
        encode_output(self.name(), &output)
    }
}

/// The `actions.create_ticket` tool.
pub struct CreateTicketTool;

#[async_trait]
impl Tool for CreateTicketTool {
    fn name(&self) -> &str {
        tool_names::ACTIONS_CREATE_TICKET
    }

    async fn run(&self, inputs: &ToolInputs, _ctx: &ToolCtx) -> Result<ToolOutput, ToolError> {
        let input: CreateTicketInput = decode_inputs(self.name(), inputs)?;

        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let title = input
            .title
            .or(input.reason)
            .unwrap_or_else(|| "document review".to_string());
        let output = CreateTicketOutput {
            ticket_id: format!("TCK-{}", &suffix[..6]),
            status: "CREATED".to_string(),
        };
        tracing::debug!(
            queue = %input.queue.as_deref().unwrap_or(DEFAULT_TICKET_QUEUE),
            title = %title,
            ticket_id = %output.ticket_id,
            "ticket stub created"
        );
        encode_output(self.name(), &output)
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
