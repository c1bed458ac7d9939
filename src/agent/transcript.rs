//! Conversation Transcript
//!
//! The ordered history of turns forming the model's context. Append-only;
//! each session owns exactly one transcript and it dies with the session.

use crate::error::TranscriptError;
use crate::types::{ModelResponse, ToolCallRequest, ToolResult, Turn};

/// Owns the turn list plus the pending-call bookkeeping for the most
/// recent model turn.
#[derive(Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    pending: Vec<ToolCallRequest>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Record the user's query. Only valid as the first turn; this design
    /// has at most one user turn per session.
    pub fn append_user(&mut self, text: &str) -> Result<(), TranscriptError> {
        if !self.turns.is_empty() {
            return Err(TranscriptError::UserTurnNotFirst);
        }
        self.turns.push(Turn::User {
            text: text.to_string(),
        });
        Ok(())
    }

    /// Record the raw model turn exactly as the client returned it,
    /// preserving multi-call batches. Tool calls become pending until
    /// answered by `append_tool_results`.
    pub fn append_model(&mut self, response: ModelResponse) {
        match response {
            ModelResponse::Text(text) => {
                self.pending.clear();
                self.turns.push(Turn::Model {
                    text,
                    calls: Vec::new(),
                });
            }
            ModelResponse::ToolCalls { text, calls } => {
                self.pending = calls.clone();
                self.turns.push(Turn::Model { text, calls });
            }
        }
    }

    /// Record one bundled tool-result turn answering the latest model turn.
    /// Results must match the pending requests 1:1, by `(call_id, name)`,
    /// in request order.
    pub fn append_tool_results(
        &mut self,
        results: Vec<ToolResult>,
    ) -> Result<(), TranscriptError> {
        if self.pending.is_empty() {
            return Err(TranscriptError::OrderMismatch(
                "no tool calls are pending".to_string(),
            ));
        }
        if results.len() != self.pending.len() {
            return Err(TranscriptError::OrderMismatch(format!(
                "expected {} results, got {}",
                self.pending.len(),
                results.len()
            )));
        }
        for (request, result) in self.pending.iter().zip(&results) {
            if request.id != result.call_id || request.name != result.name {
                return Err(TranscriptError::OrderMismatch(format!(
                    "result for '{}' (call {}) does not answer request '{}' (call {})",
                    result.name, result.call_id, request.name, request.id
                )));
            }
        }

        self.pending.clear();
        self.turns.push(Turn::Tool { results });
        Ok(())
    }

    /// Read-only snapshot for submission to the model.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Requests from the latest model turn still awaiting results.
    pub fn pending_calls(&self) -> &[ToolCallRequest] {
        &self.pending
    }
}
