//! The Agent Loop
//!
//! The core ReAct loop: ask the model, dispatch whatever tool calls it
//! requested, feed the results back, and repeat until it answers in plain
//! text or the iteration budget runs out.

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::agent::registry::ToolRegistry;
use crate::agent::transcript::Transcript;
use crate::types::{ModelClient, ModelResponse, ToolPayload, ToolResult};

/// Default number of model queries allowed before forced termination.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Returned to the caller when the budget runs out without a final answer.
/// A reported condition, not a crash.
pub const EXHAUSTION_SENTINEL: &str =
    "Error: maximum iterations reached without a final answer.";

/// Where a finished session ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The model produced a final text answer.
    Answer(String),
    /// The iteration budget was exceeded without resolution.
    Exhausted,
}

impl RunOutcome {
    /// The final answer, or the exhaustion sentinel.
    pub fn into_text(self) -> String {
        match self {
            RunOutcome::Answer(text) => text,
            RunOutcome::Exhausted => EXHAUSTION_SENTINEL.to_string(),
        }
    }
}

/// Loop phases. `Done` and `Exhausted` are terminal.
enum LoopState {
    AwaitingModel,
    DispatchingTools,
    Done(String),
    Exhausted,
}

/// Drives one or more sessions against a model client and a tool registry.
/// Holds no mutable state of its own, so independent sessions need no
/// coordination.
pub struct AgentLoop<'a> {
    model: &'a dyn ModelClient,
    registry: &'a ToolRegistry,
    max_iterations: u32,
}

impl<'a> AgentLoop<'a> {
    pub fn new(model: &'a dyn ModelClient, registry: &'a ToolRegistry) -> Self {
        Self {
            model,
            registry,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Run one session to completion. The transcript lives and dies with
    /// this call. Model transport failures and transcript contract
    /// violations propagate; tool failures do not.
    pub async fn run(&self, query: &str) -> Result<RunOutcome> {
        let catalog = self.registry.schemas();
        let mut transcript = Transcript::new();
        transcript.append_user(query)?;

        let mut iteration: u32 = 0;
        let mut state = LoopState::AwaitingModel;

        loop {
            state = match state {
                LoopState::AwaitingModel => {
                    iteration += 1;
                    info!("[THINK] iteration {}/{}", iteration, self.max_iterations);

                    let response = self.model.generate(transcript.turns(), &catalog).await?;
                    match response {
                        ModelResponse::Text(text) => {
                            info!("[DONE] final answer at iteration {}", iteration);
                            transcript.append_model(ModelResponse::Text(text.clone()));
                            LoopState::Done(text)
                        }
                        batch @ ModelResponse::ToolCalls { .. } => {
                            transcript.append_model(batch);
                            LoopState::DispatchingTools
                        }
                    }
                }

                LoopState::DispatchingTools => {
                    let requests = transcript.pending_calls().to_vec();
                    let mut results = Vec::with_capacity(requests.len());

                    for request in &requests {
                        let args_preview =
                            preview(&Value::Object(request.arguments.clone()).to_string(), 100);
                        info!("[TOOL] {}({})", request.name, args_preview);

                        // Unknown tools become failure payloads the model
                        // can react to, same as implementation errors.
                        let payload = match self.registry.invoke(&request.name, &request.arguments)
                        {
                            Ok(payload) => payload,
                            Err(err) => ToolPayload::Failure(err.to_string()),
                        };

                        match &payload {
                            ToolPayload::Success(fields) => info!(
                                "[TOOL RESULT] {}: {}",
                                request.name,
                                preview(&serde_json::Value::Object(fields.clone()).to_string(), 200)
                            ),
                            ToolPayload::Failure(message) => {
                                info!("[TOOL RESULT] {}: ERROR: {}", request.name, message)
                            }
                        }

                        results.push(ToolResult {
                            call_id: request.id.clone(),
                            name: request.name.clone(),
                            payload,
                        });
                    }

                    transcript.append_tool_results(results)?;

                    if iteration >= self.max_iterations {
                        warn!(
                            "[BUDGET] iteration budget exhausted after {} model queries",
                            iteration
                        );
                        LoopState::Exhausted
                    } else {
                        LoopState::AwaitingModel
                    }
                }

                LoopState::Done(text) => return Ok(RunOutcome::Answer(text)),
                LoopState::Exhausted => return Ok(RunOutcome::Exhausted),
            };
        }
    }
}

/// Truncate a log preview at a char boundary.
fn preview(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
