//! Reagent - Type Definitions
//!
//! Shared types for the ReAct loop: transcript turns, tool call requests
//! and results, tool schemas, and the model client interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// ─── Transcript ──────────────────────────────────────────────────

/// The three turn roles. Any other wire value is rejected at parse time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Tool,
}

/// One entry in the transcript.
///
/// A `Tool` turn must immediately follow the `Model` turn whose calls it
/// answers, with exactly one result per request, in request order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Turn {
    User {
        text: String,
    },
    Model {
        /// Empty when the model only issued tool calls.
        #[serde(default, skip_serializing_if = "String::is_empty")]
        text: String,
        /// Empty for a final answer.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        calls: Vec<ToolCallRequest>,
    },
    Tool {
        results: Vec<ToolResult>,
    },
}

impl Turn {
    pub fn role(&self) -> Role {
        match self {
            Turn::User { .. } => Role::User,
            Turn::Model { .. } => Role::Model,
            Turn::Tool { .. } => Role::Tool,
        }
    }
}

// ─── Tool Calls ──────────────────────────────────────────────────

/// A structured instruction from the model naming a tool and its arguments.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, or synthesized locally when absent.
    pub id: String,
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// What a tool invocation produced: success fields XOR a failure message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ToolPayload {
    Success(Map<String, Value>),
    Failure(String),
}

impl ToolPayload {
    pub fn is_failure(&self) -> bool {
        matches!(self, ToolPayload::Failure(_))
    }

    /// Wire form: the success fields as-is, or a single `error` key.
    pub fn to_wire(&self) -> Map<String, Value> {
        match self {
            ToolPayload::Success(fields) => fields.clone(),
            ToolPayload::Failure(message) => {
                let mut fields = Map::new();
                fields.insert("error".to_string(), Value::String(message.clone()));
                fields
            }
        }
    }
}

/// The outcome of one tool call. `(call_id, name)` is the back-reference
/// to the originating request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub call_id: String,
    pub name: String,
    pub payload: ToolPayload,
}

// ─── Tool Schemas ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
}

/// Static declaration of a tool, registered before the loop starts and
/// never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
}

impl ToolSpec {
    /// The JSON-schema object form advertised to the model.
    pub fn schema_json(&self) -> Value {
        let mut properties = Map::new();
        let mut required: Vec<Value> = Vec::new();

        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.param_type.as_str(),
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

// ─── Model Interface ─────────────────────────────────────────────

/// What the model decided: a final answer or a batch of tool calls.
/// Never both -- any text accompanying a tool-call batch rides along on
/// the model turn but does not end the session.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelResponse {
    Text(String),
    ToolCalls {
        text: String,
        calls: Vec<ToolCallRequest>,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// The model provider as seen by the loop. Transport, auth, and retry
/// concerns live behind this boundary.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(
        &self,
        transcript: &[Turn],
        tools: &[ToolSpec],
    ) -> anyhow::Result<ModelResponse>;
}
