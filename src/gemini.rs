//! Gemini Model Client
//!
//! Wraps the Gemini `generateContent` REST endpoint. Encodes the transcript
//! into `contents`, advertises the tool catalog as function declarations,
//! and decodes the first candidate into a model response.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::types::{
    ModelClient, ModelResponse, TokenUsage, ToolCallRequest, ToolSpec, Turn,
};

pub struct GeminiClient {
    api_url: String,
    api_key: String,
    model: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// * `api_url` - Base URL (e.g. `https://generativelanguage.googleapis.com`).
    /// * `api_key` - Value for the `x-goog-api-key` header.
    /// * `model` - Model identifier (e.g. `gemini-2.5-flash`).
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            api_url,
            api_key,
            model,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(
        &self,
        transcript: &[Turn],
        tools: &[ToolSpec],
    ) -> Result<ModelResponse> {
        let body = build_request_body(transcript, tools);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );

        let resp = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gemini error: {}: {}", status.as_u16(), text);
        }

        let data: Value = resp
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let usage = parse_usage(&data);
        debug!(
            "[USAGE] prompt: {}, completion: {}, total: {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );

        parse_response(&data)
    }
}

/// Assemble the `generateContent` request body from the transcript and the
/// tool catalog.
fn build_request_body(transcript: &[Turn], tools: &[ToolSpec]) -> Value {
    let contents: Vec<Value> = transcript.iter().map(format_turn).collect();
    let mut body = json!({ "contents": contents });

    if !tools.is_empty() {
        let declarations: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "parameters": t.schema_json(),
                })
            })
            .collect();
        body["tools"] = json!([{ "functionDeclarations": declarations }]);
    }

    body
}

/// Encode one turn as a Gemini content object. All results from one model
/// turn go into a single tool-role content, one `functionResponse` part per
/// result, in request order.
fn format_turn(turn: &Turn) -> Value {
    let role = json!(turn.role());
    match turn {
        Turn::User { text } => json!({ "role": role, "parts": [{ "text": text }] }),
        Turn::Model { text, calls } => {
            let mut parts: Vec<Value> = Vec::new();
            if !text.is_empty() {
                parts.push(json!({ "text": text }));
            }
            for call in calls {
                parts.push(json!({
                    "functionCall": {
                        "name": call.name,
                        "args": Value::Object(call.arguments.clone()),
                    }
                }));
            }
            json!({ "role": role, "parts": parts })
        }
        Turn::Tool { results } => {
            let parts: Vec<Value> = results
                .iter()
                .map(|r| {
                    json!({
                        "functionResponse": {
                            "name": r.name,
                            "response": Value::Object(r.payload.to_wire()),
                        }
                    })
                })
                .collect();
            json!({ "role": role, "parts": parts })
        }
    }
}

/// Decode the first candidate. Any `functionCall` part makes this a
/// tool-call batch; otherwise the text parts are concatenated into the
/// final answer.
fn parse_response(data: &Value) -> Result<ModelResponse> {
    let candidate = data["candidates"]
        .get(0)
        .ok_or_else(|| anyhow::anyhow!("No candidate returned from Gemini"))?;

    let empty = Vec::new();
    let parts = candidate["content"]["parts"].as_array().unwrap_or(&empty);

    let mut calls: Vec<ToolCallRequest> = Vec::new();
    let mut text = String::new();

    for part in parts {
        if let Some(fc) = part.get("functionCall") {
            // Gemini does not always assign call ids; synthesize one so
            // results stay matchable to their requests.
            let id = fc["id"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("fc_{}", Uuid::new_v4()));
            calls.push(ToolCallRequest {
                id,
                name: fc["name"].as_str().unwrap_or("").to_string(),
                arguments: fc["args"].as_object().cloned().unwrap_or_default(),
            });
        } else if let Some(t) = part["text"].as_str() {
            text.push_str(t);
        }
    }

    if calls.is_empty() {
        Ok(ModelResponse::Text(text))
    } else {
        Ok(ModelResponse::ToolCalls { text, calls })
    }
}

fn parse_usage(data: &Value) -> TokenUsage {
    let usage = &data["usageMetadata"];
    TokenUsage {
        prompt_tokens: usage["promptTokenCount"].as_u64().unwrap_or(0),
        completion_tokens: usage["candidatesTokenCount"].as_u64().unwrap_or(0),
        total_tokens: usage["totalTokenCount"].as_u64().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tools::distance_tool_spec;
    use crate::types::{ToolPayload, ToolResult};
    use serde_json::Map;

    #[test]
    fn test_request_body_shape() {
        let transcript = vec![Turn::User {
            text: "how far?".to_string(),
        }];
        let body = build_request_body(&transcript, &[distance_tool_spec()]);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "how far?");

        let decl = &body["tools"][0]["functionDeclarations"][0];
        assert_eq!(decl["name"], "calculate_distance");
        assert_eq!(decl["parameters"]["type"], "object");
        assert_eq!(
            decl["parameters"]["required"],
            json!(["x1", "y1", "x2", "y2"])
        );
    }

    #[test]
    fn test_no_tools_omits_declarations() {
        let transcript = vec![Turn::User {
            text: "hi".to_string(),
        }];
        let body = build_request_body(&transcript, &[]);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_format_tool_turn_bundles_results() {
        let mut fields = Map::new();
        fields.insert("distance".to_string(), json!(5.0));
        let turn = Turn::Tool {
            results: vec![
                ToolResult {
                    call_id: "c1".to_string(),
                    name: "calculate_distance".to_string(),
                    payload: ToolPayload::Success(fields),
                },
                ToolResult {
                    call_id: "c2".to_string(),
                    name: "calculate_distance".to_string(),
                    payload: ToolPayload::Failure("bad input".to_string()),
                },
            ],
        };

        let content = format_turn(&turn);
        assert_eq!(content["role"], "tool");
        let parts = content["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["functionResponse"]["response"]["distance"], 5.0);
        assert_eq!(parts[1]["functionResponse"]["response"]["error"], "bad input");
    }

    #[test]
    fn test_parse_text_response() {
        let data = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "The distance " }, { "text": "is 5.0." }]
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(
            parse_response(&data).unwrap(),
            ModelResponse::Text("The distance is 5.0.".to_string())
        );
    }

    #[test]
    fn test_parse_function_call_response() {
        let data = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {
                            "name": "calculate_distance",
                            "args": { "x1": 0, "y1": 0, "x2": 3, "y2": 4 }
                        }
                    }]
                }
            }]
        });

        match parse_response(&data).unwrap() {
            ModelResponse::ToolCalls { calls, .. } => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "calculate_distance");
                assert_eq!(calls[0].arguments["x2"], json!(3));
                assert!(!calls[0].id.is_empty());
            }
            ModelResponse::Text(text) => panic!("expected tool calls, got text: {text}"),
        }
    }

    #[test]
    fn test_function_calls_win_over_text() {
        let data = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Let me check." },
                        { "functionCall": { "name": "calculate_distance", "args": {} } }
                    ]
                }
            }]
        });

        match parse_response(&data).unwrap() {
            ModelResponse::ToolCalls { text, calls } => {
                assert_eq!(text, "Let me check.");
                assert_eq!(calls.len(), 1);
            }
            ModelResponse::Text(_) => panic!("expected tool calls"),
        }
    }

    #[test]
    fn test_missing_candidate_is_error() {
        let data = json!({ "candidates": [] });
        assert!(parse_response(&data).is_err());
    }
}
