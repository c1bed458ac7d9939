//! Reagent Configuration
//!
//! Loads the agent's configuration from the environment, merging missing
//! values with defaults.

use std::env;

use anyhow::{Context, Result};

use crate::agent::agent_loop::DEFAULT_MAX_ITERATIONS;

/// Default Gemini REST endpoint.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_iterations: u32,
}

/// Load the agent config from the environment.
///
/// `GEMINI_API_KEY` is required; `GEMINI_API_URL`, `REAGENT_MODEL`, and
/// `REAGENT_MAX_ITERATIONS` fall back to defaults when unset or invalid.
pub fn load_config() -> Result<AgentConfig> {
    let api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;

    Ok(AgentConfig {
        api_url: env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        api_key,
        model: env::var("REAGENT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        max_iterations: parse_max_iterations(env::var("REAGENT_MAX_ITERATIONS").ok()),
    })
}

/// Parse the iteration budget override. Zero, negative, and non-numeric
/// values fall back to the default.
fn parse_max_iterations(raw: Option<String>) -> u32 {
    raw.and_then(|v| v.parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MAX_ITERATIONS)
}
