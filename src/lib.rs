//! Reagent -- ReAct Agent Loop
//!
//! A single-agent Reason-and-Act loop: the model alternates between
//! requesting local tool calls and producing a final answer, with the
//! transcript carried across iterations.

pub mod agent;
pub mod config;
pub mod error;
pub mod gemini;
pub mod types;
