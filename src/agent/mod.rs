//! Agent Module
//!
//! The core ReAct machinery: the tool registry, the conversation transcript,
//! the loop that drives them, and the built-in tools.

pub mod agent_loop;
pub mod registry;
pub mod tools;
pub mod transcript;
