//! Error Taxonomy
//!
//! Registry and transcript contract violations. Tool execution failures are
//! deliberately not here: they are data, carried in the transcript as
//! failure payloads the model can react to.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool name was registered twice. The first registration stays active.
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),

    /// The model requested a tool name absent from the registry. The loop
    /// recovers by recording the message as a failure payload.
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    /// A user turn is only valid as the first turn of a session.
    #[error("a user turn must be the first turn of a session")]
    UserTurnNotFirst,

    /// Tool results did not match the pending requests 1:1 in order. This is
    /// a loop/state desynchronization and is fatal.
    #[error("tool results do not match pending requests: {0}")]
    OrderMismatch(String),
}
