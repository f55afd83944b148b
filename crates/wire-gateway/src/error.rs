//! Gateway error taxonomy
//!
//! Codec and dispatcher errors are local and non-fatal; only the session
//! controller decides when an error terminates the connection.

use thiserror::Error;

use crate::protocol::{CloseCode, OpCode};
use crate::session::SessionState;

/// Malformed frame. The frame is dropped; the session continues.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Structurally invalid JSON
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Envelope parsed but carries an opcode this client does not know
    #[error("unknown opcode: {0}")]
    UnknownOpcode(u8),
}

/// Known event tag whose payload no longer matches the expected shape
/// (schema drift). Logged and surfaced as an unknown event; never fatal.
#[derive(Debug, Error)]
#[error("schema mismatch for event {event_type}: {source}")]
pub struct SchemaError {
    pub event_type: String,
    #[source]
    pub source: serde_json::Error,
}

/// Transport-level failure, classified by the controller before retrying
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to establish connection: {0}")]
    ConnectFailed(String),

    #[error("connection closed (code {code:?})")]
    Closed { code: Option<u16> },

    #[error("transport I/O error: {0}")]
    Io(String),
}

/// Session-terminating errors surfaced to the caller
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Unexpected opcode for the current state; the controller forces a
    /// reconnect when it raises this internally
    #[error("protocol violation: unexpected {opcode} in state {state:?}")]
    Protocol { opcode: OpCode, state: SessionState },

    /// Identify/resume rejected for credentials or intents; terminal
    #[error("authentication rejected: {close_code}")]
    Auth { close_code: CloseCode },

    /// Fatal close without an auth-specific code
    #[error("connection closed fatally: {close_code}")]
    FatalClose { close_code: CloseCode },

    /// Transport failed and the backoff policy's retry bound was exhausted
    #[error("reconnect attempts exhausted after {attempts} tries")]
    ReconnectExhausted {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl GatewayError {
    /// Terminal errors are surfaced once and never retried
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Auth { .. } | Self::FatalClose { .. } | Self::ReconnectExhausted { .. }
        )
    }
}
