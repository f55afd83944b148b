//! # wire-gateway
//!
//! The gateway session protocol: envelope codec, opcode and close-code
//! policy, typed event dispatch, and the client state machine a correct
//! session must run (connect, identify or resume, heartbeat loop, event
//! dispatch, reconnect with backoff).
//!
//! Transport I/O stays behind the [`session::Transport`] seam; this crate
//! never opens sockets.

pub mod config;
pub mod error;
pub mod events;
pub mod protocol;
pub mod session;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{BackoffConfig, GatewayConfig};
pub use error::{FormatError, GatewayError, SchemaError, TransportError};
pub use events::{dispatch, Event, EventType};
pub use protocol::{
    CloseAction, CloseCode, Envelope, Hello, Identify, IdentifyProperties, OpCode, Ready, Resume,
    Resumed, StatusUpdate,
};
pub use session::{
    Connect, Session, SessionController, SessionHandle, SessionState, Transport, TransportEvent,
};
