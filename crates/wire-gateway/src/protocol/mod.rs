//! Wire protocol layer
//!
//! Envelope framing, operation codes, close codes, and control payloads.

mod close_codes;
mod envelope;
mod opcodes;
mod payloads;

pub use close_codes::{CloseAction, CloseCode};
pub use envelope::Envelope;
pub use opcodes::OpCode;
pub use payloads::{Hello, Identify, IdentifyProperties, Ready, Resume, Resumed, StatusUpdate};
