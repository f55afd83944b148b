//! Session lifecycle
//!
//! The state machine a correct client runs: connect, identify or resume,
//! heartbeat loop, event dispatch, reconnect with backoff.

mod backoff;
mod controller;
mod heartbeat;
mod state;
mod transport;

pub use backoff::Backoff;
pub use controller::SessionController;
pub use heartbeat::{Beat, HeartbeatGovernor};
pub use state::{Session, SessionHandle, SessionState};
pub use transport::{Connect, Transport, TransportEvent};
