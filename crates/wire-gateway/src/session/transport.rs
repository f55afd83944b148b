//! Transport seam
//!
//! The controller never opens sockets; it drives whatever implements these
//! traits. A websocket adapter lives outside this crate, and the integration
//! tests drive the machine with a scripted in-memory transport.

use async_trait::async_trait;

use crate::error::TransportError;

/// Something the transport produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A complete inbound frame
    Frame(Vec<u8>),
    /// The connection closed, with the close code if one was delivered
    Closed(Option<u16>),
}

/// One live, framed, bidirectional connection
///
/// Sends are serialized by the controller onto this single writer; an
/// implementation does not need its own write locking.
#[async_trait]
pub trait Transport: Send {
    /// Send one frame
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), TransportError>;

    /// Receive the next transport event; `None` means the peer is gone
    /// without a close frame
    async fn next(&mut self) -> Option<TransportEvent>;

    /// Close the connection. Best effort; abandoning a transport without
    /// calling this must also be safe.
    async fn close(&mut self);
}

/// Factory for fresh connections, invoked on every (re)connect attempt
#[async_trait]
pub trait Connect: Send + Sync {
    type Transport: Transport;

    async fn connect(&self) -> Result<Self::Transport, TransportError>;
}
