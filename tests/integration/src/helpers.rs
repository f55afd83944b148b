//! Test helpers for integration tests
//!
//! A scripted in-memory transport that stands in for a websocket: inbound
//! frames play back from a script, outbound frames are captured for
//! assertions, and heartbeats can be acknowledged automatically. Combined
//! with tokio's paused clock this makes the whole session lifecycle
//! deterministic.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use wire_gateway::{Connect, Envelope, OpCode, Transport, TransportError, TransportEvent};

/// One scripted connection
///
/// Inbound events (frames, closes) are queued up front with the builder
/// methods and handed to the controller in order. Once the script runs dry
/// the connection either hangs open or reports an unannounced drop,
/// depending on [`ScriptedTransport::hold_open`].
pub struct ScriptedTransport {
    incoming: mpsc::UnboundedReceiver<TransportEvent>,
    feeder: mpsc::UnboundedSender<TransportEvent>,
    sent: Arc<Mutex<Vec<Envelope>>>,
    auto_ack: bool,
    hold_open: bool,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        let (feeder, incoming) = mpsc::unbounded_channel();
        Self {
            incoming,
            feeder,
            sent: Arc::new(Mutex::new(Vec::new())),
            auto_ack: false,
            hold_open: false,
        }
    }

    /// Queue an inbound frame
    #[must_use]
    pub fn frame(self, bytes: Vec<u8>) -> Self {
        let _ = self.feeder.send(TransportEvent::Frame(bytes));
        self
    }

    /// Queue a close with the given code
    #[must_use]
    pub fn close_with(self, code: Option<u16>) -> Self {
        let _ = self.feeder.send(TransportEvent::Closed(code));
        self
    }

    /// Answer every outbound heartbeat with an ack frame. Implies the
    /// connection stays open after the script is exhausted.
    #[must_use]
    pub fn auto_ack(mut self) -> Self {
        self.auto_ack = true;
        self
    }

    /// Keep the connection open (pending forever) once the script runs dry,
    /// instead of reporting an unannounced drop
    #[must_use]
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Shared capture of every envelope the controller sent on this
    /// transport, in order. Grab a clone before handing the transport off.
    #[must_use]
    pub fn sent(&self) -> Arc<Mutex<Vec<Envelope>>> {
        Arc::clone(&self.sent)
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        let envelope = Envelope::decode(&frame).map_err(|e| TransportError::Io(e.to_string()))?;
        if self.auto_ack && envelope.op == OpCode::Heartbeat {
            let _ = self.feeder.send(TransportEvent::Frame(heartbeat_ack_frame()));
        }
        self.sent.lock().push(envelope);
        Ok(())
    }

    async fn next(&mut self) -> Option<TransportEvent> {
        if self.hold_open || self.auto_ack {
            // The feeder half is alive, so this pends once the script (and
            // any auto-acks) run dry.
            self.incoming.recv().await
        } else {
            self.incoming.try_recv().ok()
        }
    }

    async fn close(&mut self) {}
}

/// Hands out pre-scripted transports, one per connection attempt
#[derive(Clone)]
pub struct ScriptedConnect {
    inner: Arc<ConnectInner>,
}

struct ConnectInner {
    transports: Mutex<VecDeque<ScriptedTransport>>,
    attempts: AtomicU32,
}

impl ScriptedConnect {
    #[must_use]
    pub fn new(transports: Vec<ScriptedTransport>) -> Self {
        Self {
            inner: Arc::new(ConnectInner {
                transports: Mutex::new(transports.into()),
                attempts: AtomicU32::new(0),
            }),
        }
    }

    /// Number of connection attempts made so far
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.inner.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connect for ScriptedConnect {
    type Transport = ScriptedTransport;

    async fn connect(&self) -> Result<ScriptedTransport, TransportError> {
        self.inner.attempts.fetch_add(1, Ordering::SeqCst);
        self.inner
            .transports
            .lock()
            .pop_front()
            .ok_or_else(|| TransportError::ConnectFailed("no scripted connection left".to_string()))
    }
}

fn encode(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).expect("test frame must encode")
}

/// op 10 handshake frame
#[must_use]
pub fn hello_frame(heartbeat_interval_ms: u64) -> Vec<u8> {
    encode(&json!({"op": 10, "d": {"heartbeat_interval": heartbeat_interval_ms}}))
}

/// op 11 heartbeat acknowledgement frame
#[must_use]
pub fn heartbeat_ack_frame() -> Vec<u8> {
    encode(&json!({"op": 11, "d": null}))
}

/// op 5 server-requested reconnect frame
#[must_use]
pub fn reconnect_frame() -> Vec<u8> {
    encode(&json!({"op": 5, "d": null}))
}

/// op 7 invalid-session frame; `d` says whether a resume may still work
#[must_use]
pub fn invalid_session_frame(resumable: bool) -> Vec<u8> {
    encode(&json!({"op": 7, "d": resumable}))
}

/// Dispatch frame with an arbitrary event tag and payload
#[must_use]
pub fn dispatch_frame(event_type: &str, seq: u64, data: Value) -> Vec<u8> {
    Envelope::dispatch(event_type, seq, data)
        .encode()
        .expect("test frame must encode")
}

/// READY dispatch establishing the given session ID
#[must_use]
pub fn ready_frame(session_id: &str, seq: u64) -> Vec<u8> {
    dispatch_frame("READY", seq, json!({"v": 6, "session_id": session_id}))
}

/// RESUMED dispatch confirming a resume
#[must_use]
pub fn resumed_frame(seq: u64) -> Vec<u8> {
    dispatch_frame("RESUMED", seq, json!({}))
}
