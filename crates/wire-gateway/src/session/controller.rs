//! Session controller
//!
//! Owns the identify-vs-resume decision, sequence tracking, and reconnect
//! policy. One controller drives one logical session as a single task:
//! inbound frames and heartbeat ticks are serialized onto one sequence of
//! state transitions, and every outbound frame leaves through the same
//! writer, so no finer-grained locking exists anywhere in the session.

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, Instant};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, TransportError};
use crate::events::{self, Event, EventType};
use crate::protocol::{CloseAction, CloseCode, Envelope, Hello, OpCode};

use super::backoff::Backoff;
use super::heartbeat::{Beat, HeartbeatGovernor};
use super::state::{Session, SessionHandle, SessionState};
use super::transport::{Connect, Transport, TransportEvent};

/// Buffered events between the controller task and its consumer
const EVENT_BUFFER: usize = 256;

/// Why a connection attempt ended
enum Outcome {
    /// Recoverable; reconnect, resuming the session if `resume` and one exists
    Reconnect { resume: bool, cause: TransportError },
    /// Terminal; surface and stop
    Fatal(GatewayError),
    /// The event receiver is gone; the client is shutting down
    Shutdown,
}

/// Drives one gateway session over transports produced by a [`Connect`]
pub struct SessionController<C: Connect> {
    connector: C,
    config: GatewayConfig,
    events: mpsc::Sender<Event>,
    handle: SessionHandle,
    state: SessionState,
    session: Option<Session>,
    /// Whether the next connection attempt should try to resume
    resume_next: bool,
    /// Consecutive resume attempts since the last successful attach
    resume_attempts: u32,
    backoff: Backoff,
}

impl<C: Connect> SessionController<C> {
    /// Create a controller and the receiving end of its event stream
    pub fn new(config: GatewayConfig, connector: C) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let backoff = Backoff::new(config.reconnect.base, config.reconnect.max);
        let controller = Self {
            connector,
            config,
            events: tx,
            handle: SessionHandle::default(),
            state: SessionState::Disconnected,
            session: None,
            resume_next: false,
            resume_attempts: 0,
            backoff,
        };
        (controller, rx)
    }

    /// Read-only view of the session for the rest of the client
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Run the session to completion
    ///
    /// Returns `Ok(())` when the event receiver is dropped (orderly client
    /// shutdown) and `Err` on a terminal protocol or transport failure.
    /// Transient failures are retried silently under the backoff policy.
    pub async fn run(mut self) -> Result<(), GatewayError> {
        loop {
            self.set_state(SessionState::Connecting);

            let transport = match self.connector.connect().await {
                Ok(t) => t,
                Err(e) => {
                    if self.backoff.attempts() + 1 >= self.config.reconnect.max_attempts {
                        self.close_terminal();
                        return Err(GatewayError::ReconnectExhausted {
                            attempts: self.backoff.attempts() + 1,
                            source: e,
                        });
                    }
                    let delay = self.backoff.next_delay();
                    tracing::warn!(error = %e, delay_ms = delay.as_millis() as u64, "connect failed, backing off");
                    sleep(delay).await;
                    continue;
                }
            };

            match self.run_connection(transport).await {
                Outcome::Shutdown => {
                    tracing::debug!("event receiver dropped, shutting session down");
                    self.close_terminal();
                    return Ok(());
                }
                Outcome::Fatal(err) => {
                    tracing::error!(error = %err, "terminal gateway failure");
                    self.close_terminal();
                    return Err(err);
                }
                Outcome::Reconnect { resume, cause } => {
                    self.resume_next = resume && self.session.is_some();
                    if !self.resume_next {
                        self.drop_session();
                    }

                    if self.backoff.attempts() + 1 >= self.config.reconnect.max_attempts {
                        self.close_terminal();
                        return Err(GatewayError::ReconnectExhausted {
                            attempts: self.backoff.attempts() + 1,
                            source: cause,
                        });
                    }
                    let delay = self.backoff.next_delay();
                    tracing::info!(
                        resume = self.resume_next,
                        delay_ms = delay.as_millis() as u64,
                        "reconnecting"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// Drive a single connection until it ends
    ///
    /// The old transport is abandoned (dropped, never awaited) the moment an
    /// outcome is returned; its heartbeat timer dies with this stack frame.
    async fn run_connection(&mut self, mut transport: C::Transport) -> Outcome {
        // The first inbound frame must be the hello handshake.
        let hello = match transport.next().await {
            Some(TransportEvent::Frame(bytes)) => match Envelope::decode(&bytes) {
                Ok(env) if env.op == OpCode::Hello => {
                    match serde_json::from_value::<Hello>(env.d.unwrap_or(Value::Null)) {
                        Ok(hello) => hello,
                        Err(e) => {
                            tracing::warn!(error = %e, "hello payload did not decode, reconnecting");
                            return Outcome::Reconnect {
                                resume: true,
                                cause: TransportError::Io(format!("bad hello payload: {e}")),
                            };
                        }
                    }
                }
                Ok(env) => {
                    tracing::warn!(opcode = %env.op, state = %self.state, "expected hello, forcing reconnect");
                    return Outcome::Reconnect {
                        resume: true,
                        cause: TransportError::Io(format!("expected hello, got {}", env.op)),
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "malformed handshake frame, reconnecting");
                    return Outcome::Reconnect {
                        resume: true,
                        cause: TransportError::Io(format!("malformed handshake: {e}")),
                    };
                }
            },
            Some(TransportEvent::Closed(code)) => return self.on_close(code),
            None => return self.on_close(None),
        };

        let mut governor = HeartbeatGovernor::new(hello.heartbeat_interval);
        tracing::debug!(interval_ms = hello.heartbeat_interval, "hello received");

        // Identify or resume. Resume is attempted only for a remembered
        // session whose close was resume-safe, and only a bounded number of
        // times before escalating to a fresh identify.
        let resuming = if self.resume_next && self.session.is_some() {
            if self.resume_attempts >= self.config.max_resume_attempts {
                tracing::warn!(
                    attempts = self.resume_attempts,
                    "resume attempts exhausted, escalating to identify"
                );
                self.drop_session();
                false
            } else {
                self.resume_attempts += 1;
                true
            }
        } else {
            false
        };

        let frame = match self.session.as_ref().filter(|_| resuming) {
            Some(session) => {
                tracing::info!(session_id = %session.id, seq = session.last_sequence, "resuming session");
                let resume = self.config.resume(session);
                self.set_state(SessionState::Resuming);
                Envelope::resume(&resume)
            }
            None => {
                tracing::info!(shard = ?self.config.shard, "identifying");
                self.set_state(SessionState::Identifying);
                Envelope::identify(&self.config.identify())
            }
        };
        if let Err(e) = send_envelope(&mut transport, &frame).await {
            return self.on_send_failure(e);
        }

        // First beat is jittered into [0, interval) so rejoining clients do
        // not heartbeat in lockstep.
        let mut ticker = interval_at(
            Instant::now() + governor.initial_delay(),
            governor.interval(),
        );

        loop {
            tokio::select! {
                event = transport.next() => match event {
                    Some(TransportEvent::Frame(bytes)) => {
                        if let Some(outcome) = self.on_frame(&mut transport, &mut governor, &bytes).await {
                            return outcome;
                        }
                    }
                    Some(TransportEvent::Closed(code)) => return self.on_close(code),
                    None => return self.on_close(None),
                },
                _ = ticker.tick() => {
                    let last_seq = self.session.as_ref().map(|s| s.last_sequence);
                    match governor.tick(last_seq) {
                        Beat::Send(seq) => {
                            tracing::trace!(seq = ?seq, "sending heartbeat");
                            if let Err(e) = send_envelope(&mut transport, &Envelope::heartbeat(seq)).await {
                                return self.on_send_failure(e);
                            }
                        }
                        Beat::Zombie => {
                            tracing::warn!("heartbeat ack missed, connection is zombied");
                            return Outcome::Reconnect {
                                resume: true,
                                cause: TransportError::Io("zombie connection".to_string()),
                            };
                        }
                    }
                }
            }
        }
    }

    /// Handle one inbound envelope; `Some` ends the connection
    async fn on_frame(
        &mut self,
        transport: &mut C::Transport,
        governor: &mut HeartbeatGovernor,
        bytes: &[u8],
    ) -> Option<Outcome> {
        let envelope = match Envelope::decode(bytes) {
            Ok(env) => env,
            Err(e) => {
                // Malformed frames are dropped; the session continues.
                tracing::warn!(error = %e, "dropping malformed frame");
                return None;
            }
        };

        match envelope.op {
            OpCode::Dispatch => self.on_dispatch(governor, envelope).await,
            OpCode::HeartbeatAck => {
                governor.acknowledge();
                tracing::trace!(latency = ?governor.latency(), "heartbeat acknowledged");
                None
            }
            OpCode::Heartbeat => {
                // Server asked for an immediate beat, outside the governor's
                // own schedule.
                let seq = self.session.as_ref().map(|s| s.last_sequence);
                if let Err(e) = send_envelope(transport, &Envelope::heartbeat(seq)).await {
                    return Some(self.on_send_failure(e));
                }
                None
            }
            OpCode::Reconnect => {
                tracing::info!("server requested reconnect");
                Some(Outcome::Reconnect {
                    resume: true,
                    cause: TransportError::Closed { code: None },
                })
            }
            OpCode::InvalidSession => {
                // d carries whether the session is still resumable; when it
                // is not, the next attempt starts over with a fresh identify.
                let resumable = envelope.invalid_session_resumable();
                tracing::warn!(resumable, "session invalidated by server");
                Some(Outcome::Reconnect {
                    resume: resumable,
                    cause: TransportError::Closed { code: None },
                })
            }
            // A second hello, or a client-only opcode reflected back, is a
            // protocol violation: force a reconnect.
            op => {
                let violation = GatewayError::Protocol {
                    opcode: op,
                    state: self.state,
                };
                tracing::warn!(error = %violation, "protocol violation, forcing reconnect");
                Some(Outcome::Reconnect {
                    resume: true,
                    cause: TransportError::Io(violation.to_string()),
                })
            }
        }
    }

    /// Handle a dispatch frame; `Some` ends the connection
    async fn on_dispatch(
        &mut self,
        governor: &mut HeartbeatGovernor,
        envelope: Envelope,
    ) -> Option<Outcome> {
        let tag = envelope.t.unwrap_or_default();
        let data = envelope.d.unwrap_or(Value::Null);

        // Sequence bookkeeping happens before the payload is even decoded;
        // resume continuity must survive payloads this client cannot parse.
        if let Some(seq) = envelope.s {
            if let Some(session) = self.session.as_mut() {
                session.observe_sequence(seq);
                self.handle.set_sequence(seq);
            }
        }

        let event = match events::dispatch(&tag, data.clone()) {
            Ok(event) => event,
            Err(e) => {
                // Schema drift on a known tag: report, surface the raw
                // payload, keep the session alive.
                tracing::warn!(error = %e, event_type = %tag, "event payload did not match expected shape");
                Event::Unknown {
                    event_type: tag.clone(),
                    data,
                }
            }
        };

        match &event {
            Event::Ready(ready) => {
                let mut session = Session::new(ready.session_id.clone(), governor.interval().as_millis() as u64);
                if let Some(seq) = envelope.s {
                    session.observe_sequence(seq);
                }
                tracing::info!(session_id = %session.id, "session established");
                self.handle.set_session(Some(session.clone()));
                self.session = Some(session);
                self.set_state(SessionState::Ready);
                self.on_attached();
            }
            Event::Resumed(_) => {
                if let Some(session) = &self.session {
                    tracing::info!(session_id = %session.id, seq = session.last_sequence, "session resumed");
                }
                self.set_state(SessionState::Ready);
                self.on_attached();
            }
            _ => {
                if EventType::parse(&tag).is_none() {
                    tracing::debug!(event_type = %tag, "unknown event type, passing through");
                }
            }
        }

        if self.events.send(event).await.is_err() {
            return Some(Outcome::Shutdown);
        }
        None
    }

    /// A connection attached successfully; retry budgets start over
    fn on_attached(&mut self) {
        self.backoff.reset();
        self.resume_attempts = 0;
        self.resume_next = true;
    }

    /// Classify a transport close into an outcome
    fn on_close(&mut self, code: Option<u16>) -> Outcome {
        match CloseCode::classify(code) {
            CloseAction::Fatal => {
                // classify only returns Fatal for recognized codes
                let close_code = code
                    .and_then(CloseCode::from_u16)
                    .unwrap_or(CloseCode::UnknownError);
                tracing::error!(close_code = %close_code, "fatal close");
                let err = match close_code {
                    CloseCode::AuthenticationFailed
                    | CloseCode::InvalidIntents
                    | CloseCode::DisallowedIntents => GatewayError::Auth { close_code },
                    _ => GatewayError::FatalClose { close_code },
                };
                Outcome::Fatal(err)
            }
            CloseAction::Resume => {
                tracing::warn!(code = ?code, "connection dropped, will resume");
                Outcome::Reconnect {
                    resume: true,
                    cause: TransportError::Closed { code },
                }
            }
            CloseAction::Reidentify => {
                tracing::warn!(code = ?code, "connection dropped, session discarded");
                Outcome::Reconnect {
                    resume: false,
                    cause: TransportError::Closed { code },
                }
            }
        }
    }

    fn on_send_failure(&mut self, error: TransportError) -> Outcome {
        tracing::warn!(error = %error, "send failed, reconnecting");
        Outcome::Reconnect {
            resume: true,
            cause: error,
        }
    }

    fn drop_session(&mut self) {
        self.session = None;
        self.resume_attempts = 0;
        self.handle.set_session(None);
    }

    fn close_terminal(&mut self) {
        self.set_state(SessionState::Closing);
        self.drop_session();
        self.set_state(SessionState::Disconnected);
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "session state change");
        self.state = next;
        self.handle.set_state(next);
    }
}

async fn send_envelope<T: Transport>(
    transport: &mut T,
    envelope: &Envelope,
) -> Result<(), TransportError> {
    let bytes = envelope
        .encode()
        .map_err(|e| TransportError::Io(format!("encode failed: {e}")))?;
    transport.send(bytes).await
}
