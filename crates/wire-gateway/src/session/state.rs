//! Session state and the lifecycle state machine

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a gateway session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionState {
    /// No transport; nothing in flight
    #[default]
    Disconnected,
    /// Transport dialing, waiting for the hello frame
    Connecting,
    /// Identify sent, waiting for READY
    Identifying,
    /// Session established; heartbeats and dispatches flowing
    Ready,
    /// Resume sent, waiting for RESUMED (or an invalid-session rejection)
    Resuming,
    /// Terminal close in progress; no further reconnects
    Closing,
}

impl SessionState {
    /// Check whether a transition to `next` is legal
    #[must_use]
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::{Closing, Connecting, Disconnected, Identifying, Ready, Resuming};
        match (self, next) {
            // any state may begin terminal close or drop back to disconnected
            (_, Closing) | (Closing, Disconnected) => true,
            (Disconnected, Connecting) => true,
            // a dropped connection re-dials from any live phase
            (Connecting | Identifying | Ready | Resuming, Connecting) => true,
            (Connecting, Identifying | Resuming) => true,
            (Identifying | Resuming, Ready) => true,
            // rejected resume falls back to a fresh identify
            (Resuming, Identifying) => true,
            _ => false,
        }
    }

    /// States in which the transport is expected to be open
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Identifying | Self::Ready | Self::Resuming)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Identifying => "Identifying",
            Self::Ready => "Ready",
            Self::Resuming => "Resuming",
            Self::Closing => "Closing",
        };
        write!(f, "{name}")
    }
}

/// One live session's bookkeeping
///
/// Created on READY, mutated only by the controller task (sequence on every
/// dispatch), and discarded on terminal close. There is deliberately no
/// process-wide session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Server-issued session ID, presented back on resume
    pub id: String,
    /// Highest dispatch sequence seen; resume continuity only, never reordering
    pub last_sequence: u64,
    /// Heartbeat interval in milliseconds, from the hello frame
    pub heartbeat_interval_ms: u64,
}

impl Session {
    /// Create the session established by a READY dispatch
    #[must_use]
    pub fn new(id: impl Into<String>, heartbeat_interval_ms: u64) -> Self {
        Self {
            id: id.into(),
            last_sequence: 0,
            heartbeat_interval_ms,
        }
    }

    /// Record a dispatch sequence; never moves backwards
    pub fn observe_sequence(&mut self, seq: u64) {
        self.last_sequence = self.last_sequence.max(seq);
    }
}

/// Read-only view of the controller's session, shared with the rest of the
/// client. All writes happen inside the controller task (single writer).
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionSnapshot>>,
}

#[derive(Debug, Clone, Default)]
struct SessionSnapshot {
    state: SessionState,
    session: Option<Session>,
}

impl SessionHandle {
    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.read().state
    }

    /// Session ID, if a session is established
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.inner.read().session.as_ref().map(|s| s.id.clone())
    }

    /// Last observed dispatch sequence
    #[must_use]
    pub fn last_sequence(&self) -> Option<u64> {
        self.inner.read().session.as_ref().map(|s| s.last_sequence)
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        self.inner.write().state = state;
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        self.inner.write().session = session;
    }

    pub(crate) fn set_sequence(&self, seq: u64) {
        if let Some(session) = self.inner.write().session.as_mut() {
            session.observe_sequence(seq);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(SessionState::Disconnected.can_transition_to(SessionState::Connecting));
        assert!(SessionState::Connecting.can_transition_to(SessionState::Identifying));
        assert!(SessionState::Identifying.can_transition_to(SessionState::Ready));
        assert!(SessionState::Ready.can_transition_to(SessionState::Connecting));
        assert!(SessionState::Connecting.can_transition_to(SessionState::Resuming));
        assert!(SessionState::Resuming.can_transition_to(SessionState::Ready));
    }

    #[test]
    fn test_resume_rejection_falls_back_to_identify() {
        assert!(SessionState::Resuming.can_transition_to(SessionState::Identifying));
    }

    #[test]
    fn test_closing_is_reachable_from_anywhere_and_terminal() {
        for state in [
            SessionState::Disconnected,
            SessionState::Connecting,
            SessionState::Identifying,
            SessionState::Ready,
            SessionState::Resuming,
        ] {
            assert!(state.can_transition_to(SessionState::Closing));
        }
        assert!(!SessionState::Closing.can_transition_to(SessionState::Connecting));
        assert!(!SessionState::Closing.can_transition_to(SessionState::Ready));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!SessionState::Disconnected.can_transition_to(SessionState::Ready));
        assert!(!SessionState::Identifying.can_transition_to(SessionState::Resuming));
        assert!(!SessionState::Ready.can_transition_to(SessionState::Identifying));
    }

    #[test]
    fn test_sequence_never_decreases() {
        let mut session = Session::new("abc", 45_000);
        session.observe_sequence(5);
        session.observe_sequence(9);
        session.observe_sequence(7); // late frame must not move the cursor back
        assert_eq!(session.last_sequence, 9);
    }

    #[test]
    fn test_handle_snapshot() {
        let handle = SessionHandle::default();
        assert_eq!(handle.state(), SessionState::Disconnected);
        assert!(handle.session_id().is_none());

        handle.set_state(SessionState::Ready);
        handle.set_session(Some(Session::new("abc", 45_000)));
        handle.set_sequence(42);

        assert_eq!(handle.state(), SessionState::Ready);
        assert_eq!(handle.session_id().as_deref(), Some("abc"));
        assert_eq!(handle.last_sequence(), Some(42));
    }
}
