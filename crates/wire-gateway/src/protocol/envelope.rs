//! Envelope framing and the byte-level codec
//!
//! Every gateway message is an `{op, d, s, t}` envelope. The payload `d`
//! stays type-erased here: its concrete shape is only known once `op` (and
//! for dispatches, `t`) has been read, so decoding is two-phase by design.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::opcodes::OpCode;
use super::payloads::{Identify, Resume, StatusUpdate};
use crate::error::FormatError;

/// The outer frame wrapping every gateway message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Operation code
    pub op: OpCode,

    /// Event type (only on op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only on op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Opcode-dependent payload, decoded in a second phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

/// Mirror of [`Envelope`] with a raw integer op, so an unrecognized opcode
/// surfaces as a [`FormatError`] instead of a generic decode failure.
#[derive(Deserialize)]
struct RawEnvelope {
    op: u8,
    #[serde(default)]
    t: Option<String>,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_present")]
    d: Option<Value>,
}

/// Deserialize a present `d` field as `Some`, keeping JSON `null` as
/// `Some(Value::Null)` so round-trips preserve it; a missing field still
/// falls back to `None` via `#[serde(default)]`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Envelope {
    /// Create an Identify frame (op=2)
    #[must_use]
    pub fn identify(payload: &Identify) -> Self {
        Self {
            op: OpCode::Identify,
            t: None,
            s: None,
            d: serde_json::to_value(payload).ok(),
        }
    }

    /// Create a Resume frame (op=4)
    #[must_use]
    pub fn resume(payload: &Resume) -> Self {
        Self {
            op: OpCode::Resume,
            t: None,
            s: None,
            d: serde_json::to_value(payload).ok(),
        }
    }

    /// Create a Heartbeat frame (op=1) carrying the last known sequence
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: Some(last_sequence.map_or(Value::Null, |s| Value::Number(s.into()))),
        }
    }

    /// Create a Status Update frame (op=3)
    #[must_use]
    pub fn status_update(payload: &StatusUpdate) -> Self {
        Self {
            op: OpCode::StatusUpdate,
            t: None,
            s: None,
            d: serde_json::to_value(payload).ok(),
        }
    }

    /// Create a Dispatch frame (op=0); servers send these, tests build them
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    /// Encode the envelope to wire bytes
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        serde_json::to_vec(self).map_err(FormatError::Malformed)
    }

    /// Decode an envelope from wire bytes
    ///
    /// Fails with [`FormatError`] on structurally malformed JSON or an
    /// unrecognized `op`. An unrecognized `t` on a dispatch frame is NOT an
    /// error; the tag is carried through for the dispatcher to handle.
    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        let raw: RawEnvelope = serde_json::from_slice(bytes).map_err(FormatError::Malformed)?;
        let op = OpCode::from_u8(raw.op).ok_or(FormatError::UnknownOpcode(raw.op))?;
        Ok(Self {
            op,
            t: raw.t,
            s: raw.s,
            d: raw.d,
        })
    }

    /// Try to read the heartbeat sequence number (op=1)
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_u64))
    }

    /// Read an Invalid Session payload (op=7): whether the session is resumable
    #[must_use]
    pub fn invalid_session_resumable(&self) -> bool {
        self.op == OpCode::InvalidSession
            && self.d.as_ref().and_then(Value::as_bool).unwrap_or(false)
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "Envelope(op={}, t={t}", self.op)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "Envelope(op={})", self.op)
        }
    }
}
