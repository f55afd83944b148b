//! Session lifecycle integration tests
//!
//! Each test scripts one or more connections and drives the controller under
//! tokio's paused clock, so heartbeat intervals and reconnect backoff run
//! instantly and deterministically.
//!
//! Run with: cargo test -p integration-tests --test session_tests

use std::time::Duration;

use integration_tests::{
    dispatch_frame, hello_frame, invalid_session_frame, ready_frame, reconnect_frame,
    resumed_frame, ScriptedConnect, ScriptedTransport,
};
use serde_json::json;
use wire_gateway::{
    BackoffConfig, Event, GatewayConfig, GatewayError, OpCode, SessionController, SessionState,
};

fn test_config() -> GatewayConfig {
    GatewayConfig::new("test-token").with_reconnect(BackoffConfig {
        base: Duration::from_millis(10),
        max: Duration::from_millis(100),
        max_attempts: 10,
    })
}

// ============================================================================
// Handshake and identify
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_identify_then_ready_establishes_session() {
    let transport = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("abc", 1))
        .auto_ack();
    let sent = transport.sent();
    let connect = ScriptedConnect::new(vec![transport]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    let handle = controller.handle();
    tokio::spawn(controller.run());

    let event = events.recv().await.expect("event stream ended early");
    assert!(matches!(event, Event::Ready(_)));
    assert_eq!(handle.state(), SessionState::Ready);
    assert_eq!(handle.session_id().as_deref(), Some("abc"));
    assert_eq!(handle.last_sequence(), Some(1));

    let sent = sent.lock();
    assert_eq!(sent[0].op, OpCode::Identify);
    let identify = sent[0].d.as_ref().expect("identify carries a payload");
    assert_eq!(identify["token"], "test-token");
    assert_eq!(connect.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_non_hello_handshake_forces_reconnect() {
    // first connection violates the handshake; second behaves
    let bad = ScriptedTransport::new().frame(ready_frame("abc", 1));
    let good = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("abc", 1))
        .auto_ack();
    let connect = ScriptedConnect::new(vec![bad, good]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));
    assert_eq!(connect.attempts(), 2);
}

// ============================================================================
// Dispatch and sequence tracking
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_dispatch_stream_and_sequence_tracking() {
    let transport = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("abc", 1))
        .frame(dispatch_frame(
            "MESSAGE_CREATE",
            2,
            json!({"id": "10", "channel_id": "20", "content": "hi"}),
        ))
        // unrecognized opcode: the frame is dropped, the session survives
        .frame(br#"{"op":6,"d":null}"#.to_vec())
        // tag from the future: delivered as an unknown event
        .frame(dispatch_frame("SOME_FUTURE_EVENT", 3, json!({"x": 1})))
        // known tag, wrong shape: schema drift, still delivered raw
        .frame(dispatch_frame("MESSAGE_CREATE", 4, json!("not a message")))
        .auto_ack();
    let connect = ScriptedConnect::new(vec![transport]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    let handle = controller.handle();
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));

    match events.recv().await {
        Some(Event::MessageCreate(message)) => assert_eq!(message.content, "hi"),
        other => panic!("expected MessageCreate, got {other:?}"),
    }

    match events.recv().await {
        Some(Event::Unknown { event_type, .. }) => assert_eq!(event_type, "SOME_FUTURE_EVENT"),
        other => panic!("expected Unknown, got {other:?}"),
    }

    match events.recv().await {
        Some(Event::Unknown { event_type, data }) => {
            assert_eq!(event_type, "MESSAGE_CREATE");
            assert_eq!(data, json!("not a message"));
        }
        other => panic!("expected Unknown fallback, got {other:?}"),
    }

    // sequence advanced on every dispatch, including the undecodable one
    assert_eq!(handle.last_sequence(), Some(4));
    assert_eq!(connect.attempts(), 1);
}

// ============================================================================
// Heartbeat
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_heartbeats_carry_sequence_and_acks_prevent_zombie() {
    let transport = ScriptedTransport::new()
        .frame(hello_frame(100))
        .frame(ready_frame("abc", 7))
        .auto_ack();
    let sent = transport.sent();
    let connect = ScriptedConnect::new(vec![transport]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));
    tokio::time::sleep(Duration::from_millis(1000)).await;

    let beats: Vec<_> = sent
        .lock()
        .iter()
        .filter(|e| e.op == OpCode::Heartbeat)
        .cloned()
        .collect();
    assert!(beats.len() >= 5, "expected a steady beat, got {}", beats.len());
    assert_eq!(beats[0].d, Some(json!(7)));

    // every beat was acked, so the connection never zombied out
    assert_eq!(connect.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_zombie_connection_triggers_resume() {
    // first connection never acks its heartbeats
    let first = ScriptedTransport::new()
        .frame(hello_frame(50))
        .frame(ready_frame("abc", 5))
        .hold_open();
    let second = ScriptedTransport::new()
        .frame(hello_frame(50))
        .frame(resumed_frame(6))
        .auto_ack();
    let second_sent = second.sent();
    let connect = ScriptedConnect::new(vec![first, second]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    let handle = controller.handle();
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));
    assert!(matches!(events.recv().await, Some(Event::Resumed(_))));

    let sent = second_sent.lock();
    assert_eq!(sent[0].op, OpCode::Resume);
    let resume = sent[0].d.as_ref().expect("resume carries a payload");
    assert_eq!(resume["session_id"], "abc");
    assert_eq!(resume["seq"], 5);

    assert_eq!(connect.attempts(), 2);
    assert_eq!(handle.state(), SessionState::Ready);
}

// ============================================================================
// Close-code policy
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_resumable_close_resumes_with_stored_state() {
    let first = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("abc", 42))
        .close_with(Some(4009)); // session timeout: resume-safe
    let second = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(resumed_frame(43))
        .auto_ack();
    let second_sent = second.sent();
    let connect = ScriptedConnect::new(vec![first, second]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));
    assert!(matches!(events.recv().await, Some(Event::Resumed(_))));

    let sent = second_sent.lock();
    assert_eq!(sent[0].op, OpCode::Resume);
    let resume = sent[0].d.as_ref().expect("resume carries a payload");
    assert_eq!(resume["session_id"], "abc");
    assert_eq!(resume["seq"], 42);
}

#[tokio::test(start_paused = true)]
async fn test_non_resumable_close_reidentifies() {
    let first = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("abc", 42))
        .close_with(Some(4007)); // invalid sequence: the session is gone
    let second = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("def", 1))
        .auto_ack();
    let second_sent = second.sent();
    let connect = ScriptedConnect::new(vec![first, second]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    let handle = controller.handle();
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));
    assert!(matches!(events.recv().await, Some(Event::Ready(_))));

    assert_eq!(second_sent.lock()[0].op, OpCode::Identify);
    assert_eq!(handle.session_id().as_deref(), Some("def"));
}

#[tokio::test(start_paused = true)]
async fn test_fatal_close_surfaces_auth_error_without_retry() {
    let transport = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .close_with(Some(4004));
    let connect = ScriptedConnect::new(vec![transport]);

    let (controller, _events) = SessionController::new(test_config(), connect.clone());
    let handle = controller.handle();

    let err = controller.run().await.expect_err("4004 must be terminal");
    assert!(matches!(err, GatewayError::Auth { .. }));
    assert!(err.is_terminal());
    assert_eq!(connect.attempts(), 1); // zero reconnects after a fatal code
    assert_eq!(handle.state(), SessionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_sharding_required_is_fatal_non_auth() {
    let transport = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .close_with(Some(4011));
    let connect = ScriptedConnect::new(vec![transport]);

    let (controller, _events) = SessionController::new(test_config(), connect.clone());
    let err = controller.run().await.expect_err("4011 must be terminal");
    assert!(matches!(err, GatewayError::FatalClose { .. }));
    assert_eq!(connect.attempts(), 1);
}

// ============================================================================
// Server-driven reconnect and session invalidation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_server_reconnect_request_resumes() {
    let first = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("abc", 3))
        .frame(reconnect_frame());
    let second = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(resumed_frame(4))
        .auto_ack();
    let second_sent = second.sent();
    let connect = ScriptedConnect::new(vec![first, second]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));
    assert!(matches!(events.recv().await, Some(Event::Resumed(_))));
    assert_eq!(second_sent.lock()[0].op, OpCode::Resume);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_session_non_resumable_starts_over() {
    let first = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("abc", 9))
        .frame(invalid_session_frame(false));
    let second = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("xyz", 1))
        .auto_ack();
    let second_sent = second.sent();
    let connect = ScriptedConnect::new(vec![first, second]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    let handle = controller.handle();
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));
    assert!(matches!(events.recv().await, Some(Event::Ready(_))));

    assert_eq!(second_sent.lock()[0].op, OpCode::Identify);
    assert_eq!(handle.session_id().as_deref(), Some("xyz"));
}

// ============================================================================
// Retry budgets
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_resume_attempts_bounded_then_escalate_to_identify() {
    // the server keeps timing the session out; after max_resume_attempts
    // resumes the controller gives up on the session and identifies fresh
    let t1 = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("abc", 1))
        .close_with(Some(4009));
    let rejected = || {
        ScriptedTransport::new()
            .frame(hello_frame(45_000))
            .close_with(Some(4009))
    };
    let t2 = rejected();
    let t3 = rejected();
    let t4 = rejected();
    let t5 = ScriptedTransport::new()
        .frame(hello_frame(45_000))
        .frame(ready_frame("fresh", 1))
        .auto_ack();
    let t2_sent = t2.sent();
    let t5_sent = t5.sent();
    let connect = ScriptedConnect::new(vec![t1, t2, t3, t4, t5]);

    let (controller, mut events) = SessionController::new(test_config(), connect.clone());
    let handle = controller.handle();
    tokio::spawn(controller.run());

    assert!(matches!(events.recv().await, Some(Event::Ready(_))));
    assert!(matches!(events.recv().await, Some(Event::Ready(_))));

    assert_eq!(t2_sent.lock()[0].op, OpCode::Resume);
    assert_eq!(t5_sent.lock()[0].op, OpCode::Identify);
    assert_eq!(connect.attempts(), 5);
    assert_eq!(handle.session_id().as_deref(), Some("fresh"));
}

#[tokio::test(start_paused = true)]
async fn test_connect_failures_exhaust_retry_budget() {
    let connect = ScriptedConnect::new(vec![]);
    let config = GatewayConfig::new("test-token").with_reconnect(BackoffConfig {
        base: Duration::from_millis(10),
        max: Duration::from_millis(50),
        max_attempts: 3,
    });

    let (controller, _events) = SessionController::new(config, connect.clone());
    let err = controller.run().await.expect_err("no server to reach");
    assert!(matches!(
        err,
        GatewayError::ReconnectExhausted { attempts: 3, .. }
    ));
    assert_eq!(connect.attempts(), 3);
}
