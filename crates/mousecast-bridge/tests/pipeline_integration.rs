//! Integration tests for the event-to-message pipeline.
//!
//! These exercise the bridge end-to-end: `InputEventRouter` + `PortChannel`
//! + `TransmitGuard` against the recording mock transport, and the full
//! event pump against a mock pointer source.

use std::time::{Duration, Instant};

use mousecast_bridge::application::router::{InputEventRouter, RouterState};
use mousecast_bridge::port::channel::{ChannelError, PortChannel};
use mousecast_bridge::port::mock::MockTransport;
use mousecast_bridge::source::mock::MockPointerSource;
use mousecast_bridge::source::{PointerSource, RawPointerEvent};
use mousecast_core::{Atom, ButtonFraming, ButtonPacing, ButtonState, SurfaceSize};

fn make_router(
    framing: ButtonFraming,
    pacing: ButtonPacing,
    transport: MockTransport,
) -> InputEventRouter {
    let mut channel = PortChannel::new(Box::new(transport), pacing);
    channel.open("/mousecast").expect("open must succeed");
    InputEventRouter::new(channel, SurfaceSize::default(), framing)
}

// ── Ordering ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_canonical_session_emits_messages_in_event_order() {
    let transport = MockTransport::new();
    let tx = transport.clone();
    let mut router = make_router(ButtonFraming::Combined, ButtonPacing::disabled(), transport);

    router.on_press(10, 10).await.unwrap();
    router.on_drag(20, 20).await.unwrap();
    router.on_drag(30, 30).await.unwrap();
    router.on_release(30, 30).await.unwrap();

    let writes = tx.writes();
    assert_eq!(writes.len(), 4, "one message per event under combined framing");
    assert_eq!(writes[0][1].as_str(), Some("down"));
    assert_eq!(writes[1][1].as_float(), Some(20.0 / 640.0));
    assert_eq!(writes[2][1].as_float(), Some(30.0 / 640.0));
    assert_eq!(writes[3][1].as_str(), Some("up"));
}

#[tokio::test]
async fn test_split_framing_emits_message_pair_on_press() {
    let transport = MockTransport::new();
    let tx = transport.clone();
    let mut router = make_router(ButtonFraming::Split, ButtonPacing::disabled(), transport);

    router.on_press(10, 10).await.unwrap();
    router.on_drag(20, 20).await.unwrap();
    router.on_release(20, 20).await.unwrap();

    let writes = tx.writes();
    // press → button + position, drag → position, release → bare button
    assert_eq!(writes.len(), 4);
    assert_eq!(writes[0][1].as_str(), Some("down"));
    assert!(writes[1][1].as_float().is_some());
    assert!(writes[2][1].as_float().is_some());
    assert_eq!(writes[3].len(), 2, "split release carries no position");
}

// ── Mutual exclusion ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_overlapping_writes_under_rapid_drags() {
    // A transport that stays busy 5 ms per write, hammered with drags.
    let transport = MockTransport::with_busy_window(Duration::from_millis(5));
    let tx = transport.clone();
    let mut router = make_router(ButtonFraming::Combined, ButtonPacing::disabled(), transport);

    router.on_press(0, 0).await.unwrap();
    for i in 0..20 {
        router.on_drag(i * 30, i * 20).await.unwrap();
    }
    router.on_release(600, 400).await.unwrap();

    assert_eq!(
        tx.overlap_violations(),
        0,
        "a write must never be issued while a previous write is in flight"
    );
    assert_eq!(tx.writes().len(), 22);
}

// ── Button pacing ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_button_transitions_are_paced_but_positions_are_not() {
    let transport = MockTransport::new();
    let pacing = ButtonPacing {
        min_interval_ms: 25,
    };
    let mut router = make_router(ButtonFraming::Combined, pacing, transport);

    // press → release is a pair of button messages.
    let press_done = {
        router.on_press(10, 10).await.unwrap();
        Instant::now()
    };
    router.on_release(10, 10).await.unwrap();
    let release_done = Instant::now();

    assert!(
        release_done - press_done >= Duration::from_millis(25),
        "consecutive button messages must be at least the interval apart"
    );

    // A fresh press then a burst of drags: position messages flow unpaced.
    tokio::time::sleep(Duration::from_millis(30)).await;
    router.on_press(0, 0).await.unwrap();
    let start = Instant::now();
    for i in 0..10 {
        router.on_drag(i, i).await.unwrap();
    }
    assert!(
        start.elapsed() < Duration::from_millis(25),
        "position messages must not be paced"
    );
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_send_after_quit_fails_cleanly() {
    let transport = MockTransport::new();
    let tx = transport.clone();
    let mut router = make_router(ButtonFraming::Combined, ButtonPacing::disabled(), transport);

    router.on_quit_requested();
    router.on_quit_requested(); // double close is a no-op

    let result = router.on_press(1, 1).await;
    assert!(matches!(
        result,
        Err(mousecast_bridge::application::router::RouteError::Channel(
            ChannelError::Closed
        ))
    ));
    assert_eq!(tx.close_count(), 1);
    assert!(tx.writes().is_empty());
}

// ── Full event pump ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_event_pump_from_source_to_transport() {
    let transport = MockTransport::new();
    let tx = transport.clone();
    let mut router = make_router(ButtonFraming::Combined, ButtonPacing::disabled(), transport);

    let mut source = MockPointerSource::new();
    let mut events = source.start().unwrap();

    source.inject(RawPointerEvent::Press { x: 320, y: 240 });
    source.inject(RawPointerEvent::Drag { x: 640, y: 480 });
    source.inject(RawPointerEvent::Release { x: 640, y: 480 });
    source.inject(RawPointerEvent::Quit);

    while let Some(event) = events.recv().await {
        router.handle_event(event).await.unwrap();
        if router.is_closed() {
            break;
        }
    }

    let writes = tx.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0][1].as_str(), Some("down"));
    assert_eq!(writes[2][1].as_str(), Some("up"));
    assert_eq!(writes[2][2].as_float(), Some(1.0));
    assert_eq!(writes[2][3].as_float(), Some(1.0));
    assert_eq!(tx.close_count(), 1);
    assert_eq!(router.state(), RouterState::Idle);
    assert_eq!(router.button_state(), ButtonState::Up);
}

#[tokio::test]
async fn test_status_snapshot_after_session() {
    let transport = MockTransport::new();
    let mut router = make_router(ButtonFraming::Combined, ButtonPacing::disabled(), transport);

    router.on_press(320, 240).await.unwrap();
    router.on_drag(480, 120).await.unwrap();

    let status = router.status();
    assert_eq!(status.port_name, "/mousecast");
    assert_eq!(status.messages_sent, 2);
    assert!(status.button_down);
    let pos = status.last_position.expect("a position was sent");
    assert_eq!(pos.u, 0.75);
    assert_eq!(pos.v, 0.25);
}

// ── Atom shape sanity across the pipeline ─────────────────────────────────────

#[tokio::test]
async fn test_every_message_is_topic_prefixed() {
    let transport = MockTransport::new();
    let tx = transport.clone();
    let mut router = make_router(ButtonFraming::Split, ButtonPacing::disabled(), transport);

    router.on_press(5, 5).await.unwrap();
    router.on_drag(6, 6).await.unwrap();
    router.on_release(6, 6).await.unwrap();

    for atoms in tx.writes() {
        assert_eq!(
            atoms.first().cloned(),
            Some(Atom::Str("/mouse".to_string())),
            "every outbound message starts with the topic tag"
        );
    }
}
