//! InputEventRouter: translates raw pointer events into outbound messages.
//!
//! The router is a state machine over `{Idle, ButtonDown, Dragging}` driven
//! by press, drag, and release events.  It owns the pointer sample and the
//! button state exclusively; there is one producer thread, so no locking
//! is needed beyond the channel's own write discipline.
//!
//! What each event emits depends on the configured [`ButtonFraming`]:
//!
//! | event   | split framing                       | combined framing            |
//! |---------|-------------------------------------|-----------------------------|
//! | press   | button "down", then position        | one button "down" + u, v    |
//! | drag    | position                            | position                    |
//! | release | button "up" (position not resampled)| resample, button "up" + u, v|
//!
//! Pointer movement without a pressed button emits nothing.

use mousecast_core::{
    normalize, ButtonFraming, ButtonState, NormalizedPosition, PointerMessage, PointerSample,
    SurfaceSize,
};
use thiserror::Error;
use tracing::debug;

use crate::port::channel::{ChannelError, ChannelState, PortChannel};
use crate::source::RawPointerEvent;

/// Error type for the router.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The channel refused or failed the send.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Router state, advanced on every handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    /// Button up; movement is ignored.
    Idle,
    /// Button pressed, no drag sample seen yet.
    ButtonDown,
    /// Button held and moving.
    Dragging,
}

/// Read-only view of the bridge for the display layer.
///
/// Rendering (status text, cursor trail) is entirely outside the core; this
/// snapshot is the only data it gets.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    /// Name the port is bound under.
    pub port_name: String,
    /// Transport-reported display name.
    pub peer: String,
    /// Last normalized position sent, if any.
    pub last_position: Option<NormalizedPosition>,
    /// Whether the button is logically down.
    pub button_down: bool,
    /// Messages handed to the transport since open.
    pub messages_sent: u64,
}

/// Translates raw input events into normalizer + builder + channel calls.
pub struct InputEventRouter {
    channel: PortChannel,
    surface: SurfaceSize,
    framing: ButtonFraming,
    sample: PointerSample,
    button: ButtonState,
    state: RouterState,
    last_position: Option<NormalizedPosition>,
}

impl InputEventRouter {
    /// Creates a router over an already-opened channel.
    pub fn new(channel: PortChannel, surface: SurfaceSize, framing: ButtonFraming) -> Self {
        Self {
            channel,
            surface,
            framing,
            sample: PointerSample::default(),
            button: ButtonState::Up,
            state: RouterState::Idle,
            last_position: None,
        }
    }

    /// Dispatches one raw event to the matching handler.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Channel`] if a send fails.
    pub async fn handle_event(&mut self, event: RawPointerEvent) -> Result<(), RouteError> {
        match event {
            RawPointerEvent::Press { x, y } => self.on_press(x, y).await,
            RawPointerEvent::Drag { x, y } => self.on_drag(x, y).await,
            RawPointerEvent::Release { x, y } => self.on_release(x, y).await,
            RawPointerEvent::Quit => {
                self.on_quit_requested();
                Ok(())
            }
        }
    }

    /// Button pressed at raw coordinates `(x, y)`.
    pub async fn on_press(&mut self, x: i32, y: i32) -> Result<(), RouteError> {
        self.sample = PointerSample { x, y };
        self.button = ButtonState::Down;
        let pos = normalize(self.sample, self.surface);

        match self.framing {
            ButtonFraming::Split => {
                self.send(PointerMessage::button(ButtonState::Down)).await?;
                self.send(PointerMessage::position(pos)).await?;
            }
            ButtonFraming::Combined => {
                self.send(PointerMessage::button_at(ButtonState::Down, pos))
                    .await?;
            }
        }

        self.last_position = Some(pos);
        self.state = RouterState::ButtonDown;
        Ok(())
    }

    /// Pointer moved to raw coordinates `(x, y)` with the button held.
    ///
    /// Ignored while the button is up: movement alone emits nothing.
    pub async fn on_drag(&mut self, x: i32, y: i32) -> Result<(), RouteError> {
        if !self.button.is_down() {
            debug!(x, y, "drag ignored while button is up");
            return Ok(());
        }
        self.sample = PointerSample { x, y };
        let pos = normalize(self.sample, self.surface);
        self.send(PointerMessage::position(pos)).await?;
        self.last_position = Some(pos);
        self.state = RouterState::Dragging;
        Ok(())
    }

    /// Button released at raw coordinates `(x, y)`.
    ///
    /// Split framing ignores the release coordinates; combined framing
    /// resamples the pointer and appends the position to the button message.
    /// A release with the button already up is a stray event and is ignored.
    pub async fn on_release(&mut self, x: i32, y: i32) -> Result<(), RouteError> {
        if !self.button.is_down() {
            debug!("release ignored while button is up");
            return Ok(());
        }
        self.button = ButtonState::Up;

        match self.framing {
            ButtonFraming::Split => {
                self.send(PointerMessage::button(ButtonState::Up)).await?;
            }
            ButtonFraming::Combined => {
                self.sample = PointerSample { x, y };
                let pos = normalize(self.sample, self.surface);
                self.send(PointerMessage::button_at(ButtonState::Up, pos))
                    .await?;
                self.last_position = Some(pos);
            }
        }

        self.state = RouterState::Idle;
        Ok(())
    }

    /// User-initiated quit: closes the channel exactly once.
    ///
    /// Any send attempted afterwards fails with a typed error rather than
    /// silently dropping.
    pub fn on_quit_requested(&mut self) {
        self.channel.close();
    }

    async fn send(&mut self, message: PointerMessage) -> Result<(), RouteError> {
        self.channel.send(&message).await?;
        Ok(())
    }

    // ── Read-only accessors for the display layer ─────────────────────────

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn button_state(&self) -> ButtonState {
        self.button
    }

    pub fn last_position(&self) -> Option<NormalizedPosition> {
        self.last_position
    }

    /// `true` once the channel has been closed.
    pub fn is_closed(&self) -> bool {
        self.channel.state() == ChannelState::Closed
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            port_name: self.channel.name().to_string(),
            peer: self.channel.peer_display_name(),
            last_position: self.last_position,
            button_down: self.button.is_down(),
            messages_sent: self.channel.messages_sent(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::mock::MockTransport;
    use mousecast_core::{Atom, ButtonPacing};

    fn make_router(framing: ButtonFraming) -> (InputEventRouter, MockTransport) {
        let transport = MockTransport::new();
        let handle = transport.clone();
        let mut channel = PortChannel::new(Box::new(transport), ButtonPacing::disabled());
        channel.open("/mousecast").unwrap();
        let router = InputEventRouter::new(channel, SurfaceSize::default(), framing);
        (router, handle)
    }

    fn atoms_as_tokens(atoms: &[Atom]) -> Vec<String> {
        atoms
            .iter()
            .map(|a| match a {
                Atom::Str(s) => s.clone(),
                Atom::Float(f) => format!("{f}"),
            })
            .collect()
    }

    // ── Press ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_press_combined_sends_single_button_message_with_position() {
        let (mut router, tx) = make_router(ButtonFraming::Combined);

        router.on_press(320, 240).await.unwrap();

        let writes = tx.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            atoms_as_tokens(&writes[0]),
            vec!["/mouse", "down", "0.5", "0.5"]
        );
        assert_eq!(router.state(), RouterState::ButtonDown);
    }

    #[tokio::test]
    async fn test_press_split_sends_button_then_position() {
        let (mut router, tx) = make_router(ButtonFraming::Split);

        router.on_press(320, 240).await.unwrap();

        let writes = tx.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(atoms_as_tokens(&writes[0]), vec!["/mouse", "down"]);
        assert_eq!(atoms_as_tokens(&writes[1]), vec!["/mouse", "0.5", "0.5"]);
    }

    // ── Drag ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_drag_emits_one_position_message_per_sample() {
        let (mut router, tx) = make_router(ButtonFraming::Combined);
        router.on_press(0, 0).await.unwrap();

        router.on_drag(64, 48).await.unwrap();
        router.on_drag(128, 96).await.unwrap();

        let writes = tx.writes();
        assert_eq!(writes.len(), 3);
        assert_eq!(atoms_as_tokens(&writes[1]), vec!["/mouse", "0.1", "0.1"]);
        assert_eq!(atoms_as_tokens(&writes[2]), vec!["/mouse", "0.2", "0.2"]);
        assert_eq!(router.state(), RouterState::Dragging);
    }

    #[tokio::test]
    async fn test_movement_without_pressed_button_emits_nothing() {
        let (mut router, tx) = make_router(ButtonFraming::Combined);

        router.on_drag(100, 100).await.unwrap();

        assert!(tx.writes().is_empty());
        assert_eq!(router.state(), RouterState::Idle);
    }

    #[tokio::test]
    async fn test_drag_clamps_out_of_range_samples() {
        let (mut router, tx) = make_router(ButtonFraming::Combined);
        router.on_press(0, 0).await.unwrap();

        router.on_drag(-50, 500).await.unwrap();

        let writes = tx.writes();
        assert_eq!(atoms_as_tokens(&writes[1]), vec!["/mouse", "0", "1"]);
    }

    // ── Release ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_release_combined_resamples_and_carries_position() {
        let (mut router, tx) = make_router(ButtonFraming::Combined);
        router.on_press(0, 0).await.unwrap();

        router.on_release(640, 480).await.unwrap();

        let writes = tx.writes();
        assert_eq!(atoms_as_tokens(&writes[1]), vec!["/mouse", "up", "1", "1"]);
        assert_eq!(router.state(), RouterState::Idle);
        assert_eq!(router.button_state(), ButtonState::Up);
    }

    #[tokio::test]
    async fn test_release_split_does_not_resample_position() {
        let (mut router, tx) = make_router(ButtonFraming::Split);
        router.on_press(320, 240).await.unwrap();

        router.on_release(640, 480).await.unwrap();

        let writes = tx.writes();
        let release = writes.last().unwrap();
        assert_eq!(atoms_as_tokens(release), vec!["/mouse", "up"]);
        // The last sent position stays the press position.
        assert_eq!(
            router.last_position(),
            Some(NormalizedPosition { u: 0.5, v: 0.5 })
        );
    }

    #[tokio::test]
    async fn test_stray_release_is_ignored() {
        let (mut router, tx) = make_router(ButtonFraming::Combined);

        router.on_release(10, 10).await.unwrap();

        assert!(tx.writes().is_empty());
    }

    // ── Ordering ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_event_sequence_preserves_message_order() {
        let (mut router, tx) = make_router(ButtonFraming::Combined);

        router.on_press(10, 10).await.unwrap();
        router.on_drag(20, 20).await.unwrap();
        router.on_drag(30, 30).await.unwrap();
        router.on_release(30, 30).await.unwrap();

        let writes = tx.writes();
        assert_eq!(writes.len(), 4);
        assert_eq!(writes[0][1].as_str(), Some("down"));
        assert_eq!(writes[1][1].as_float(), Some(20.0 / 640.0));
        assert_eq!(writes[2][1].as_float(), Some(30.0 / 640.0));
        assert_eq!(writes[3][1].as_str(), Some("up"));
    }

    // ── Quit / lifecycle ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_quit_closes_channel_and_later_sends_fail() {
        let (mut router, _tx) = make_router(ButtonFraming::Combined);

        router.on_quit_requested();
        assert!(router.is_closed());

        let result = router.on_press(1, 1).await;
        assert!(matches!(
            result,
            Err(RouteError::Channel(ChannelError::Closed))
        ));
    }

    #[tokio::test]
    async fn test_handle_event_dispatches_quit() {
        let (mut router, _tx) = make_router(ButtonFraming::Combined);

        router.handle_event(RawPointerEvent::Quit).await.unwrap();

        assert!(router.is_closed());
    }

    // ── Status snapshot ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_status_snapshot_reflects_last_send() {
        let (mut router, _tx) = make_router(ButtonFraming::Combined);
        router.on_press(320, 240).await.unwrap();

        let status = router.status();

        assert_eq!(status.port_name, "/mousecast");
        assert_eq!(
            status.last_position,
            Some(NormalizedPosition { u: 0.5, v: 0.5 })
        );
        assert!(status.button_down);
        assert_eq!(status.messages_sent, 1);
    }
}
