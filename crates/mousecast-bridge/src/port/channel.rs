//! PortChannel: lifecycle of the single named outbound channel.
//!
//! The channel walks a one-way state machine:
//!
//! ```text
//! Uninitialized ──open──► Open ──close──► Closed (terminal)
//! ```
//!
//! There is no reopening.  `open` failures (name already bound, transport
//! registration refused) are fatal to the caller; `connect_to` failures are
//! logged and swallowed; `send` after `close` fails with a typed error
//! rather than silently dropping the message.

use mousecast_core::{ButtonPacing, PointerMessage};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::port::guard::TransmitGuard;
use crate::port::{PortTransport, TransportError};

/// Error type for channel operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// `send` or `connect_to` was called before `open`.
    #[error("channel is not open")]
    NotOpen,

    /// `send` was called after `close`.
    #[error("channel has been closed")]
    Closed,

    /// `open` was called twice; the lifecycle is one-way.
    #[error("channel is already open as {0}")]
    AlreadyOpen(String),

    /// The transport reported an error.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Lifecycle state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Uninitialized,
    Open,
    Closed,
}

/// The single named outbound channel of the process.
///
/// Exactly one instance exists per running bridge; it owns the transport
/// handle and the transmit guard, so every outbound message passes through
/// the write-exclusion and pacing discipline in issue order (single
/// producer, single channel, FIFO).
pub struct PortChannel {
    transport: Box<dyn PortTransport>,
    guard: TransmitGuard,
    state: ChannelState,
    name: String,
    messages_sent: u64,
}

impl PortChannel {
    /// Creates an unopened channel over `transport`.
    pub fn new(transport: Box<dyn PortTransport>, pacing: ButtonPacing) -> Self {
        Self {
            transport,
            guard: TransmitGuard::new(pacing),
            state: ChannelState::Uninitialized,
            name: String::new(),
            messages_sent: 0,
        }
    }

    /// Binds the channel under `name`.
    ///
    /// # Errors
    ///
    /// Propagates the transport's registration failure; the caller treats
    /// this as fatal.  Returns [`ChannelError::AlreadyOpen`] on a second
    /// call and [`ChannelError::Closed`] after `close`.
    pub fn open(&mut self, name: &str) -> Result<(), ChannelError> {
        match self.state {
            ChannelState::Open => return Err(ChannelError::AlreadyOpen(self.name.clone())),
            ChannelState::Closed => return Err(ChannelError::Closed),
            ChannelState::Uninitialized => {}
        }
        info!(port = name, "opening port");
        self.transport.open(name)?;
        self.state = ChannelState::Open;
        self.name = name.to_string();
        info!(port = %self.transport.peer_display_name(), "port open");
        Ok(())
    }

    /// Best-effort route to a named receiver.
    ///
    /// A failed connect leaves the channel open and usable; the error is
    /// logged and swallowed.  Reconnecting is the operator's concern, never
    /// retried here.
    pub fn connect_to(&mut self, remote: &str) {
        if self.state != ChannelState::Open {
            warn!(remote, "connect requested on a channel that is not open");
            return;
        }
        match self.transport.connect(remote) {
            Ok(()) => info!(remote, "connected to peer"),
            Err(err) => warn!(remote, %err, "connect failed; messages will be undelivered until a route exists"),
        }
    }

    /// Sends one message through the guard and the transport.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::NotOpen`] before `open`,
    /// [`ChannelError::Closed`] after `close`, and propagates transport
    /// write errors.
    pub async fn send(&mut self, message: &PointerMessage) -> Result<(), ChannelError> {
        match self.state {
            ChannelState::Uninitialized => return Err(ChannelError::NotOpen),
            ChannelState::Closed => return Err(ChannelError::Closed),
            ChannelState::Open => {}
        }
        self.guard.admit(message, self.transport.as_ref()).await;
        self.transport.write(&message.atoms()).await?;
        self.messages_sent += 1;
        debug!(?message, sent = self.messages_sent, "message written");
        Ok(())
    }

    /// Releases the channel.  A second call is a no-op.
    pub fn close(&mut self) {
        if self.state != ChannelState::Open {
            return;
        }
        info!(port = %self.name, "closing port");
        self.transport.close();
        self.state = ChannelState::Closed;
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// The logical name the channel was opened under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name reported by the transport, for the status line.
    pub fn peer_display_name(&self) -> String {
        self.transport.peer_display_name()
    }

    /// Total messages handed to the transport since open.
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }
}
