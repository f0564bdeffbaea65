//! The port layer: the named outbound channel and everything that guards it.
//!
//! The underlying named-channel transport (discovery, registration, wire
//! encoding) is an external collaborator.  The bridge requires only the
//! small surface captured by [`PortTransport`]; everything above it
//! (write exclusion, button pacing, lifecycle) lives in this module.
//!
//! **Dependency rule**: `application` depends on this module only through
//! [`channel::PortChannel`]; nothing here imports from `application`.

pub mod channel;
pub mod guard;
pub mod loopback;
pub mod mock;

use async_trait::async_trait;
use mousecast_core::Atom;
use thiserror::Error;

/// Errors surfaced by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The requested port name is already bound process-wide.
    #[error("port name already bound: {0}")]
    NameInUse(String),

    /// The transport could not register the port.
    #[error("port registration failed for {name}: {reason}")]
    Registration { name: String, reason: String },

    /// A route to the named peer could not be established.
    #[error("connect to {remote} failed: {reason}")]
    ConnectFailed { remote: String, reason: String },

    /// A write was attempted on a port that is not open.
    #[error("port is not open")]
    NotOpen,
}

/// The surface the bridge requires from a named-channel transport.
///
/// The transport owns a reusable message slot: `write` copies the atoms
/// into that slot and flushes it asynchronously, possibly on a thread the
/// transport owns.  While [`is_write_in_progress`](PortTransport::is_write_in_progress)
/// reports `true`, the slot must not be touched; callers wait on
/// [`wait_write_complete`](PortTransport::wait_write_complete), the
/// completion signal that replaces the original busy-poll.
#[async_trait]
pub trait PortTransport: Send + Sync {
    /// Binds the port under `name`.  Failure is fatal to the caller.
    fn open(&mut self, name: &str) -> Result<(), TransportError>;

    /// Establishes a route from the local port to `remote`.
    ///
    /// Idempotent if the route already exists.  Failure is non-fatal: the
    /// port stays open, messages are simply undelivered until a route
    /// exists.
    fn connect(&mut self, remote: &str) -> Result<(), TransportError>;

    /// Populates the message slot and begins an asynchronous flush.
    ///
    /// Callers must ensure no write is in progress before calling; the slot
    /// is reused, not copied per send.
    async fn write(&self, atoms: &[Atom]) -> Result<(), TransportError>;

    /// `true` while the transport may still be reading the message slot.
    fn is_write_in_progress(&self) -> bool;

    /// Resolves when the in-flight write (if any) has completed.
    ///
    /// Returns immediately when no write is in progress.  If the channel is
    /// never drained this waits forever; that liveness risk is accepted.
    async fn wait_write_complete(&self);

    /// Human-readable name of the bound port, for display only.
    fn peer_display_name(&self) -> String;

    /// Releases the port.  Safe to call on a port that never opened.
    fn close(&mut self);
}
