//! Pointer event sources.
//!
//! The bridge is driven by an external input-event dispatcher: a GUI
//! toolkit in the original deployment, a scripted reader or a test injector
//! here.  The [`PointerSource`] trait abstracts event production so the
//! router can be exercised without any windowing system.
//!
//! Events arrive on a plain `mpsc` receiver; the router consumes them on a
//! single task, which is the only producer the port layer ever sees.

use thiserror::Error;
use tokio::sync::mpsc;

pub mod mock;
pub mod script;

/// A raw pointer event, in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPointerEvent {
    /// The button was pressed at `(x, y)`.
    Press { x: i32, y: i32 },
    /// The cursor moved to `(x, y)` with the button held.
    Drag { x: i32, y: i32 },
    /// The button was released at `(x, y)`.
    Release { x: i32, y: i32 },
    /// The user asked to quit.
    Quit,
}

/// Error type for source startup.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source was started twice.
    #[error("source has already been started")]
    AlreadyStarted,
}

/// Trait abstracting pointer event production.
///
/// The binary uses [`script::ScriptSource`]; tests use
/// [`mock::MockPointerSource`].
pub trait PointerSource: Send {
    /// Starts the source and returns the receiver for its events.
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<RawPointerEvent>, SourceError>;
}
