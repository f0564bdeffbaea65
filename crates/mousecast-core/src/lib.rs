//! # mousecast-core
//!
//! Shared library for mousecast containing the outbound message model,
//! coordinate normalization, and the button-message framing policy.
//!
//! This crate is used by the bridge application and by its test doubles.
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! mousecast forwards a local pointing device to a remote process: every
//! press, drag, and release becomes a small topic-prefixed message sent
//! through a single named outbound channel.  This crate defines:
//!
//! - **`protocol`** – The messages themselves.  Each message is an ordered
//!   sequence of typed atoms (a string topic tag, then either a button-state
//!   token or a pair of floats), flattened for the transport by
//!   [`protocol::messages::PointerMessage::atoms`].
//!
//! - **`domain`** – Pure geometry and policy: clamping raw device
//!   coordinates into the unit square, and the configurable rules for what
//!   button-transition messages carry and how closely they may be spaced.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `mousecast_core::PointerMessage` instead of the full path.
pub use domain::normalize::{
    normalize, NormalizedPosition, PointerSample, SurfaceError, SurfaceSize,
};
pub use domain::policy::{ButtonFraming, ButtonPacing};
pub use protocol::messages::{Atom, ButtonState, PointerMessage, MOUSE_TOPIC};
