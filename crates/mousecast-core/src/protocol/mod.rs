//! Protocol module containing the outbound message model.

pub mod messages;

pub use messages::{Atom, ButtonState, PointerMessage, MOUSE_TOPIC};
