//! Outbound pointer message types.
//!
//! Every message the bridge emits is an ordered sequence of typed atoms
//! beginning with the fixed topic tag [`MOUSE_TOPIC`].  The receiver depends
//! on the atom order being bit-consistent, so the flattening in
//! [`PointerMessage::atoms`] is the single place field order is decided.
//!
//! Floats travel as binary `f64` atoms.  Any textual formatting of
//! coordinates is a display concern and happens nowhere in this crate.

use serde::{Deserialize, Serialize};

use crate::domain::normalize::NormalizedPosition;

/// Topic tag prefixed to every outbound message.
pub const MOUSE_TOPIC: &str = "/mouse";

/// Logical state of the (single) tracked button.
///
/// Transitions only on press/release events; there is exactly one writer,
/// the input event router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    Up,
    Down,
}

impl ButtonState {
    /// The token sent on the wire for this state.
    pub fn token(self) -> &'static str {
        match self {
            ButtonState::Up => "up",
            ButtonState::Down => "down",
        }
    }

    /// `true` for [`ButtonState::Down`].
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Down)
    }
}

/// One typed field of an outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Atom {
    Str(String),
    Float(f64),
}

impl Atom {
    /// Returns the float value if this atom is a [`Atom::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Atom::Float(f) => Some(*f),
            Atom::Str(_) => None,
        }
    }

    /// Returns the string value if this atom is an [`Atom::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Atom::Str(s) => Some(s),
            Atom::Float(_) => None,
        }
    }
}

/// A complete outbound message, built fresh per send and not retained
/// after transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerMessage {
    /// Cursor position update while the button is held.
    Position { pos: NormalizedPosition },
    /// Button transition; carries the position only under combined framing.
    Button {
        state: ButtonState,
        pos: Option<NormalizedPosition>,
    },
}

impl PointerMessage {
    /// Builds a position message.
    pub fn position(pos: NormalizedPosition) -> Self {
        PointerMessage::Position { pos }
    }

    /// Builds a button message without position (split framing).
    pub fn button(state: ButtonState) -> Self {
        PointerMessage::Button { state, pos: None }
    }

    /// Builds a button message carrying position (combined framing).
    pub fn button_at(state: ButtonState, pos: NormalizedPosition) -> Self {
        PointerMessage::Button {
            state,
            pos: Some(pos),
        }
    }

    /// `true` if this is a button-transition message.
    ///
    /// Button messages are subject to the pacing policy; position messages
    /// never are.
    pub fn is_button(&self) -> bool {
        matches!(self, PointerMessage::Button { .. })
    }

    /// Flattens the message into its ordered atom sequence.
    ///
    /// Field order is fixed:
    /// - position:           `["/mouse", u, v]`
    /// - button (split):     `["/mouse", "up"|"down"]`
    /// - button (combined):  `["/mouse", "up"|"down", u, v]`
    pub fn atoms(&self) -> Vec<Atom> {
        let mut atoms = vec![Atom::Str(MOUSE_TOPIC.to_string())];
        match self {
            PointerMessage::Position { pos } => {
                atoms.push(Atom::Float(pos.u));
                atoms.push(Atom::Float(pos.v));
            }
            PointerMessage::Button { state, pos } => {
                atoms.push(Atom::Str(state.token().to_string()));
                if let Some(pos) = pos {
                    atoms.push(Atom::Float(pos.u));
                    atoms.push(Atom::Float(pos.v));
                }
            }
        }
        atoms
    }
}
