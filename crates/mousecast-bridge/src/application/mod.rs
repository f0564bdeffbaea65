//! Application layer of the bridge.
//!
//! Orchestrates the domain (normalization, framing policy) and the port
//! layer to fulfil the one user goal: every press, drag, and release on the
//! local pointing device becomes the right message on the outbound channel,
//! in order.
//!
//! - **`router`** – the input event router, a small state machine driven by
//!   raw pointer events.  This is the only writer of pointer state and the
//!   only producer of outbound messages.

pub mod router;
