//! Domain logic for mousecast.
//!
//! Pure business rules with no infrastructure dependencies: nothing in this
//! module touches OS APIs, sockets, clocks, or the file system, so it can be
//! compiled and unit-tested on any platform.
//!
//! - **`normalize`** – clamps raw device coordinates to a reference surface
//!   and rescales them into the closed unit square.
//! - **`policy`** – the configurable rules for button-transition messages:
//!   whether they carry position, and how closely they may be spaced.

pub mod normalize;
pub mod policy;
