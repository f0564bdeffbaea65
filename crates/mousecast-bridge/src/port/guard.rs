//! Transmit guard: at-most-one in-flight write, plus button pacing.
//!
//! The transport's message slot is reused rather than copied per send, so
//! populating it while the transport is still reading from it would corrupt
//! the outbound message.  The guard waits on the transport's completion
//! signal until the previous write has drained before admitting the next
//! one.  The original implementation spun on the write-in-progress flag;
//! the completion wait preserves the same exclusion contract without
//! burning CPU.
//!
//! Button-transition messages are additionally kept a minimum interval
//! apart (25 ms unless configured otherwise) because the downstream
//! receiver can miss closely-spaced transitions.  Position messages are
//! never delayed.

use std::time::Instant;

use mousecast_core::{ButtonPacing, PointerMessage};
use tracing::trace;

use crate::port::PortTransport;

/// Serializes writes to a single port and paces button messages.
///
/// There is exactly one producer, so the guard holds plain state; the only
/// cross-thread coordination is the transport's own completion signal.
pub struct TransmitGuard {
    pacing: ButtonPacing,
    last_button_sent: Option<Instant>,
}

impl TransmitGuard {
    pub fn new(pacing: ButtonPacing) -> Self {
        Self {
            pacing,
            last_button_sent: None,
        }
    }

    /// Blocks (cooperatively) until `message` may be written, then records
    /// the admission.
    ///
    /// On return it is guaranteed that the transport reports no write in
    /// progress and that, for button messages, at least the configured
    /// interval has elapsed since the previous button message.
    pub async fn admit(&mut self, message: &PointerMessage, transport: &dyn PortTransport) {
        if message.is_button() && self.pacing.is_enabled() {
            if let Some(last) = self.last_button_sent {
                let elapsed = last.elapsed();
                let min = self.pacing.min_interval();
                if elapsed < min {
                    let remaining = min - elapsed;
                    trace!(?remaining, "pacing button message");
                    tokio::time::sleep(remaining).await;
                }
            }
        }

        // The flag may already be clear; wait_write_complete returns
        // immediately in that case.  Re-check because the signal and the
        // flag are updated independently by the transport.
        while transport.is_write_in_progress() {
            transport.wait_write_complete().await;
        }

        if message.is_button() {
            self.last_button_sent = Some(Instant::now());
        }
    }
}
