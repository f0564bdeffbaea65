//! Mock pointer source for unit testing.
//!
//! Allows tests to inject synthetic [`RawPointerEvent`]s without a
//! windowing system or an input stream.

use tokio::sync::mpsc;

use super::{PointerSource, RawPointerEvent, SourceError};

/// A mock implementation of [`PointerSource`] that tests feed by hand.
pub struct MockPointerSource {
    sender: Option<mpsc::UnboundedSender<RawPointerEvent>>,
}

impl MockPointerSource {
    pub fn new() -> Self {
        Self { sender: None }
    }

    /// Injects a synthetic event, as if produced by hardware.
    ///
    /// Panics if `start()` has not been called.
    pub fn inject(&self, event: RawPointerEvent) {
        self.sender
            .as_ref()
            .expect("MockPointerSource::inject called before start()")
            .send(event)
            .expect("receiver has been dropped");
    }
}

impl Default for MockPointerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSource for MockPointerSource {
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<RawPointerEvent>, SourceError> {
        if self.sender.is_some() {
            return Err(SourceError::AlreadyStarted);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.sender = Some(tx);
        Ok(rx)
    }
}
