//! Recording transport double for unit and integration tests.
//!
//! Records every write in issue order, can simulate a transport that stays
//! busy for a fixed window per write, and counts overlap violations: writes
//! issued while a previous write was still in flight.  A correctly guarded
//! channel never produces a violation.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mousecast_core::Atom;
use tokio::sync::Notify;

use super::{PortTransport, TransportError};

#[derive(Default)]
struct Inner {
    writes: Mutex<Vec<Vec<Atom>>>,
    open_name: Mutex<Option<String>>,
    in_progress: AtomicBool,
    overlap_violations: AtomicU32,
    connect_attempts: AtomicU32,
    close_count: AtomicU32,
    write_complete: Notify,
}

/// A recording implementation of [`PortTransport`].
///
/// Cheap to clone; clones share state, so a test can hand the transport to
/// a channel by value and keep a handle for assertions.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Inner>,
    busy_window: Duration,
    bound_name: Option<String>,
    fail_connect: bool,
}

impl MockTransport {
    /// A transport whose writes complete instantly.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            busy_window: Duration::ZERO,
            bound_name: None,
            fail_connect: false,
        }
    }

    /// A transport that stays busy for `window` after each write.
    pub fn with_busy_window(window: Duration) -> Self {
        Self {
            busy_window: window,
            ..Self::new()
        }
    }

    /// A transport on which `name` is already bound, so `open` fails.
    pub fn with_bound_name(name: &str) -> Self {
        Self {
            bound_name: Some(name.to_string()),
            ..Self::new()
        }
    }

    /// A transport on which every `connect` fails.
    pub fn with_connect_failure() -> Self {
        Self {
            fail_connect: true,
            ..Self::new()
        }
    }

    /// All recorded writes, as flattened atom sequences, in issue order.
    pub fn writes(&self) -> Vec<Vec<Atom>> {
        self.inner.writes.lock().expect("lock poisoned").clone()
    }

    /// Number of writes issued while a previous write was still in flight.
    pub fn overlap_violations(&self) -> u32 {
        self.inner.overlap_violations.load(Ordering::Relaxed)
    }

    /// Number of `connect` calls observed.
    pub fn connect_attempts(&self) -> u32 {
        self.inner.connect_attempts.load(Ordering::Relaxed)
    }

    /// Number of `close` calls observed.
    pub fn close_count(&self) -> u32 {
        self.inner.close_count.load(Ordering::Relaxed)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortTransport for MockTransport {
    fn open(&mut self, name: &str) -> Result<(), TransportError> {
        if self.bound_name.as_deref() == Some(name) {
            return Err(TransportError::NameInUse(name.to_string()));
        }
        *self.inner.open_name.lock().expect("lock poisoned") = Some(name.to_string());
        Ok(())
    }

    fn connect(&mut self, remote: &str) -> Result<(), TransportError> {
        self.inner.connect_attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_connect {
            return Err(TransportError::ConnectFailed {
                remote: remote.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    async fn write(&self, atoms: &[Atom]) -> Result<(), TransportError> {
        if self.inner.in_progress.load(Ordering::SeqCst) {
            self.inner.overlap_violations.fetch_add(1, Ordering::Relaxed);
        }
        self.inner
            .writes
            .lock()
            .expect("lock poisoned")
            .push(atoms.to_vec());

        if !self.busy_window.is_zero() {
            self.inner.in_progress.store(true, Ordering::SeqCst);
            let inner = Arc::clone(&self.inner);
            let window = self.busy_window;
            tokio::spawn(async move {
                tokio::time::sleep(window).await;
                inner.in_progress.store(false, Ordering::SeqCst);
                inner.write_complete.notify_waiters();
            });
        }
        Ok(())
    }

    fn is_write_in_progress(&self) -> bool {
        self.inner.in_progress.load(Ordering::SeqCst)
    }

    async fn wait_write_complete(&self) {
        // Arm the notification before re-checking the flag so a completion
        // between the check and the await is not missed.
        let notified = self.inner.write_complete.notified();
        if !self.is_write_in_progress() {
            return;
        }
        notified.await;
    }

    fn peer_display_name(&self) -> String {
        self.inner
            .open_name
            .lock()
            .expect("lock poisoned")
            .clone()
            .unwrap_or_else(|| "<unbound>".to_string())
    }

    fn close(&mut self) {
        self.inner.close_count.fetch_add(1, Ordering::Relaxed);
        *self.inner.open_name.lock().expect("lock poisoned") = None;
    }
}
