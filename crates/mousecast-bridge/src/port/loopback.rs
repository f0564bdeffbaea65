//! In-process loopback transport.
//!
//! Stands in for the real named-channel middleware in the binary and in
//! end-to-end tests.  It keeps the contract the bridge depends on:
//!
//! - a process-wide name registry, so opening an already-bound name fails;
//! - a single reusable message slot that `write` populates and a background
//!   task drains, with the write-in-progress flag held for the duration;
//! - delivery only once a route to a peer exists, otherwise messages are
//!   dropped with a debug log, exactly as an unrouted port behaves.
//!
//! Drained messages are handed to the receiver half returned by
//! [`LoopbackTransport::new`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use mousecast_core::Atom;
use tokio::sync::{mpsc, Notify};
use tracing::debug;

use super::{PortTransport, TransportError};

/// Process-wide registry of bound port names.
fn name_registry() -> &'static Mutex<HashSet<String>> {
    static REGISTRY: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashSet::new()))
}

struct Shared {
    /// The reusable message slot; `write` overwrites it in place.
    slot: Mutex<Vec<Atom>>,
    in_progress: AtomicBool,
    write_complete: Notify,
    delivery: mpsc::UnboundedSender<Vec<Atom>>,
}

/// An in-process [`PortTransport`] delivering messages on an mpsc channel.
pub struct LoopbackTransport {
    shared: Arc<Shared>,
    name: Option<String>,
    route: Option<String>,
    drain_latency: Duration,
}

impl LoopbackTransport {
    /// Creates a transport and the receiver its messages drain into.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<Atom>>) {
        Self::with_drain_latency(Duration::from_millis(1))
    }

    /// Creates a transport whose drain task holds the slot for `latency`.
    pub fn with_drain_latency(
        latency: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Vec<Atom>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Vec::new()),
                in_progress: AtomicBool::new(false),
                write_complete: Notify::new(),
                delivery: tx,
            }),
            name: None,
            route: None,
            drain_latency: latency,
        };
        (transport, rx)
    }
}

#[async_trait]
impl PortTransport for LoopbackTransport {
    fn open(&mut self, name: &str) -> Result<(), TransportError> {
        let mut registry = name_registry().lock().expect("lock poisoned");
        if !registry.insert(name.to_string()) {
            return Err(TransportError::NameInUse(name.to_string()));
        }
        self.name = Some(name.to_string());
        Ok(())
    }

    fn connect(&mut self, remote: &str) -> Result<(), TransportError> {
        if self.name.is_none() {
            return Err(TransportError::NotOpen);
        }
        if self.route.as_deref() == Some(remote) {
            // Route already exists; connect is idempotent.
            return Ok(());
        }
        self.route = Some(remote.to_string());
        Ok(())
    }

    async fn write(&self, atoms: &[Atom]) -> Result<(), TransportError> {
        if self.name.is_none() {
            return Err(TransportError::NotOpen);
        }

        {
            let mut slot = self.shared.slot.lock().expect("lock poisoned");
            slot.clear();
            slot.extend_from_slice(atoms);
        }
        self.shared.in_progress.store(true, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let latency = self.drain_latency;
        let routed = self.route.is_some();
        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let message = shared.slot.lock().expect("lock poisoned").clone();
            if routed {
                // Receiver dropped means the peer is gone; the port itself
                // stays usable, matching an unrouted port.
                if shared.delivery.send(message).is_err() {
                    debug!("peer receiver dropped; message undelivered");
                }
            } else {
                debug!("no route to peer; message undelivered");
            }
            shared.in_progress.store(false, Ordering::SeqCst);
            shared.write_complete.notify_waiters();
        });
        Ok(())
    }

    fn is_write_in_progress(&self) -> bool {
        self.shared.in_progress.load(Ordering::SeqCst)
    }

    async fn wait_write_complete(&self) {
        let notified = self.shared.write_complete.notified();
        if !self.is_write_in_progress() {
            return;
        }
        notified.await;
    }

    fn peer_display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "<unbound>".to_string())
    }

    fn close(&mut self) {
        if let Some(name) = self.name.take() {
            name_registry()
                .lock()
                .expect("lock poisoned")
                .remove(&name);
        }
        self.route = None;
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        // Release the name if the owner never closed explicitly.
        self.close();
    }
}
