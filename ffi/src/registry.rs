//! Handle registry and per-handle worker state.
//!
//! # Design
//! Foreign code never holds a pointer into this library. `aria_connect`
//! hands out a `u64` token mapping to an internally owned [`ClientState`];
//! every boundary call resolves the token under the registry lock and then
//! works on an `Arc` clone, so release can remove the entry without racing
//! in-flight requests. Each state owns its own small worker runtime: the
//! blocking adapter parks the foreign thread on it, the callback path spawns
//! onto it, and release drains it deterministically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use aria_core::{AlbumModel, ClientError, LibraryClient};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::bridge::{self, Completed};
use crate::types::AriaAlbumCallback;

static REGISTRY: LazyLock<Mutex<HashMap<u64, Arc<ClientState>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Token 0 is reserved as the invalid handle.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn insert(state: ClientState) -> u64 {
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::SeqCst);
    REGISTRY.lock().unwrap().insert(handle, Arc::new(state));
    handle
}

pub(crate) fn get(handle: u64) -> Option<Arc<ClientState>> {
    REGISTRY.lock().unwrap().get(&handle).cloned()
}

pub(crate) fn remove(handle: u64) -> Option<Arc<ClientState>> {
    REGISTRY.lock().unwrap().remove(&handle)
}

/// Everything one handle owns: the executor client, the worker runtime, the
/// completion queue feeding the callback dispatcher, and the count of
/// requests that have not yet handed off their outcome.
pub(crate) struct ClientState {
    client: LibraryClient,
    runtime: Runtime,
    pending: Arc<AtomicUsize>,
    completed_tx: Mutex<Option<mpsc::UnboundedSender<Completed>>>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl ClientState {
    pub(crate) fn new(client: LibraryClient) -> Result<Self, ClientError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("aria-worker")
            .enable_all()
            .build()
            .map_err(|e| {
                ClientError::Configuration(format!("failed to start worker runtime: {e}"))
            })?;
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        let dispatcher = bridge::spawn_dispatcher(&runtime, completed_rx);
        Ok(Self {
            client,
            runtime,
            pending: Arc::new(AtomicUsize::new(0)),
            completed_tx: Mutex::new(Some(completed_tx)),
            dispatcher: Mutex::new(Some(dispatcher)),
        })
    }

    /// Requests dispatched on this handle whose outcome is still in flight.
    pub(crate) fn pending_requests(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Run one fetch to completion, parking the calling thread until the
    /// outcome is ready. The future itself runs as a task on the worker
    /// runtime, so the wait yields instead of spinning and a panic inside
    /// the task surfaces as an error string rather than an unwind.
    pub(crate) fn fetch_blocking(&self, cursor: String) -> Result<AlbumModel, String> {
        let _guard = PendingGuard::new(&self.pending);
        let client = self.client.clone();
        let task = self
            .runtime
            .spawn(async move { client.fetch_album(&cursor).await });
        match self.runtime.block_on(task) {
            Ok(outcome) => outcome.map_err(|e| e.to_string()),
            Err(fault) => Err(worker_fault(&fault)),
        }
    }

    /// Schedule one fetch whose outcome is delivered to `callback` through
    /// the dispatcher, exactly once, on a worker thread.
    pub(crate) fn fetch_with_callback(&self, cursor: String, callback: AriaAlbumCallback) {
        let Some(completed_tx) = self.completed_tx.lock().unwrap().clone() else {
            // Release raced past the registry lookup; the callback still
            // fires exactly once.
            bridge::deliver(callback, Err("client is shutting down".to_string()));
            return;
        };
        let guard = PendingGuard::new(&self.pending);
        let client = self.client.clone();
        let task = self
            .runtime
            .spawn(async move { client.fetch_album(&cursor).await });
        self.runtime.spawn(async move {
            let _guard = guard;
            let outcome = match task.await {
                Ok(outcome) => outcome.map_err(|e| e.to_string()),
                Err(fault) => Err(worker_fault(&fault)),
            };
            if let Err(unsent) = completed_tx.send(Completed { callback, outcome }) {
                // Dispatcher already gone; deliver here so the callback
                // still fires.
                let Completed { callback, outcome } = unsent.0;
                bridge::deliver(callback, outcome);
            }
        });
    }

    /// First half of release: stop feeding the dispatcher. In-flight tasks
    /// keep their own sender clones, so the queue stays open until the last
    /// of them hands off its outcome.
    pub(crate) fn begin_release(&self) {
        self.completed_tx.lock().unwrap().take();
    }

    /// Second half of release: wait until the dispatcher has delivered every
    /// pending outcome. After this returns, no callback can fire again.
    pub(crate) fn drain(&self) {
        let dispatcher = self.dispatcher.lock().unwrap().take();
        if let Some(dispatcher) = dispatcher {
            let _ = self.runtime.block_on(dispatcher);
        }
    }
}

fn worker_fault(fault: &JoinError) -> String {
    if fault.is_panic() {
        "internal error: album request worker panicked".to_string()
    } else {
        "internal error: album request was aborted".to_string()
    }
}

/// Keeps the pending-request count accurate on every exit path.
struct PendingGuard {
    pending: Arc<AtomicUsize>,
}

impl PendingGuard {
    fn new(pending: &Arc<AtomicUsize>) -> Self {
        pending.fetch_add(1, Ordering::SeqCst);
        Self {
            pending: Arc::clone(pending),
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}
