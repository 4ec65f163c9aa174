//! Callback trampoline: the single point where request outcomes cross the
//! boundary into foreign code.
//!
//! # Design
//! Worker tasks never touch the foreign function pointer directly. They put
//! their finished outcome on the handle's completion queue; the dispatcher
//! task consumes the queue and performs exactly one cross-boundary call per
//! entry. Marshaling problems are downgraded to an error delivery and a
//! misbehaving foreign callback cannot unwind back into the executor.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use aria_core::AlbumModel;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::types::{error_cstr, AriaAlbumCallback, FfiAlbumModel};

/// One finished request waiting for its single callback invocation.
pub(crate) struct Completed {
    pub(crate) callback: AriaAlbumCallback,
    pub(crate) outcome: Result<AlbumModel, String>,
}

/// Start the dispatcher task for one handle.
///
/// Runs until the completion queue closes, which happens once release has
/// dropped the handle's sender and every in-flight request has handed off
/// its outcome, so teardown can wait on this task to know the queue is dry.
pub(crate) fn spawn_dispatcher(
    runtime: &Runtime,
    mut completed_rx: UnboundedReceiver<Completed>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        while let Some(done) = completed_rx.recv().await {
            deliver(done.callback, done.outcome);
        }
    })
}

/// Marshal one outcome and invoke the foreign callback exactly once.
pub(crate) fn deliver(callback: AriaAlbumCallback, outcome: Result<AlbumModel, String>) {
    let marshaled = catch_unwind(AssertUnwindSafe(|| match outcome {
        Ok(album) => (ptr::null_mut(), FfiAlbumModel::from_core(album)),
        Err(message) => (error_cstr(&message), ptr::null_mut()),
    }));
    let (error, album) = marshaled.unwrap_or_else(|_| {
        tracing::warn!("failed to marshal album outcome");
        (
            error_cstr("internal error: failed to marshal result"),
            ptr::null_mut(),
        )
    });
    if catch_unwind(AssertUnwindSafe(|| callback(error, album))).is_err() {
        tracing::warn!("foreign callback panicked");
    }
}
