//! C-ABI boundary for the album library client.
//!
//! # Overview
//! Exposes the album client to any language with a C FFI. One `connect`
//! call yields an opaque `u64` handle; albums can then be fetched either
//! synchronously (`aria_get_album_blocking`) or asynchronously with a
//! caller-supplied function pointer (`aria_get_album_cb`). Both modes run
//! the same executor on the handle's internal worker runtime.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind`; no panic
//!   crosses the boundary.
//! - Handles are registry tokens, never pointers into Rust memory.
//! - Ownership transfers are explicit and paired: albums returned or passed
//!   to a callback belong to the caller until `aria_album_free`; error
//!   strings until `aria_string_free`; the handle until
//!   `aria_client_release`, which drains in-flight callbacks before
//!   tearing down.

pub mod types;

mod bridge;
mod registry;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use aria_core::LibraryClient;

use types::{AriaAlbumCallback, FfiAlbumModel};

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Connect a client to the service at `base_url`.
///
/// Returns an opaque non-zero handle on success and `0` when the URL is
/// null, unparseable, or the worker runtime cannot be started. A failed
/// connect registers nothing.
#[unsafe(no_mangle)]
pub extern "C" fn aria_connect(base_url: *const c_char) -> u64 {
    catch_unwind(AssertUnwindSafe(|| {
        if base_url.is_null() {
            return 0;
        }
        let Ok(url) = unsafe { CStr::from_ptr(base_url) }.to_str() else {
            return 0;
        };
        let client = match LibraryClient::connect(url) {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(%err, "connect rejected");
                return 0;
            }
        };
        match registry::ClientState::new(client) {
            Ok(state) => registry::insert(state),
            Err(err) => {
                tracing::warn!(%err, "connect failed");
                0
            }
        }
    }))
    .unwrap_or(0)
}

/// Release a handle created by `aria_connect`.
///
/// Removes the handle (subsequent operations on the token fail), waits for
/// every pending callback to fire, then tears the client down. Unknown
/// handles and repeated releases are no-ops.
#[unsafe(no_mangle)]
pub extern "C" fn aria_client_release(handle: u64) {
    let _ = catch_unwind(AssertUnwindSafe(|| {
        if let Some(state) = registry::remove(handle) {
            state.begin_release();
            state.drain();
        }
    }));
}

// ---------------------------------------------------------------------------
// Album retrieval
// ---------------------------------------------------------------------------

/// Fetch an album synchronously.
///
/// On success returns an album owned by the caller (release with
/// `aria_album_free`) and writes null to `error_out`. On failure returns
/// null and, when `error_out` is non-null, writes an error string the caller
/// must release with `aria_string_free`.
#[unsafe(no_mangle)]
pub extern "C" fn aria_get_album_blocking(
    handle: u64,
    cursor: *const c_char,
    error_out: *mut *mut c_char,
) -> *mut FfiAlbumModel {
    catch_unwind(AssertUnwindSafe(|| {
        clear_error(error_out);
        let cursor = match read_cursor(cursor) {
            Ok(cursor) => cursor,
            Err(message) => return fail(error_out, message),
        };
        let Some(state) = registry::get(handle) else {
            return fail(error_out, "unknown client handle");
        };
        match state.fetch_blocking(cursor) {
            Ok(album) => {
                match catch_unwind(AssertUnwindSafe(|| FfiAlbumModel::from_core(album))) {
                    Ok(album) => album,
                    Err(_) => fail(error_out, "internal error: failed to marshal album"),
                }
            }
            Err(message) => fail(error_out, &message),
        }
    }))
    .unwrap_or(ptr::null_mut())
}

/// Fetch an album asynchronously.
///
/// Returns immediately; `callback` is invoked exactly once from a worker
/// thread with either `(null, album)` or `(error, null)`. Registration
/// failures (unknown handle, null or non-UTF-8 cursor) are reported through
/// the same callback. A null callback is ignored; there is nothing to
/// invoke.
#[unsafe(no_mangle)]
pub extern "C" fn aria_get_album_cb(
    handle: u64,
    cursor: *const c_char,
    callback: Option<AriaAlbumCallback>,
) {
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let Some(callback) = callback else {
            tracing::warn!("null callback registered, nothing to invoke");
            return;
        };
        let cursor = match read_cursor(cursor) {
            Ok(cursor) => cursor,
            Err(message) => {
                bridge::deliver(callback, Err(message.to_string()));
                return;
            }
        };
        let Some(state) = registry::get(handle) else {
            bridge::deliver(callback, Err("unknown client handle".to_string()));
            return;
        };
        state.fetch_with_callback(cursor, callback);
    }));
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an album returned by `aria_get_album_blocking` or passed to a
/// callback. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn aria_album_free(album: *mut FfiAlbumModel) {
    if album.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let album = unsafe { Box::from_raw(album) };
        free_cstr(album.cursor);
        free_cstr(album.title);
        free_cstr(album.coverart);
        if !album.artist.is_null() {
            let artist = unsafe { Box::from_raw(album.artist) };
            free_cstr(artist.cursor);
            free_cstr(artist.name);
            free_cstr(artist.image);
        }
    }));
}

/// Free an error string produced by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn aria_string_free(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { CString::from_raw(s) });
        }));
    }
}

fn free_cstr(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

fn clear_error(error_out: *mut *mut c_char) {
    if !error_out.is_null() {
        unsafe { *error_out = ptr::null_mut() };
    }
}

fn fail(error_out: *mut *mut c_char, message: &str) -> *mut FfiAlbumModel {
    if !error_out.is_null() {
        unsafe { *error_out = types::error_cstr(message) };
    }
    ptr::null_mut()
}

fn read_cursor(cursor: *const c_char) -> Result<String, &'static str> {
    if cursor.is_null() {
        return Err("null argument: cursor");
    }
    unsafe { CStr::from_ptr(cursor) }
        .to_str()
        .map(str::to_string)
        .map_err(|_| "invalid cursor: not valid UTF-8")
}

// ---------------------------------------------------------------------------
// Boundary tests
// ---------------------------------------------------------------------------
