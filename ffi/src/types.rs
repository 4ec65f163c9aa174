//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core DTO but uses C-compatible representations:
//! `*mut c_char` instead of `String`, a nullable pointer instead of
//! `Option`, and a `u8` flag instead of `bool`. Conversion functions live
//! here to keep `lib.rs` focused on the `extern "C"` surface. Everything
//! built by `from_core` is released field-by-field in `aria_album_free`.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use aria_core::{AlbumModel, ArtistModel};

/// Callback invoked with the outcome of an asynchronous album request.
///
/// Exactly one of `error` and `album` is non-null. Ownership of the non-null
/// argument transfers to the callee: release the album with
/// `aria_album_free` and the error with `aria_string_free`.
pub type AriaAlbumCallback = extern "C" fn(error: *mut c_char, album: *mut FfiAlbumModel);

/// An artist as exposed to C. All strings are owned, null-terminated copies.
#[repr(C)]
pub struct FfiArtistModel {
    pub cursor: *mut c_char,
    pub name: *mut c_char,
    /// Null when the server has no image for this artist.
    pub image: *mut c_char,
}

/// An album as exposed to C.
#[repr(C)]
pub struct FfiAlbumModel {
    /// Canonical cursor for this album, reusable as a request input.
    pub cursor: *mut c_char,
    pub title: *mut c_char,
    /// Null when the artist is unknown.
    pub artist: *mut FfiArtistModel,
    /// Null when no cover art is available.
    pub coverart: *mut c_char,
    /// Nonzero when the album is part of the user's library.
    pub in_library: u8,
}

impl FfiArtistModel {
    fn from_core(artist: ArtistModel) -> *mut Self {
        Box::into_raw(Box::new(FfiArtistModel {
            cursor: owned_cstr(artist.cursor),
            name: owned_cstr(artist.name),
            image: optional_cstr(artist.image),
        }))
    }
}

impl FfiAlbumModel {
    /// Convert a core model into a heap-allocated boundary model.
    ///
    /// Panics on interior NUL bytes; callers wrap the conversion in
    /// `catch_unwind` and report a marshaling failure instead.
    pub(crate) fn from_core(album: AlbumModel) -> *mut Self {
        Box::into_raw(Box::new(FfiAlbumModel {
            cursor: owned_cstr(album.cursor),
            title: owned_cstr(album.title),
            artist: album
                .artist
                .map(FfiArtistModel::from_core)
                .unwrap_or(ptr::null_mut()),
            coverart: optional_cstr(album.coverart),
            in_library: u8::from(album.in_library),
        }))
    }
}

fn owned_cstr(s: String) -> *mut c_char {
    CString::new(s).unwrap().into_raw()
}

fn optional_cstr(s: Option<String>) -> *mut c_char {
    s.map(owned_cstr).unwrap_or(ptr::null_mut())
}

/// Render an error message as an owned C string, substituting a fixed text
/// when the message itself cannot be represented.
pub(crate) fn error_cstr(message: &str) -> *mut c_char {
    CString::new(message)
        .unwrap_or_else(|_| CString::new("internal error: unrepresentable message").unwrap())
        .into_raw()
}
