//! Async API client core for the album library service.
//!
//! # Overview
//! Fetches album records over HTTP through an injected [`Transport`] and a
//! cursor codec. The crate is FFI-agnostic: the boundary layer (`aria-ffi`)
//! wraps [`LibraryClient`] behind opaque handles and drives it from either a
//! blocking or a callback-based entry point.
//!
//! # Design
//! - `LibraryClient` holds only an `Arc<dyn Transport>`: cheap to clone,
//!   safe to share across worker threads.
//! - Cursors are decoded before any network activity; an invalid cursor
//!   never reaches the transport.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - All per-request failures are data ([`ClientError`]), never panics.

pub mod client;
pub mod cursor;
pub mod error;
pub mod http;
pub mod types;

pub use client::LibraryClient;
pub use error::ClientError;
pub use http::{HttpResponse, HttpTransport, Transport};
pub use types::{AlbumModel, ArtistModel};
