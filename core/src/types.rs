//! Domain DTOs for the album API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently of
//! the mock-server crate; integration tests catch schema drift. Fields use
//! owned types so values can later be marshaled across the FFI boundary
//! without lifetime concerns. The wire format uses camelCase names.

use serde::{Deserialize, Serialize};

/// A single album as served by the library API.
///
/// `cursor` is the canonical identifier for the album resource. The request
/// executor overwrites whatever the server sent with the canonical
/// re-encoding of the requested resource, so callers always get back a
/// cursor they can reuse verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlbumModel {
    pub cursor: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<ArtistModel>,
    #[serde(default)]
    pub coverart: Option<String>,
    pub in_library: bool,
}

/// The artist nested inside an [`AlbumModel`], when the server knows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistModel {
    pub cursor: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}
