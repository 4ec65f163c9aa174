use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub cursor: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub cursor: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<Artist>,
    #[serde(default)]
    pub coverart: Option<String>,
    pub in_library: bool,
}

/// Albums keyed by their canonical cursor.
pub type Library = Arc<HashMap<String, Album>>;

/// Encode a resource URI into the cursor form the API serves.
pub fn encode_cursor(uri: &str) -> String {
    STANDARD.encode(uri)
}

pub fn app(albums: Vec<Album>) -> Router {
    let library: Library = Arc::new(
        albums
            .into_iter()
            .map(|album| (album.cursor.clone(), album))
            .collect(),
    );
    Router::new()
        .route("/api/library/albums", get(list_albums))
        .route("/api/library/albums/{cursor}", get(get_album))
        .with_state(library)
}

pub async fn run(listener: TcpListener, albums: Vec<Album>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(albums)).await
}

async fn list_albums(State(library): State<Library>) -> Json<Vec<Album>> {
    let mut albums: Vec<Album> = library.values().cloned().collect();
    albums.sort_by(|a, b| a.title.cmp(&b.title));
    Json(albums)
}

async fn get_album(
    State(library): State<Library>,
    Path(cursor): Path<String>,
) -> Result<Json<Album>, StatusCode> {
    // Re-encode after decoding so alias cursors resolve to the same album.
    let uri = STANDARD
        .decode(&cursor)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let canonical = STANDARD.encode(&uri);
    library
        .get(&canonical)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
