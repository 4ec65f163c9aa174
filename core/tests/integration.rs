//! End-to-end fetch tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread, then
//! drives `LibraryClient` over real HTTP. Validates cursor handling, status
//! mapping, and schema compatibility end-to-end.

use aria_core::{cursor, ClientError, LibraryClient};
use mock_server::{encode_cursor, Album, Artist};

fn library() -> Vec<Album> {
    vec![
        Album {
            cursor: encode_cursor("library:album:we-major"),
            title: "We Major".to_string(),
            artist: Some(Artist {
                cursor: encode_cursor("library:artist:fort-minor"),
                name: "Fort Minor".to_string(),
                image: None,
            }),
            coverart: None,
            in_library: true,
        },
        Album {
            cursor: encode_cursor("library:album:demon-days"),
            title: "Demon Days".to_string(),
            artist: None,
            coverart: Some("http://example.com/demon-days.png".to_string()),
            in_library: false,
        },
    ]
}

/// Start the mock server on a random port and return its base URL.
fn start_server(albums: Vec<Album>) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, albums).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn fetch_album_end_to_end() {
    let base_url = start_server(library());
    let client = LibraryClient::connect(&base_url).unwrap();

    let cursor = encode_cursor("library:album:we-major");
    let album = client.fetch_album(&cursor).await.unwrap();

    assert_eq!(album.cursor, cursor);
    assert_eq!(album.title, "We Major");
    assert_eq!(album.artist.unwrap().name, "Fort Minor");
    assert!(album.in_library);
}

#[tokio::test]
async fn alias_cursor_resolves_to_canonical_album() {
    let base_url = start_server(library());
    let client = LibraryClient::connect(&base_url).unwrap();

    let canonical = encode_cursor("library:album:demon-days");
    let alias = canonical.trim_end_matches('=');
    assert_ne!(alias, canonical, "test needs a padded cursor");

    let album = client.fetch_album(alias).await.unwrap();
    assert_eq!(album.cursor, canonical);
    assert_eq!(album.title, "Demon Days");
}

#[tokio::test]
async fn missing_album_then_success_on_same_client() {
    let base_url = start_server(library());
    let client = LibraryClient::connect(&base_url).unwrap();

    let err = client
        .fetch_album(&encode_cursor("library:album:does-not-exist"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));

    let album = client
        .fetch_album(&encode_cursor("library:album:we-major"))
        .await
        .unwrap();
    assert_eq!(album.title, "We Major");
}

#[tokio::test]
async fn invalid_cursor_fails_without_a_server() {
    // Nothing listens on this port; a decode failure must not even try it.
    let client = LibraryClient::connect("http://127.0.0.1:9").unwrap();

    let err = client.fetch_album("!!not-base64!!").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = LibraryClient::connect(&format!("http://{addr}")).unwrap();
    let err = client
        .fetch_album(&cursor::encode("library:album:we-major"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[test]
fn connect_rejects_malformed_base_url() {
    let err = LibraryClient::connect("not a url").unwrap_err();
    assert!(matches!(err, ClientError::Configuration(_)));
}
