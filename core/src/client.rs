//! Request executor for the album API.
//!
//! # Design
//! `LibraryClient` owns only the injected [`Transport`]; it is cheap to clone
//! and safe to share, which is what lets one client serve both the blocking
//! and the callback invocation modes of the FFI layer. Every fetch runs the
//! same pipeline: decode the cursor, GET the resource, check the status,
//! parse the body. Each stage maps onto exactly one [`ClientError`] kind and
//! a failing stage never produces a partial model.

use std::sync::Arc;

use crate::cursor;
use crate::error::ClientError;
use crate::http::{HttpResponse, HttpTransport, Transport};
use crate::types::AlbumModel;

/// Client for the album library API, shared by both invocation modes.
#[derive(Clone)]
pub struct LibraryClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for LibraryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryClient").finish_non_exhaustive()
    }
}

impl LibraryClient {
    /// Build a client around the production HTTP transport.
    ///
    /// Fails with [`ClientError::Configuration`] when `base_url` does not
    /// parse; no client exists afterwards in that case.
    pub fn connect(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(base_url)?)))
    }

    /// Build a client around an injected transport. Used by tests.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch one album by cursor.
    ///
    /// The returned model's `cursor` field is the canonical re-encoding of
    /// the decoded resource identifier, not necessarily byte-identical to
    /// the input when the input was a non-canonical alias.
    pub async fn fetch_album(&self, cursor: &str) -> Result<AlbumModel, ClientError> {
        let uri = cursor::decode(cursor)?;
        let canonical = cursor::encode(&uri);
        tracing::debug!(%uri, "fetching album");

        let path = format!("/api/library/albums/{}", urlencoding::encode(&canonical));
        let response = self.transport.get(&path).await?;
        check_status(&response)?;

        let mut album: AlbumModel = serde_json::from_str(&response.body)
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        album.cursor = canonical;
        Ok(album)
    }
}

/// Map non-success statuses to `Transport` errors with distinguishing text.
fn check_status(response: &HttpResponse) -> Result<(), ClientError> {
    match response.status {
        200 => Ok(()),
        404 => Err(ClientError::Transport(
            "album not found (HTTP 404)".to_string(),
        )),
        status => Err(ClientError::Transport(format!(
            "unexpected status {status}: {}",
            response.body
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Serves queued responses in order and records every requested path.
    struct MockTransport {
        calls: AtomicUsize,
        paths: Mutex<Vec<String>>,
        responses: Mutex<VecDeque<Result<HttpResponse, ClientError>>>,
    }

    impl MockTransport {
        fn new(responses: Vec<Result<HttpResponse, ClientError>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                paths: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            })
        }

        fn ok(status: u16, body: &str) -> Result<HttpResponse, ClientError> {
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn paths(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, path: &str) -> Result<HttpResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.paths.lock().unwrap().push(path.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected transport call")
        }
    }

    const ALBUM_BODY: &str = r#"{
        "cursor":"ignored-by-client",
        "title":"We Major",
        "artist":{"cursor":"YXJ0aXN0","name":"Fort Minor"},
        "inLibrary":true
    }"#;

    #[tokio::test]
    async fn invalid_cursor_never_reaches_transport() {
        let transport = MockTransport::new(Vec::new());
        let client = LibraryClient::with_transport(transport.clone());

        let err = client.fetch_album("!!not-base64!!").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn fetch_album_success() {
        let transport = MockTransport::new(vec![MockTransport::ok(200, ALBUM_BODY)]);
        let client = LibraryClient::with_transport(transport.clone());
        let cursor = cursor::encode("library:album:we-major");

        let album = client.fetch_album(&cursor).await.unwrap();
        assert_eq!(album.title, "We Major");
        assert_eq!(album.artist.unwrap().name, "Fort Minor");
        assert!(album.in_library);
        assert_eq!(transport.calls(), 1);

        let expected_path = format!(
            "/api/library/albums/{}",
            urlencoding::encode(&cursor)
        );
        assert_eq!(transport.paths(), vec![expected_path]);
    }

    #[tokio::test]
    async fn alias_cursor_yields_canonical_model_cursor() {
        let transport = MockTransport::new(vec![MockTransport::ok(200, ALBUM_BODY)]);
        let client = LibraryClient::with_transport(transport.clone());

        let canonical = cursor::encode("a"); // "YQ=="
        let alias = canonical.trim_end_matches('=');

        let album = client.fetch_album(alias).await.unwrap();
        assert_eq!(album.cursor, canonical);

        // The request itself also goes out under the canonical identifier.
        let paths = transport.paths();
        let encoded = urlencoding::encode(&canonical);
        assert!(paths[0].ends_with(encoded.as_ref()));
    }

    #[tokio::test]
    async fn not_found_maps_to_transport_error() {
        let transport = MockTransport::new(vec![MockTransport::ok(404, "")]);
        let client = LibraryClient::with_transport(transport);

        let err = client
            .fetch_album(&cursor::encode("library:album:missing"))
            .await
            .unwrap_err();
        match err {
            ClientError::Transport(msg) => assert!(msg.contains("not found")),
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_maps_to_transport_error() {
        let transport = MockTransport::new(vec![MockTransport::ok(500, "boom")]);
        let client = LibraryClient::with_transport(transport);

        let err = client
            .fetch_album(&cursor::encode("library:album:we-major"))
            .await
            .unwrap_err();
        match err {
            ClientError::Transport(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("boom"));
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error() {
        let transport = MockTransport::new(vec![MockTransport::ok(200, "not json")]);
        let client = LibraryClient::with_transport(transport);

        let err = client
            .fetch_album(&cursor::encode("library:album:we-major"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn transport_failure_does_not_poison_the_client() {
        let transport = MockTransport::new(vec![
            Err(ClientError::Transport("connection refused".to_string())),
            MockTransport::ok(200, ALBUM_BODY),
        ]);
        let client = LibraryClient::with_transport(transport.clone());
        let cursor = cursor::encode("library:album:we-major");

        let err = client.fetch_album(&cursor).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));

        let album = client.fetch_album(&cursor).await.unwrap();
        assert_eq!(album.title, "We Major");
        assert_eq!(transport.calls(), 2);
    }
}
