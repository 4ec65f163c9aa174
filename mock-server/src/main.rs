use mock_server::{encode_cursor, Album, Artist};
use tokio::net::TcpListener;

fn sample_library() -> Vec<Album> {
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
            artist: Some(Artist {
                cursor: encode_cursor("library:artist:gorillaz"),
                name: "Gorillaz".to_string(),
                image: Some("http://localhost:8080/coverart/demon-days.png".to_string()),
            }),
            coverart: Some("http://localhost:8080/coverart/demon-days.png".to_string()),
            in_library: false,
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run(listener, sample_library()).await
}
