//! Integration tests for the songbook client against a live server
//!
//! Each test starts songbook-server on an ephemeral port backed by a fresh
//! in-memory database.

use songbook_cli::{ClientError, SearchField, SongCatalog, SongbookClient};
use songbook_common::db::init_memory_database;
use songbook_common::{NewSong, SongPatch};
use songbook_server::{build_router, AppState};

/// Test helper: Serve a fresh app and return a client pointed at it
async fn spawn_server() -> SongbookClient {
    let db = init_memory_database()
        .await
        .expect("Should create in-memory database");
    let app = build_router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    SongbookClient::new(&format!("http://{}", addr)).unwrap()
}

#[tokio::test]
async fn test_health() {
    let client = spawn_server().await;

    let health = client.health().await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.module, "songbook-server");
}

#[tokio::test]
async fn test_create_list_update_delete() {
    let client = spawn_server().await;

    let first = client
        .create_song(&NewSong::new("Hello", "Adele").with_album("25").with_genre("Pop"))
        .await
        .unwrap();
    let second = client
        .create_song(&NewSong::new("Hotline Bling", "Drake"))
        .await
        .unwrap();

    let songs = client.list_songs().await.unwrap();
    let ids: Vec<&str> = songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let updated = client
        .update_song(&first.id, &SongPatch::default().title("Hello (Live)").album(None))
        .await
        .unwrap();
    assert_eq!(updated.title, "Hello (Live)");
    assert_eq!(updated.artist, "Adele");
    assert_eq!(updated.album, None);
    assert_eq!(updated.genre.as_deref(), Some("Pop"));

    let confirmation = client.delete_song(&second.id).await.unwrap();
    assert_eq!(confirmation.message, "Song deleted");

    let songs = client.list_songs().await.unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].id, first.id);
}

#[tokio::test]
async fn test_validation_error_is_decoded() {
    let client = spawn_server().await;

    let err = client
        .create_song(&NewSong::new("", "Adele"))
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, error, details } => {
            assert_eq!(status, 400);
            assert_eq!(error, "Failed to create song");
            assert!(details.unwrap_or_default().contains("title"));
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_song_is_not_found() {
    let client = spawn_server().await;

    let err = client
        .update_song("no-such-id", &SongPatch::default().title("X"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Song not found"));

    let err = client.delete_song("no-such-id").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_stats_summary() {
    let client = spawn_server().await;

    client
        .create_song(&NewSong::new("A", "X").with_album("").with_genre("Pop"))
        .await
        .unwrap();
    client
        .create_song(&NewSong::new("B", "x").with_album("S1").with_genre("Pop"))
        .await
        .unwrap();

    let stats = client.stats_summary().await.unwrap();

    assert_eq!(stats.total_songs, 2);
    assert_eq!(stats.total_artists, 1);
    assert_eq!(stats.total_albums, 2);
    assert_eq!(stats.total_genres, 1);
    assert_eq!(stats.genre_stats[0].genre.as_deref(), Some("Pop"));
    assert_eq!(stats.genre_stats[0].percentage, 100.0);
    assert_eq!(stats.artist_stats[0].artist, "x");
}

#[tokio::test]
async fn test_catalog_mirrors_server() {
    let client = spawn_server().await;
    let mut catalog = SongCatalog::new();

    client
        .create_song(&NewSong::new("Existing", "Someone"))
        .await
        .unwrap();
    catalog.refresh(&client).await.unwrap();
    assert_eq!(catalog.len(), 1);

    let created = catalog
        .create(&client, &NewSong::new("Hello", "Adele").with_genre("Pop"))
        .await
        .unwrap();
    assert_eq!(catalog.songs()[0].id, created.id);

    catalog
        .update(&client, &created.id, &SongPatch::default().artist("ADELE"))
        .await
        .unwrap();
    assert_eq!(catalog.filter(SearchField::Artist, "adele").len(), 1);

    // The local mirror matches a fresh fetch
    let server_songs = client.list_songs().await.unwrap();
    assert_eq!(catalog.songs(), server_songs.as_slice());

    catalog.delete(&client, &created.id).await.unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.last_error().is_none());

    let result = catalog.delete(&client, &created.id).await;
    assert!(result.is_err());
    assert_eq!(catalog.len(), 1);
    assert!(catalog.last_error().unwrap().contains("Song not found"));
}
