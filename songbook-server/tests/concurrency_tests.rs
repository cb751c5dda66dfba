//! Concurrency tests against a file-backed database
//!
//! These run on the same multi-connection WAL pool the server uses, so
//! writers really contend with each other and with the statistics reads.

use songbook_common::db::init_database;
use songbook_common::{NewSong, SongPatch};
use songbook_server::db::{songs, stats};
use sqlx::SqlitePool;
use tempfile::TempDir;

const SONGS: usize = 8;
const ROUNDS: usize = 50;

/// Test helper: Open a fresh database file in a temporary directory
async fn setup_pool() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("songbook.db"))
        .await
        .expect("Should open database");
    (dir, pool)
}

async fn seed(pool: &SqlitePool) -> Vec<String> {
    let mut ids = Vec::new();
    for i in 0..SONGS {
        let fields = NewSong::new(format!("Song {}", i), format!("Artist {}", i % 3))
            .with_album("Album")
            .into_fields()
            .unwrap();
        ids.push(songs::create_song(pool, &fields).await.unwrap().id);
    }
    ids
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_updates_on_different_songs_all_succeed() {
    let (_dir, pool) = setup_pool().await;
    let ids = seed(&pool).await;

    let mut handles = Vec::new();
    for round in 0..ROUNDS {
        for id in &ids {
            let pool = pool.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                let patch = SongPatch::default()
                    .title(format!("Round {}", round))
                    .genre(Some(format!("Genre {}", round % 4)));
                songs::update_song(&pool, &id, patch).await
            }));
        }
    }

    let mut failures = Vec::new();
    for handle in handles {
        if let Err(e) = handle.await.expect("Update task panicked") {
            failures.push(e.to_string());
        }
    }
    assert!(failures.is_empty(), "{} updates failed, first: {:?}", failures.len(), failures.first());

    let listed = songs::list_songs(&pool).await.unwrap();
    assert_eq!(listed.len(), SONGS);
    for song in &listed {
        assert!(song.title.starts_with("Round "), "unexpected title {}", song.title);
        assert_eq!(song.album.as_deref(), Some("Album"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_summaries_during_concurrent_writes_all_succeed() {
    let (_dir, pool) = setup_pool().await;
    let ids = seed(&pool).await;

    let mut writers = Vec::new();
    for round in 0..ROUNDS {
        {
            let pool = pool.clone();
            let id = ids[round % SONGS].clone();
            writers.push(tokio::spawn(async move {
                let patch = SongPatch::default().artist(format!("Artist {}", round % 5));
                songs::update_song(&pool, &id, patch).await.map(|_| ())
            }));
        }

        let pool = pool.clone();
        writers.push(tokio::spawn(async move {
            let fields = NewSong::new("Extra", "Guest").into_fields().unwrap();
            songs::create_song(&pool, &fields).await.map(|_| ())
        }));
    }

    let mut readers = Vec::new();
    for _ in 0..ROUNDS {
        let pool = pool.clone();
        readers.push(tokio::spawn(async move { stats::summarize(&pool).await }));
    }

    for handle in writers {
        handle
            .await
            .expect("Writer task panicked")
            .expect("Concurrent write should succeed");
    }
    for handle in readers {
        let summary = handle
            .await
            .expect("Reader task panicked")
            .expect("Summary during writes should succeed");
        assert!(summary.total_songs >= SONGS as u64);
    }

    let summary = stats::summarize(&pool).await.unwrap();
    assert_eq!(summary.total_songs, (SONGS + ROUNDS) as u64);
    assert_eq!(
        summary.artist_stats.iter().map(|a| a.songs).sum::<u64>(),
        summary.total_songs
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_deletes_and_updates_report_not_found() {
    let (_dir, pool) = setup_pool().await;
    let ids = seed(&pool).await;

    let mut handles = Vec::new();
    for id in &ids {
        {
            let pool = pool.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                songs::delete_song(&pool, &id).await.map(|_| ())
            }));
        }

        let pool = pool.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            songs::update_song(&pool, &id, SongPatch::default().title("Late"))
                .await
                .map(|_| ())
        }));
    }

    for handle in handles {
        match handle.await.expect("Task panicked") {
            Ok(()) | Err(songbook_common::Error::NotFound(_)) => {}
            Err(e) => panic!("Unexpected error under contention: {}", e),
        }
    }

    assert!(songs::list_songs(&pool).await.unwrap().is_empty());
}
