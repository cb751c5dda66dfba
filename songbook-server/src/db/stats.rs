//! Statistics aggregation over the songs table
//!
//! Each breakdown is one grouping query. The queries of a single
//! [`summarize`] call run concurrently and are not isolated from concurrent
//! writes, so a summary taken during writes may be slightly inconsistent with
//! itself.
//!
//! Equal counts are ordered by group key ascending (a `NULL` genre first).

use songbook_common::stats::{percentage, SINGLE_ALBUM};
use songbook_common::{AlbumStat, ArtistStat, Error, GenreStat, Result, StatsSummary};
use sqlx::SqlitePool;

/// Album grouping key: "Single" for NULL or empty, lower-cased otherwise.
/// The single `?` binds [`SINGLE_ALBUM`].
const ALBUM_KEY: &str = "CASE WHEN album IS NULL OR album = '' THEN ? ELSE LOWER(album) END";

/// Compute the catalog summary from scratch
pub async fn summarize(pool: &SqlitePool) -> Result<StatsSummary> {
    let (total_songs, total_artists, total_albums, total_genres, genres, artists, albums) =
        tokio::try_join!(
            count_songs(pool),
            count_artists(pool),
            count_albums(pool),
            count_genres(pool),
            genre_counts(pool),
            artist_counts(pool),
            album_counts(pool),
        )
        .map_err(|e| Error::Aggregation(e.to_string()))?;

    let total_songs = to_count(total_songs)?;

    let genre_stats = genres
        .into_iter()
        .map(|(genre, count)| {
            let count = to_count(count)?;
            Ok(GenreStat {
                genre,
                count,
                percentage: percentage(count, total_songs),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let artist_stats = artists
        .into_iter()
        .map(|(artist, songs)| {
            let songs = to_count(songs)?;
            Ok(ArtistStat {
                artist,
                songs,
                percentage: percentage(songs, total_songs),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let album_stats = albums
        .into_iter()
        .map(|(album, songs)| {
            Ok(AlbumStat {
                album,
                songs: to_count(songs)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StatsSummary {
        total_songs,
        total_artists: to_count(total_artists)?,
        total_albums: to_count(total_albums)?,
        total_genres: to_count(total_genres)?,
        genre_stats,
        artist_stats,
        album_stats,
    })
}

async fn count_songs(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await
}

async fn count_artists(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(DISTINCT LOWER(artist)) FROM songs")
        .fetch_one(pool)
        .await
}

async fn count_albums(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(&format!("SELECT COUNT(DISTINCT {ALBUM_KEY}) FROM songs"))
        .bind(SINGLE_ALBUM)
        .fetch_one(pool)
        .await
}

/// Raw genre values; songs without a genre are not counted
async fn count_genres(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(DISTINCT genre) FROM songs")
        .fetch_one(pool)
        .await
}

async fn genre_counts(pool: &SqlitePool) -> sqlx::Result<Vec<(Option<String>, i64)>> {
    sqlx::query_as(
        "SELECT genre, COUNT(*) AS count
         FROM songs
         GROUP BY genre
         ORDER BY count DESC, genre ASC",
    )
    .fetch_all(pool)
    .await
}

async fn artist_counts(pool: &SqlitePool) -> sqlx::Result<Vec<(String, i64)>> {
    sqlx::query_as(
        "SELECT LOWER(artist) AS artist_key, COUNT(*) AS songs
         FROM songs
         GROUP BY artist_key
         ORDER BY songs DESC, artist_key ASC",
    )
    .fetch_all(pool)
    .await
}

async fn album_counts(pool: &SqlitePool) -> sqlx::Result<Vec<(String, i64)>> {
    sqlx::query_as(&format!(
        "SELECT {ALBUM_KEY} AS album_key, COUNT(*) AS songs
         FROM songs
         GROUP BY album_key
         ORDER BY songs DESC, album_key ASC"
    ))
    .bind(SINGLE_ALBUM)
    .fetch_all(pool)
    .await
}

fn to_count(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::Aggregation(format!("negative count {}", value)))
}
