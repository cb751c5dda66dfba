//! Song repository
//!
//! CRUD access to the `songs` table. Ids are random UUIDs rendered as text and
//! treated as opaque strings on lookup.

use chrono::{DateTime, SecondsFormat, Utc};
use songbook_common::{Error, Result, Song, SongFields, SongPatch};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

const SONG_COLUMNS: &str = "id, title, artist, album, genre, created_at, updated_at";

/// Persist a new song and return the stored record
pub async fn create_song(pool: &SqlitePool, fields: &SongFields) -> Result<Song> {
    fields.validate()?;

    let now = format_timestamp(Utc::now());
    let row = sqlx::query(&format!(
        "INSERT INTO songs (id, title, artist, album, genre, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {SONG_COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(&fields.title)
    .bind(&fields.artist)
    .bind(&fields.album)
    .bind(&fields.genre)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    let song = song_from_row(&row)?;
    debug!(id = %song.id, "Inserted song");
    Ok(song)
}

/// All songs, newest first
///
/// Rows sharing a timestamp fall back to insertion order (newest first).
pub async fn list_songs(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "SELECT {SONG_COLUMNS} FROM songs ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(song_from_row).collect()
}

/// Load a single song by id
pub async fn find_song(pool: &SqlitePool, id: &str) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(song_from_row).transpose()
}

/// Apply `patch` to the song at `id` and return the updated record
///
/// The merge happens inside a single `UPDATE`, so it takes the write lock
/// directly and never reads a snapshot that a concurrent writer can
/// invalidate. Never creates a record: a missing id is [`Error::NotFound`],
/// reported ahead of any validation problem.
pub async fn update_song(pool: &SqlitePool, id: &str, patch: SongPatch) -> Result<Song> {
    if let Err(invalid) = patch.validate() {
        if find_song(pool, id).await?.is_none() {
            return Err(Error::NotFound(format!("song {}", id)));
        }
        return Err(invalid);
    }

    let (set_album, album) = (patch.album.is_some(), patch.album.flatten());
    let (set_genre, genre) = (patch.genre.is_some(), patch.genre.flatten());

    // Absent title/artist bind NULL and keep the stored value
    let row = sqlx::query(&format!(
        "UPDATE songs
         SET title = COALESCE(?, title),
             artist = COALESCE(?, artist),
             album = CASE WHEN ? THEN ? ELSE album END,
             genre = CASE WHEN ? THEN ? ELSE genre END,
             updated_at = ?
         WHERE id = ?
         RETURNING {SONG_COLUMNS}"
    ))
    .bind(patch.title.flatten())
    .bind(patch.artist.flatten())
    .bind(set_album)
    .bind(album)
    .bind(set_genre)
    .bind(genre)
    .bind(format_timestamp(Utc::now()))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("song {}", id)))?;

    let song = song_from_row(&row)?;
    debug!(id = %song.id, "Updated song");
    Ok(song)
}

/// Hard-delete the song at `id`
pub async fn delete_song(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("song {}", id)));
    }

    debug!(id, "Deleted song");
    Ok(())
}

/// Fixed microsecond precision keeps text order equal to time order
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            Error::Database(sqlx::Error::ColumnDecode {
                index: column.to_string(),
                source: Box::new(e),
            })
        })
}

fn song_from_row(row: &SqliteRow) -> Result<Song> {
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Song {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        album: row.try_get("album")?,
        genre: row.try_get("genre")?,
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}
