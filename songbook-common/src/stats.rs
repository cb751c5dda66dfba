//! Statistics summary types and normalization rules
//!
//! Artist and album values are grouped case-insensitively (ASCII folding).
//! A missing or empty album falls into the [`SINGLE_ALBUM`] bucket. Genre is
//! grouped on its raw value.

use serde::{Deserialize, Serialize};

/// Bucket for songs released without an album
pub const SINGLE_ALBUM: &str = "Single";

/// Grouping key for an artist
pub fn artist_key(artist: &str) -> String {
    artist.to_ascii_lowercase()
}

/// Grouping key for an album, with the "Single" fallback
pub fn album_key(album: Option<&str>) -> String {
    match album {
        None | Some("") => SINGLE_ALBUM.to_string(),
        Some(album) => album.to_ascii_lowercase(),
    }
}

/// Share of `count` in `total` as a percentage; 0 when `total` is 0
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Response body of `GET /api/songs/stats/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_songs: u64,
    pub total_artists: u64,
    pub total_albums: u64,
    pub total_genres: u64,
    pub genre_stats: Vec<GenreStat>,
    pub artist_stats: Vec<ArtistStat>,
    pub album_stats: Vec<AlbumStat>,
}

/// Songs per raw genre value; `None` groups songs without a genre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreStat {
    #[serde(rename = "_id")]
    pub genre: Option<String>,
    pub count: u64,
    pub percentage: f64,
}

/// Songs per lower-cased artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistStat {
    #[serde(rename = "_id")]
    pub artist: String,
    pub songs: u64,
    pub percentage: f64,
}

/// Songs per lower-cased album ("Single" for none)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumStat {
    #[serde(rename = "_id")]
    pub album: String,
    pub songs: u64,
}
