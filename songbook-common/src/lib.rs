//! # Songbook Common Library
//!
//! Shared code for the songbook server and client including:
//! - Song and statistics models (wire types)
//! - Normalization rules used by the statistics breakdowns
//! - Configuration loading
//! - Database initialization (behind the `sqlx` feature)

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod song;
pub mod stats;

pub use error::{Error, Result};
pub use song::{NewSong, Song, SongFields, SongPatch};
pub use stats::{AlbumStat, ArtistStat, GenreStat, StatsSummary};
