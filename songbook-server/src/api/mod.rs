//! HTTP API handlers for songbook-server

pub mod health;
pub mod songs;
pub mod stats;

pub use health::health_routes;
pub use songs::{create_song, delete_song, list_songs, update_song};
pub use stats::stats_summary;
