//! songbook-cli library - terminal client for the songbook REST API
//!
//! A typed HTTP client, a local mirror of the song list with client-side
//! search and pagination, and plain-text rendering of songs and statistics.

pub mod catalog;
pub mod client;
pub mod pagination;
pub mod render;

pub use catalog::{SearchField, SongCatalog};
pub use client::{ClientError, SongbookClient};
pub use pagination::{calculate_pagination, Pagination, DEFAULT_PAGE_SIZE};
