//! In-memory mirror of the server's song list
//!
//! After each mutating call the local list is patched with the record the
//! server returned, so the mirror matches server state without a refetch.
//! [`SongCatalog::refresh`] replaces it wholesale.

use songbook_common::{NewSong, Song, SongPatch};

use crate::client::{ClientError, SongbookClient};

/// Field a search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SearchField {
    #[default]
    Title,
    Artist,
    Album,
    Genre,
}

impl SearchField {
    /// Value of this field on `song`; missing optional fields read as ""
    pub fn value<'a>(&self, song: &'a Song) -> &'a str {
        match self {
            SearchField::Title => &song.title,
            SearchField::Artist => &song.artist,
            SearchField::Album => song.album.as_deref().unwrap_or(""),
            SearchField::Genre => song.genre.as_deref().unwrap_or(""),
        }
    }
}

/// Case-insensitive substring match; an empty term matches every song
pub fn matches(song: &Song, field: SearchField, term: &str) -> bool {
    field
        .value(song)
        .to_lowercase()
        .contains(&term.to_lowercase())
}

/// Client-side song list
#[derive(Debug, Default)]
pub struct SongCatalog {
    songs: Vec<Song>,
    last_error: Option<String>,
}

impl SongCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Message of the most recent failed call, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the whole list
    pub fn set_songs(&mut self, songs: Vec<Song>) {
        self.songs = songs;
        self.last_error = None;
    }

    /// Insert a newly created song at the front (newest first)
    pub fn add(&mut self, song: Song) {
        self.songs.insert(0, song);
    }

    /// Replace the song with the same id; returns false if it is not mirrored
    pub fn replace(&mut self, song: Song) -> bool {
        match self.songs.iter_mut().find(|s| s.id == song.id) {
            Some(existing) => {
                *existing = song;
                true
            }
            None => false,
        }
    }

    /// Drop the song with `id` from the mirror
    pub fn remove(&mut self, id: &str) -> Option<Song> {
        let index = self.songs.iter().position(|s| s.id == id)?;
        Some(self.songs.remove(index))
    }

    /// Songs whose `field` contains `term`, in list order
    pub fn filter(&self, field: SearchField, term: &str) -> Vec<&Song> {
        self.songs
            .iter()
            .filter(|song| matches(song, field, term))
            .collect()
    }

    /// Refetch the full list from the server
    pub async fn refresh(&mut self, client: &SongbookClient) -> Result<(), ClientError> {
        let songs = self.track(client.list_songs().await)?;
        self.set_songs(songs);
        Ok(())
    }

    /// Create on the server and mirror the stored record
    pub async fn create(&mut self, client: &SongbookClient, song: &NewSong) -> Result<Song, ClientError> {
        let created = self.track(client.create_song(song).await)?;
        self.add(created.clone());
        Ok(created)
    }

    /// Update on the server and mirror the returned record
    pub async fn update(
        &mut self,
        client: &SongbookClient,
        id: &str,
        patch: &SongPatch,
    ) -> Result<Song, ClientError> {
        let updated = self.track(client.update_song(id, patch).await)?;
        if !self.replace(updated.clone()) {
            self.add(updated.clone());
        }
        Ok(updated)
    }

    /// Delete on the server and drop the local copy
    pub async fn delete(&mut self, client: &SongbookClient, id: &str) -> Result<(), ClientError> {
        self.track(client.delete_song(id).await)?;
        self.remove(id);
        Ok(())
    }

    fn track<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(e.to_string()),
        }
        result
    }
}
