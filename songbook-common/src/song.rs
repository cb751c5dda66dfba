//! Song record and request bodies
//!
//! Field names on the wire follow the catalog's JSON contract: the id is
//! exposed as `_id` and timestamps as `createdAt` / `updatedAt`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// A persisted song record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Opaque id assigned by the store on creation
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated field set, ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFields {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
}

impl SongFields {
    /// Check the record invariants: title and artist present and non-blank
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push("title is required");
        }
        if self.artist.trim().is_empty() {
            problems.push("artist is required");
        }
        validation_result(problems)
    }
}

/// Body of `POST /api/songs`
///
/// Required fields are optional here so that a missing field is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl NewSong {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            artist: Some(artist.into()),
            album: None,
            genre: None,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Validate and convert into the field set stored by the repository
    pub fn into_fields(self) -> Result<SongFields> {
        let fields = SongFields {
            title: self.title.unwrap_or_default(),
            artist: self.artist.unwrap_or_default(),
            album: self.album,
            genre: self.genre,
        };
        fields.validate()?;
        Ok(fields)
    }
}

/// Body of `PUT /api/songs/:id`
///
/// Each field distinguishes "absent" (`None`, left unchanged) from an explicit
/// JSON `null` (`Some(None)`). Unknown fields such as an echoed `_id` are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongPatch {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub artist: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub album: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub genre: Option<Option<String>>,
}

impl SongPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Some(title.into()));
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(Some(artist.into()));
        self
    }

    /// Set the album, or clear it with `None`
    pub fn album(mut self, album: Option<String>) -> Self {
        self.album = Some(album);
        self
    }

    /// Set the genre, or clear it with `None`
    pub fn genre(mut self, genre: Option<String>) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.genre.is_none()
    }

    /// Check the fields this patch sets
    ///
    /// Stored records already satisfy the invariants, so a patch is valid when
    /// every title or artist it carries is non-blank. Clearing either one with
    /// `null` is rejected.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if matches!(&self.title, Some(title) if is_blank(title)) {
            problems.push("title is required");
        }
        if matches!(&self.artist, Some(artist) if is_blank(artist)) {
            problems.push("artist is required");
        }
        validation_result(problems)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Maps a present field (including `null`) to `Some`, leaving absence to `default`
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validation_result(problems: Vec<&str>) -> Result<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Song validation failed: {}",
            problems.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_song_requires_title_and_artist() {
        let err = NewSong::default().into_fields().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("title is required"), "{}", message);
        assert!(message.contains("artist is required"), "{}", message);
    }

    #[test]
    fn test_new_song_rejects_blank_title() {
        let result = NewSong::new("   ", "Drake").into_fields();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_new_song_keeps_optional_fields_as_given() {
        let fields = NewSong::new("A", "X").with_album("").into_fields().unwrap();
        assert_eq!(fields.album.as_deref(), Some(""));
        assert_eq!(fields.genre, None);
    }

    #[test]
    fn test_patch_distinguishes_absent_and_null() {
        let patch: SongPatch = serde_json::from_value(json!({
            "_id": "ignored",
            "album": null,
            "title": "New Title"
        }))
        .unwrap();

        assert_eq!(patch.title, Some(Some("New Title".to_string())));
        assert_eq!(patch.album, Some(None));
        assert_eq!(patch.artist, None);
        assert_eq!(patch.genre, None);
    }

    #[test]
    fn test_patch_validate_accepts_partial() {
        let patch = SongPatch::default().title("One Dance").album(None);
        assert!(patch.validate().is_ok());
        assert!(SongPatch::default().validate().is_ok());
        assert!(SongPatch::default().genre(None).validate().is_ok());
    }

    #[test]
    fn test_patch_rejects_null_or_blank_required_fields() {
        let null_artist: SongPatch = serde_json::from_value(json!({ "artist": null })).unwrap();
        assert!(matches!(null_artist.validate(), Err(Error::Validation(_))));

        let err = SongPatch::default().title("  ").artist("").validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("title is required"), "{}", message);
        assert!(message.contains("artist is required"), "{}", message);
    }

    #[test]
    fn test_patch_serializes_clear_as_null() {
        let value = serde_json::to_value(SongPatch::default().genre(None)).unwrap();
        assert_eq!(value, json!({ "genre": null }));
    }

    #[test]
    fn test_song_wire_names() {
        let song = Song {
            id: "abc".to_string(),
            title: "A".to_string(),
            artist: "X".to_string(),
            album: None,
            genre: Some("Pop".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["_id"], "abc");
        assert!(value["album"].is_null());
        assert!(value["createdAt"].is_string());
        assert!(value["updatedAt"].is_string());
    }
}
