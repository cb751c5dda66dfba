//! Song CRUD endpoints
//!
//! Bodies are read as raw JSON and decoded by hand, so malformed JSON, a
//! non-object body and a mistyped field are all reported as a 400 with the
//! same error shape as a failed validation.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use songbook_common::{NewSong, Song, SongPatch};
use tracing::info;

use crate::db;
use crate::error::{ApiContext, ApiError, ApiResult};
use crate::AppState;

/// Confirmation body for a deleted song
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Decode a request body that must be a JSON object
///
/// serde's derived struct decoding would also accept an array of positional
/// fields, so the shape is checked before the typed decode.
fn object_body<T: DeserializeOwned>(
    context: &str,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<T> {
    let Json(value) = payload.map_err(|rejection| ApiError::rejected(context, rejection))?;

    if !value.is_object() {
        return Err(ApiError::BadRequest {
            error: context.to_string(),
            details: "Request body must be a JSON object".to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::BadRequest {
        error: context.to_string(),
        details: e.to_string(),
    })
}

/// GET /api/songs
///
/// All songs, newest first.
pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<Vec<Song>>> {
    let songs = db::songs::list_songs(&state.db)
        .await
        .api_context("Failed to fetch songs")?;

    Ok(Json(songs))
}

/// POST /api/songs
pub async fn create_song(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Song>)> {
    const CONTEXT: &str = "Failed to create song";

    let new_song: NewSong = object_body(CONTEXT, payload)?;
    let fields = new_song.into_fields().api_context(CONTEXT)?;

    let song = db::songs::create_song(&state.db, &fields)
        .await
        .api_context(CONTEXT)?;

    info!(id = %song.id, title = %song.title, "Created song");
    Ok((StatusCode::CREATED, Json(song)))
}

/// PUT /api/songs/:id
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Song>> {
    const CONTEXT: &str = "Failed to update song";

    let patch: SongPatch = object_body(CONTEXT, payload)?;

    let song = db::songs::update_song(&state.db, &id, patch)
        .await
        .api_context(CONTEXT)?;

    info!(id = %song.id, "Updated song");
    Ok(Json(song))
}

/// DELETE /api/songs/:id
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    db::songs::delete_song(&state.db, &id)
        .await
        .api_context("Failed to delete song")?;

    info!(id = %id, "Deleted song");
    Ok(Json(DeleteResponse {
        message: "Song deleted".to_string(),
    }))
}
