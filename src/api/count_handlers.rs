use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::api::handlers::AppState;
use crate::api::response::{decode_rows, non_empty};
use crate::error::{ApiError, MessageKey};
use crate::logic::aggregate::{self, MinCount};
use crate::logic::translate;
use crate::model::{ArtistCount, ArtistPaintingRow, GenreCount, GenreLinkRow};
use crate::store::CatalogStore;

/// Genre name and painting count for every genre, fewest paintings first
pub async fn genre_counts<S: CatalogStore>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<GenreCount>>, ApiError> {
    let rows = store.select(&translate::genre_links()).await?;
    let rows: Vec<GenreLinkRow> = decode_rows(rows)?;

    let summary = aggregate::genre_summary(rows);
    non_empty(summary, || {
        ApiError::not_found(MessageKey::Message, "No genres found")
    })
    .map(Json)
}

/// "First Last" and painting count for every artist with paintings, most first
pub async fn artist_counts<S: CatalogStore>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<ArtistCount>>, ApiError> {
    let rows = store.select(&translate::artist_paintings()).await?;
    let rows: Vec<ArtistPaintingRow> = decode_rows(rows)?;

    let summary = aggregate::artist_summary(rows);
    non_empty(summary, || {
        ApiError::not_found(MessageKey::Message, "No artists or paintings found")
    })
    .map(Json)
}

/// Genres with more than `min` paintings, most first
pub async fn top_genres<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(min): Path<String>,
) -> Result<Json<Vec<GenreCount>>, ApiError> {
    let min: MinCount = min.parse()?;

    let rows = store.select(&translate::genre_links()).await?;
    let rows: Vec<GenreLinkRow> = decode_rows(rows)?;
    if rows.is_empty() {
        return Err(ApiError::not_found(
            MessageKey::Message,
            "No genres found for specified set number of paintings",
        ));
    }

    let summary = aggregate::top_genres(rows, min);
    non_empty(summary, || {
        ApiError::not_found(
            MessageKey::Message,
            format!("No paintings found with more than {} paintings.", min.0),
        )
    })
    .map(Json)
}
