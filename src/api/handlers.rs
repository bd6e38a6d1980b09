use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::response::non_empty;
use crate::error::{ApiError, MessageKey};
use crate::logic::translate::{self, SortKey, YearRange};
use crate::model::{SelectQuery, Table};
use crate::store::CatalogStore;

pub type AppState<S> = Arc<S>;

type Rows = Result<Json<Vec<Value>>, ApiError>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Run `query` and answer with its rows, or with `empty` when none match
async fn fetch<S: CatalogStore>(
    store: &S,
    query: SelectQuery,
    empty: impl FnOnce() -> ApiError,
) -> Rows {
    let rows = store.select(&query).await?;
    non_empty(rows, empty).map(Json)
}

// Eras

pub async fn list_eras<S: CatalogStore>(State(store): State<AppState<S>>) -> Rows {
    fetch(&*store, translate::all(Table::Eras), || {
        ApiError::not_found(MessageKey::Message, "No eras found.")
    })
    .await
}

// Artists

pub async fn list_artists<S: CatalogStore>(State(store): State<AppState<S>>) -> Rows {
    fetch(&*store, translate::all(Table::Artists), || {
        ApiError::not_found(MessageKey::Message, "No artists found.")
    })
    .await
}

pub async fn get_artist<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(artist_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::by_id(Table::Artists, &artist_id), || {
        ApiError::not_found(MessageKey::Error, format!("No artist with ID : {}", artist_id))
    })
    .await
}

pub async fn artists_by_country<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(substring): Path<String>,
) -> Rows {
    fetch(&*store, translate::artists_by_nationality(&substring), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No artist in the country beginning with : {}", substring),
        )
    })
    .await
}

pub async fn search_artists<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(substring): Path<String>,
) -> Rows {
    fetch(&*store, translate::artists_by_last_name(&substring), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No artist with last name beggining with : {}", substring),
        )
    })
    .await
}

// Galleries

pub async fn list_galleries<S: CatalogStore>(State(store): State<AppState<S>>) -> Rows {
    fetch(&*store, translate::all(Table::Galleries), || {
        ApiError::not_found(MessageKey::Message, "No galleries found.")
    })
    .await
}

pub async fn get_gallery<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(gallery_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::by_id(Table::Galleries, &gallery_id), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings found for the gallery with ID: {} ", gallery_id),
        )
    })
    .await
}

pub async fn galleries_by_country<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(substring): Path<String>,
) -> Rows {
    fetch(&*store, translate::galleries_by_country(&substring), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No galleries in the country beginning with : {}", substring),
        )
    })
    .await
}

// Genres

pub async fn list_genres<S: CatalogStore>(State(store): State<AppState<S>>) -> Rows {
    fetch(&*store, translate::genres(), || {
        ApiError::not_found(MessageKey::Message, "No genres found.")
    })
    .await
}

pub async fn get_genre<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(genre_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::genre_by_id(&genre_id), || {
        ApiError::not_found(MessageKey::Message, format!("No genre with ID : {}", genre_id))
    })
    .await
}

pub async fn genres_of_painting<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(painting_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::genres_of_painting(&painting_id), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings with genre ID : {}", painting_id),
        )
    })
    .await
}

// Paintings

pub async fn list_paintings<S: CatalogStore>(State(store): State<AppState<S>>) -> Rows {
    fetch(&*store, translate::paintings(), || {
        ApiError::not_found(MessageKey::Message, "No paintings found.")
    })
    .await
}

pub async fn sorted_paintings<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(sort_by): Path<String>,
) -> Rows {
    let key: SortKey = sort_by.parse()?;
    fetch(&*store, translate::paintings_sorted(key), || {
        ApiError::not_found(MessageKey::Error, "No paintings found.")
    })
    .await
}

pub async fn get_painting<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(painting_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::painting_by_id(&painting_id), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings with ID : {}", painting_id),
        )
    })
    .await
}

pub async fn search_paintings<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(substring): Path<String>,
) -> Rows {
    fetch(&*store, translate::paintings_with_title(&substring), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings with title beggining with : {}", substring),
        )
    })
    .await
}

pub async fn paintings_between_years<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path((start, end)): Path<(String, String)>,
) -> Rows {
    // Validated before querying so a reversed range is never reported as empty
    let range = YearRange::parse(&start, &end)?;
    fetch(&*store, translate::paintings_between(range), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings between the years {} and {} ", start, end),
        )
    })
    .await
}

pub async fn paintings_in_gallery<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(gallery_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::paintings_in_gallery(&gallery_id), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings in galleries starting with {} ", gallery_id),
        )
    })
    .await
}

pub async fn paintings_by_artist<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(artist_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::paintings_by_artist(&artist_id), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings  with artists starting with {} ", artist_id),
        )
    })
    .await
}

pub async fn paintings_by_artist_country<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(prefix): Path<String>,
) -> Rows {
    fetch(&*store, translate::paintings_by_artist_nationality(&prefix), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings with artists whose nationality starts with {}", prefix),
        )
    })
    .await
}

pub async fn paintings_in_genre<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(genre_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::paintings_in_genre(&genre_id), || {
        ApiError::not_found(
            MessageKey::Error,
            format!("No paintings with the genre: {}", genre_id),
        )
    })
    .await
}

pub async fn paintings_in_era<S: CatalogStore>(
    State(store): State<AppState<S>>,
    Path(era_id): Path<String>,
) -> Rows {
    fetch(&*store, translate::paintings_in_era(&era_id), || {
        ApiError::not_found(MessageKey::Error, format!("No paintings with the era: {}", era_id))
    })
    .await
}
