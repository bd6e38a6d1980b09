use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::{count_handlers, handlers};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::store::CatalogStore;

pub fn create_router<S: CatalogStore + 'static>(api: &ApiConfig) -> Router<Arc<S>> {
    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Eras
        .route("/api/eras", get(handlers::list_eras::<S>))
        // Artists
        .route("/api/artists", get(handlers::list_artists::<S>))
        .route("/api/artists/:artist_id", get(handlers::get_artist::<S>))
        .route(
            "/api/artists/country/:substring",
            get(handlers::artists_by_country::<S>),
        )
        .route(
            "/api/artists/search/:substring",
            get(handlers::search_artists::<S>),
        )
        // Galleries
        .route("/api/galleries", get(handlers::list_galleries::<S>))
        .route("/api/galleries/:gallery_id", get(handlers::get_gallery::<S>))
        .route(
            "/api/galleries/country/:substring",
            get(handlers::galleries_by_country::<S>),
        )
        // Genres
        .route("/api/genres", get(handlers::list_genres::<S>))
        .route("/api/genres/:genre_id", get(handlers::get_genre::<S>))
        .route(
            "/api/genres/painting/:painting_id",
            get(handlers::genres_of_painting::<S>),
        )
        // Paintings
        .route("/api/paintings", get(handlers::list_paintings::<S>))
        .route(
            "/api/paintings/sort/:sort_by",
            get(handlers::sorted_paintings::<S>),
        )
        .route("/api/paintings/:painting_id", get(handlers::get_painting::<S>))
        .route(
            "/api/paintings/search/:substring",
            get(handlers::search_paintings::<S>),
        )
        .route(
            "/api/paintings/years/:start/:end",
            get(handlers::paintings_between_years::<S>),
        )
        .route(
            "/api/paintings/galleries/:gallery_id",
            get(handlers::paintings_in_gallery::<S>),
        )
        .route(
            "/api/paintings/artist/:artist_id",
            get(handlers::paintings_by_artist::<S>),
        )
        .route(
            "/api/paintings/artist/country/:prefix",
            get(handlers::paintings_by_artist_country::<S>),
        )
        .route(
            "/api/paintings/genre/:genre_id",
            get(handlers::paintings_in_genre::<S>),
        )
        .route(
            "/api/paintings/era/:era_id",
            get(handlers::paintings_in_era::<S>),
        )
        // Counts
        .route("/api/counts/genres", get(count_handlers::genre_counts::<S>))
        .route("/api/counts/artists", get(count_handlers::artist_counts::<S>))
        .route(
            "/api/counts/topgenres/:min",
            get(count_handlers::top_genres::<S>),
        )
        .layer(CatchPanicLayer::custom(panic_response));

    if api.legacy_status_codes {
        router.layer(middleware::map_response(legacy_status))
    } else {
        router
    }
}

/// Answer a panicking handler the way any other unhandled fault is answered
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    ApiError::Unhandled(message).into_response()
}

/// Rejected input used to be answered with 404, like an empty result
async fn legacy_status(mut response: Response) -> Response {
    if response.status() == StatusCode::BAD_REQUEST {
        *response.status_mut() = StatusCode::NOT_FOUND;
    }
    response
}
