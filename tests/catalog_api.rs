use art_catalog_api::api::routes::create_router;
use art_catalog_api::config::ApiConfig;
use art_catalog_api::model::{Artist, Era, Gallery, Genre, Painting, PaintingGenre, Table};
use art_catalog_api::store::MemoryStore;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn artist(id: i64, first: &str, last: &str, nationality: &str) -> Artist {
    Artist {
        artist_id: id,
        first_name: Some(first.to_string()),
        last_name: last.to_string(),
        nationality: Some(nationality.to_string()),
        gender: None,
        year_of_birth: None,
        year_of_death: None,
        details: None,
        artist_link: None,
    }
}

fn gallery(id: i64, name: &str, country: &str) -> Gallery {
    Gallery {
        gallery_id: id,
        gallery_name: name.to_string(),
        gallery_native_name: None,
        gallery_city: None,
        gallery_address: None,
        gallery_country: Some(country.to_string()),
        latitude: None,
        longitude: None,
        gallery_web_site: None,
        flickr_place_id: None,
        yahoo_woe_id: None,
        google_place_id: None,
    }
}

fn painting(id: i64, artist_id: i64, gallery_id: i64, title: &str, year: i32) -> Painting {
    Painting {
        painting_id: id,
        artist_id: Some(artist_id),
        gallery_id: Some(gallery_id),
        image_file_name: None,
        title: title.to_string(),
        shape_id: None,
        museum_link: None,
        accession_number: None,
        copyright_text: None,
        description: None,
        excerpt: None,
        year_of_work: Some(year),
        width: None,
        height: None,
        medium: Some("Oil on canvas".to_string()),
        cost: None,
        msrp: None,
        google_link: None,
        google_description: None,
        wiki_link: None,
        json_annotations: None,
    }
}

fn genre(id: i64, name: &str, era_id: i64) -> Genre {
    Genre {
        genre_id: id,
        genre_name: name.to_string(),
        era_id: Some(era_id),
        description: None,
        wiki_link: None,
    }
}

fn link(id: i64, painting_id: i64, genre_id: i64) -> PaintingGenre {
    PaintingGenre {
        painting_genre_id: id,
        painting_id,
        genre_id,
    }
}

fn catalog() -> MemoryStore {
    MemoryStore::new()
        .with_rows(
            Table::Artists,
            vec![
                artist(1, "Claude", "Monet", "French"),
                artist(2, "Mary", "Cassatt", "American"),
                artist(3, "Berthe", "Morisot", "French"),
                // No paintings
                artist(4, "Gustave", "Caillebotte", "French"),
            ],
        )
        .unwrap()
        .with_rows(
            Table::Galleries,
            vec![
                gallery(1, "Musée d'Orsay", "France"),
                gallery(2, "National Gallery of Art", "United States"),
            ],
        )
        .unwrap()
        .with_rows(
            Table::Paintings,
            vec![
                painting(10, 1, 1, "Water Lilies", 1906),
                painting(11, 1, 1, "Impression, Sunrise", 1872),
                painting(12, 2, 2, "The Child's Bath", 1893),
                painting(13, 3, 1, "The Cradle", 1872),
                painting(14, 1, 1, "Poppy Field", 1873),
            ],
        )
        .unwrap()
        .with_rows(
            Table::Eras,
            vec![
                Era {
                    era_id: 1,
                    era_name: "Modern".to_string(),
                    era_years: Some("1800-1945".to_string()),
                },
                Era {
                    era_id: 2,
                    era_name: "Early Modern".to_string(),
                    era_years: Some("1500-1800".to_string()),
                },
            ],
        )
        .unwrap()
        .with_rows(
            Table::Genres,
            vec![
                genre(1, "Impressionism", 1),
                genre(2, "Realism", 1),
                genre(3, "Baroque", 2),
            ],
        )
        .unwrap()
        .with_rows(
            Table::PaintingGenres,
            vec![
                link(1, 10, 1),
                link(2, 11, 1),
                link(3, 14, 1),
                link(4, 12, 1),
                link(5, 12, 2),
                link(6, 13, 2),
            ],
        )
        .unwrap()
}

fn app(store: MemoryStore) -> Router {
    create_router::<MemoryStore>(&ApiConfig::default()).with_state(Arc::new(store))
}

fn legacy_app(store: MemoryStore) -> Router {
    let api = ApiConfig {
        legacy_status_codes: true,
    };
    create_router::<MemoryStore>(&api).with_state(Arc::new(store))
}

async fn get(app: Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn field<'a>(rows: &'a Value, name: &str) -> Vec<&'a Value> {
    rows.as_array()
        .expect("rows should be an array")
        .iter()
        .map(|row| &row[name])
        .collect()
}

// =============================================================================
// Counts
// =============================================================================

#[tokio::test]
async fn test_genre_counts_ascending() {
    let (status, body) = get(app(catalog()), "/api/counts/genres").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"genreName": "Realism", "paintCount": 2},
            {"genreName": "Impressionism", "paintCount": 4}
        ])
    );
}

#[tokio::test]
async fn test_artist_counts_descending_without_empty_artists() {
    let (status, body) = get(app(catalog()), "/api/counts/artists").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"artistName": "Claude Monet", "paintingCount": 3},
            {"artistName": "Mary Cassatt", "paintingCount": 1},
            {"artistName": "Berthe Morisot", "paintingCount": 1}
        ])
    );
}

#[tokio::test]
async fn test_artist_count_ties_follow_artist_order() {
    let store = MemoryStore::new()
        .with_rows(
            Table::Artists,
            vec![
                artist(2, "Mary", "Cassatt", "American"),
                artist(3, "Berthe", "Morisot", "French"),
            ],
        )
        .unwrap()
        .with_rows(
            Table::Paintings,
            vec![
                painting(20, 3, 1, "The Cradle", 1872),
                painting(21, 2, 1, "The Child's Bath", 1893),
            ],
        )
        .unwrap();
    let (status, body) = get(app(store), "/api/counts/artists").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        field(&body, "artistName"),
        vec![&json!("Mary Cassatt"), &json!("Berthe Morisot")]
    );
}

#[tokio::test]
async fn test_artist_counts_tolerate_missing_last_name() {
    let store = catalog()
        .with_rows(
            Table::Artists,
            vec![json!({"artistId": 5, "firstName": "Anonymous", "lastName": null})],
        )
        .unwrap()
        .with_rows(Table::Paintings, vec![painting(15, 5, 1, "Portrait of a Lady", 1880)])
        .unwrap();
    let (status, body) = get(app(store), "/api/counts/artists").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.as_array().and_then(|rows| rows.last()),
        Some(&json!({"artistName": "Anonymous", "paintingCount": 1}))
    );
}

#[tokio::test]
async fn test_top_genres_strictly_above_minimum() {
    let (status, body) = get(app(catalog()), "/api/counts/topgenres/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"genreName": "Impressionism", "paintCount": 4}]));

    let (status, body) = get(app(catalog()), "/api/counts/topgenres/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body, "paintCount"), vec![&json!(4), &json!(2)]);
}

#[tokio::test]
async fn test_top_genres_threshold_too_high() {
    let (status, body) = get(app(catalog()), "/api/counts/topgenres/4").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"message": "No paintings found with more than 4 paintings."})
    );
}

#[tokio::test]
async fn test_top_genres_large_minimum_is_not_rejected() {
    let (status, body) = get(app(catalog()), "/api/counts/topgenres/4294967296").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"message": "No paintings found with more than 4294967296 paintings."})
    );
}

#[tokio::test]
async fn test_top_genres_without_any_genres() {
    let (status, body) = get(app(MemoryStore::new()), "/api/counts/topgenres/1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"message": "No genres found for specified set number of paintings"})
    );
}

#[tokio::test]
async fn test_top_genres_negative_minimum_rejected() {
    let (status, body) = get(app(catalog()), "/api/counts/topgenres/-1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"message": "Number of paintings is invalid. Must be a number equal or greater than 0"})
    );
}

#[tokio::test]
async fn test_empty_catalog_counts() {
    let (status, body) = get(app(MemoryStore::new()), "/api/counts/genres").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "No genres found"}));

    let (status, body) = get(app(MemoryStore::new()), "/api/counts/artists").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "No artists or paintings found"}));
}

// =============================================================================
// Artists & Galleries
// =============================================================================

#[tokio::test]
async fn test_artists_by_country_prefix() {
    let (status, body) = get(app(catalog()), "/api/artists/country/Fr").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        field(&body, "lastName"),
        vec![&json!("Monet"), &json!("Morisot"), &json!("Caillebotte")]
    );
}

#[tokio::test]
async fn test_artist_search_orders_by_last_name() {
    let (status, body) = get(app(catalog()), "/api/artists/search/mo").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body, "lastName"), vec![&json!("Monet"), &json!("Morisot")]);
}

#[tokio::test]
async fn test_artist_by_id() {
    let (status, body) = get(app(catalog()), "/api/artists/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body, "lastName"), vec![&json!("Cassatt")]);

    // Identifiers are opaque: a non-numeric one is simply not found
    let (status, body) = get(app(catalog()), "/api/artists/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "No artist with ID : abc"}));
}

#[tokio::test]
async fn test_galleries_by_country() {
    let (status, body) = get(app(catalog()), "/api/galleries/country/united").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body, "galleryName"), vec![&json!("National Gallery of Art")]);

    let (status, body) = get(app(catalog()), "/api/galleries/country/Japan").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": "No galleries in the country beginning with : Japan"})
    );
}

// =============================================================================
// Genres & Eras
// =============================================================================

#[tokio::test]
async fn test_genres_embed_their_era() {
    let (status, body) = get(app(catalog()), "/api/genres/3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["genreName"], "Baroque");
    assert_eq!(body[0]["eras"]["eraName"], "Early Modern");
}

#[tokio::test]
async fn test_genre_not_found_uses_message_key() {
    let (status, body) = get(app(catalog()), "/api/genres/99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "No genre with ID : 99"}));
}

#[tokio::test]
async fn test_genres_of_painting_sorted_by_name() {
    let (status, body) = get(app(catalog()), "/api/genres/painting/12").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"genres": {"genreName": "Impressionism"}},
            {"genres": {"genreName": "Realism"}}
        ])
    );
}

#[tokio::test]
async fn test_list_eras() {
    let (status, body) = get(app(catalog()), "/api/eras").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) = get(app(MemoryStore::new()), "/api/eras").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "No eras found."}));
}

// =============================================================================
// Paintings
// =============================================================================

#[tokio::test]
async fn test_paintings_embed_artist_and_gallery() {
    let (status, body) = get(app(catalog()), "/api/paintings/13").await;

    assert_eq!(status, StatusCode::OK);
    let painting = &body[0];
    assert_eq!(painting["title"], "The Cradle");
    assert_eq!(painting["artists"]["lastName"], "Morisot");
    assert_eq!(painting["galleries"]["galleryName"], "Musée d'Orsay");
    assert!(painting.get("MSRP").is_some());
    // Foreign keys are replaced by their embeds
    assert!(painting.get("artistId").is_none());
}

#[tokio::test]
async fn test_paintings_list_ordered_by_title() {
    let (status, body) = get(app(catalog()), "/api/paintings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        field(&body, "title"),
        vec![
            &json!("Impression, Sunrise"),
            &json!("Poppy Field"),
            &json!("The Child's Bath"),
            &json!("The Cradle"),
            &json!("Water Lilies"),
        ]
    );
}

#[tokio::test]
async fn test_paintings_sorted_by_year() {
    let (status, body) = get(app(catalog()), "/api/paintings/sort/year").await;

    assert_eq!(status, StatusCode::OK);
    let years = field(&body, "yearOfWork");
    assert_eq!(years.first(), Some(&&json!(1872)));
    assert_eq!(years.last(), Some(&&json!(1906)));
}

#[tokio::test]
async fn test_paintings_unknown_sort_key_rejected() {
    let (status, body) = get(app(catalog()), "/api/paintings/sort/artist").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Invalid sort key: artist. Must be one of: title, year"})
    );
}

#[tokio::test]
async fn test_painting_title_contains() {
    let (status, body) = get(app(catalog()), "/api/paintings/search/THE").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        field(&body, "title"),
        vec![&json!("The Child's Bath"), &json!("The Cradle")]
    );
}

#[tokio::test]
async fn test_paintings_between_years_inclusive() {
    let (status, body) = get(app(catalog()), "/api/paintings/years/1872/1873").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        field(&body, "title"),
        vec![
            &json!("Impression, Sunrise"),
            &json!("The Cradle"),
            &json!("Poppy Field"),
        ]
    );
}

#[tokio::test]
async fn test_reversed_range_is_distinct_from_empty_range() {
    let (status, body) = get(app(catalog()), "/api/paintings/years/1900/1800").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Invalid input. End year cannot be less than start year"})
    );

    // Rejected even when nothing could match
    let (status, _) = get(app(MemoryStore::new()), "/api/paintings/years/1900/1800").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(app(catalog()), "/api/paintings/years/1700/1800").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": "No paintings between the years 1700 and 1800 "})
    );
}

#[tokio::test]
async fn test_paintings_by_artist_nationality() {
    let (status, body) = get(app(catalog()), "/api/paintings/artist/country/amer").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body, "title"), vec![&json!("The Child's Bath")]);
}

#[tokio::test]
async fn test_paintings_by_artist_and_gallery() {
    let (_, body) = get(app(catalog()), "/api/paintings/artist/1").await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    let (_, body) = get(app(catalog()), "/api/paintings/galleries/2").await;
    assert_eq!(field(&body, "title"), vec![&json!("The Child's Bath")]);
}

#[tokio::test]
async fn test_paintings_in_genre_ordered_by_year() {
    let (status, body) = get(app(catalog()), "/api/paintings/genre/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"paintings": {"paintingId": 13, "title": "The Cradle", "yearOfWork": 1872}},
            {"paintings": {"paintingId": 12, "title": "The Child's Bath", "yearOfWork": 1893}}
        ])
    );
}

#[tokio::test]
async fn test_paintings_in_era() {
    let (status, body) = get(app(catalog()), "/api/paintings/era/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(6));
    assert_eq!(body[0]["genres"], json!({"eraId": 1}));

    let (status, body) = get(app(catalog()), "/api/paintings/era/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "No paintings with the era: 2"}));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_upstream_error_passes_text_through() {
    let store = MemoryStore::unavailable("connection refused");
    let (status, body) = get(app(store), "/api/artists").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "connection refused"}));
}

#[tokio::test]
async fn test_malformed_rows_are_unhandled_faults() {
    // A genre name that is not text cannot be counted
    let store = MemoryStore::new()
        .with_rows(Table::Genres, vec![json!({"genreId": 1, "genreName": 42})])
        .unwrap()
        .with_rows(
            Table::PaintingGenres,
            vec![json!({"paintingGenreId": 1, "paintingId": 1, "genreId": 1})],
        )
        .unwrap();
    let (status, body) = get(app(store), "/api/counts/genres").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_legacy_status_codes() {
    let (status, body) = get(legacy_app(catalog()), "/api/paintings/years/1900/1800").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": "Invalid input. End year cannot be less than start year"})
    );

    let (status, _) = get(legacy_app(catalog()), "/api/counts/topgenres/-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Other outcomes are unaffected
    let (status, _) = get(legacy_app(catalog()), "/api/counts/topgenres/1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get(app(MemoryStore::new()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
