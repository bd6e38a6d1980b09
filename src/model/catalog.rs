use serde::{Deserialize, Serialize};

pub type Id = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub artist_id: Id,
    pub first_name: Option<String>,
    pub last_name: String,
    pub nationality: Option<String>,
    pub gender: Option<String>,
    pub year_of_birth: Option<i32>,
    pub year_of_death: Option<i32>,
    pub details: Option<String>,
    pub artist_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Painting {
    pub painting_id: Id,
    pub artist_id: Option<Id>,
    pub gallery_id: Option<Id>,
    pub image_file_name: Option<String>,
    pub title: String,
    pub shape_id: Option<Id>,
    pub museum_link: Option<String>,
    pub accession_number: Option<String>,
    pub copyright_text: Option<String>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    pub year_of_work: Option<i32>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub medium: Option<String>,
    pub cost: Option<f64>,
    #[serde(rename = "MSRP")]
    pub msrp: Option<f64>,
    pub google_link: Option<String>,
    pub google_description: Option<String>,
    pub wiki_link: Option<String>,
    pub json_annotations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    pub gallery_id: Id,
    pub gallery_name: String,
    pub gallery_native_name: Option<String>,
    pub gallery_city: Option<String>,
    pub gallery_address: Option<String>,
    pub gallery_country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub gallery_web_site: Option<String>,
    pub flickr_place_id: Option<String>,
    pub yahoo_woe_id: Option<String>,
    pub google_place_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub genre_id: Id,
    pub genre_name: String,
    pub era_id: Option<Id>,
    pub description: Option<String>,
    pub wiki_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Era {
    pub era_id: Id,
    pub era_name: String,
    pub era_years: Option<String>,
}

/// Join row relating a painting to one of its genres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintingGenre {
    pub painting_genre_id: Id,
    pub painting_id: Id,
    pub genre_id: Id,
}

// Rows fetched for the count endpoints. Field names mirror the embed shape
// produced by the store, e.g. `{ "genres": { "genreName": "Baroque" } }`.

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenreLinkRow {
    #[serde(rename = "genres")]
    pub genre: GenreNameRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreNameRef {
    pub genre_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtistPaintingRow {
    #[serde(rename = "artists")]
    pub artist: ArtistNameRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistNameRef {
    pub artist_id: Id,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ArtistNameRef {
    /// "First Last", or whichever of the two is recorded
    pub fn display_name(&self) -> String {
        [&self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Wire shape of the genre summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreCount {
    pub genre_name: String,
    pub paint_count: usize,
}

/// Wire shape of the artist summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistCount {
    pub artist_name: String,
    pub painting_count: usize,
}
