//! Path parameters to catalog queries.
//!
//! Every endpoint's select is built here. Parameter validation happens
//! before a query exists, so rejected input never reaches the store.

use std::num::IntErrorKind;
use std::str::FromStr;

use crate::error::{ApiError, MessageKey};
use crate::logic::aggregate::MinCount;
use crate::model::{
    ColumnRef, Direction, Embed, LikePattern, Projection, SelectQuery, Table,
};

/// Columns of `paintings` returned by every painting listing, after
/// `paintingId` and the artist and gallery embeds.
const PAINTING_COLUMNS: &[&str] = &[
    "imageFileName",
    "title",
    "shapeId",
    "museumLink",
    "accessionNumber",
    "copyrightText",
    "description",
    "excerpt",
    "yearOfWork",
    "width",
    "height",
    "medium",
    "cost",
    "MSRP",
    "googleLink",
    "googleDescription",
    "wikiLink",
    "jsonAnnotations",
];

const PAINTING_SUMMARY_COLUMNS: &[&str] = &["paintingId", "title", "yearOfWork"];

/// Inclusive `yearOfWork` bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i64,
    pub end: i64,
}

impl YearRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, ApiError> {
        let (Ok(start), Ok(end)) = (start.trim().parse::<i64>(), end.trim().parse::<i64>()) else {
            return Err(ApiError::invalid_input(
                MessageKey::Error,
                "Invalid input. Start and end years must be whole numbers",
            ));
        };
        if end < start {
            return Err(ApiError::invalid_input(
                MessageKey::Error,
                "Invalid input. End year cannot be less than start year",
            ));
        }
        Ok(Self { start, end })
    }
}

/// Orderings offered by `/api/paintings/sort/:sort_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Year,
}

impl SortKey {
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Year => "yearOfWork",
        }
    }
}

impl FromStr for SortKey {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortKey::Title),
            "year" => Ok(SortKey::Year),
            _ => Err(ApiError::invalid_input(
                MessageKey::Error,
                format!("Invalid sort key: {}. Must be one of: title, year", s),
            )),
        }
    }
}

impl FromStr for MinCount {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<usize>() {
            Ok(min) => Ok(MinCount(min)),
            // No genre can exceed a minimum this large
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(MinCount(usize::MAX)),
            Err(_) => Err(ApiError::invalid_input(
                MessageKey::Message,
                "Number of paintings is invalid. Must be a number equal or greater than 0",
            )),
        }
    }
}

pub fn all(table: Table) -> SelectQuery {
    SelectQuery::from(table)
}

pub fn by_id(table: Table, id: &str) -> SelectQuery {
    SelectQuery::from(table).eq(ColumnRef::own(table.primary_key()), id)
}

pub fn artists_by_nationality(prefix: &str) -> SelectQuery {
    SelectQuery::from(Table::Artists)
        .ilike(ColumnRef::own("nationality"), LikePattern::prefix(prefix))
}

pub fn artists_by_last_name(prefix: &str) -> SelectQuery {
    SelectQuery::from(Table::Artists)
        .ilike(ColumnRef::own("lastName"), LikePattern::prefix(prefix))
        .order(ColumnRef::own("lastName"), Direction::Ascending)
}

pub fn galleries_by_country(prefix: &str) -> SelectQuery {
    SelectQuery::from(Table::Galleries)
        .ilike(ColumnRef::own("galleryCountry"), LikePattern::prefix(prefix))
}

fn genres_with_era() -> SelectQuery {
    SelectQuery::from(Table::Genres)
        .select(vec![
            Projection::Column("genreId"),
            Projection::Column("genreName"),
            Projection::Embed(Embed::all(Table::Eras)),
            Projection::Column("description"),
            Projection::Column("wikiLink"),
        ])
        .order(ColumnRef::own("genreId"), Direction::Ascending)
}

pub fn genres() -> SelectQuery {
    genres_with_era()
}

pub fn genre_by_id(id: &str) -> SelectQuery {
    genres_with_era().eq(ColumnRef::own("genreId"), id)
}

pub fn genres_of_painting(painting_id: &str) -> SelectQuery {
    SelectQuery::from(Table::PaintingGenres)
        .select(vec![Projection::Embed(Embed::columns(
            Table::Genres,
            &["genreName"],
        ))])
        .eq(ColumnRef::own("paintingId"), painting_id)
        .order(
            ColumnRef::embedded(Table::Genres, "genreName"),
            Direction::Ascending,
        )
}

fn painting_projection(artist: Embed) -> Vec<Projection> {
    let mut projection = vec![
        Projection::Column("paintingId"),
        Projection::Embed(artist),
        Projection::Embed(Embed::all(Table::Galleries)),
    ];
    projection.extend(PAINTING_COLUMNS.iter().copied().map(Projection::Column));
    projection
}

fn paintings_by_title() -> SelectQuery {
    SelectQuery::from(Table::Paintings)
        .select(painting_projection(Embed::all(Table::Artists)))
        .order(ColumnRef::own("title"), Direction::Ascending)
}

pub fn paintings() -> SelectQuery {
    paintings_by_title()
}

pub fn paintings_sorted(key: SortKey) -> SelectQuery {
    SelectQuery::from(Table::Paintings)
        .select(painting_projection(Embed::all(Table::Artists)))
        .order(ColumnRef::own(key.column()), Direction::Ascending)
}

pub fn painting_by_id(id: &str) -> SelectQuery {
    paintings_by_title().eq(ColumnRef::own("paintingId"), id)
}

pub fn paintings_with_title(substring: &str) -> SelectQuery {
    paintings_by_title().ilike(ColumnRef::own("title"), LikePattern::contains(substring))
}

pub fn paintings_between(range: YearRange) -> SelectQuery {
    SelectQuery::from(Table::Paintings)
        .select(painting_projection(Embed::all(Table::Artists)))
        .gte(ColumnRef::own("yearOfWork"), range.start)
        .lte(ColumnRef::own("yearOfWork"), range.end)
        .order(ColumnRef::own("yearOfWork"), Direction::Ascending)
}

pub fn paintings_in_gallery(gallery_id: &str) -> SelectQuery {
    paintings_by_title().eq(ColumnRef::own("galleryId"), gallery_id)
}

pub fn paintings_by_artist(artist_id: &str) -> SelectQuery {
    paintings_by_title().eq(ColumnRef::own("artistId"), artist_id)
}

/// Paintings whose artist's nationality starts with `prefix`. The artist
/// embed is inner so non-matching paintings are dropped, not just their
/// artist.
pub fn paintings_by_artist_nationality(prefix: &str) -> SelectQuery {
    SelectQuery::from(Table::Paintings)
        .select(painting_projection(Embed::all(Table::Artists).inner()))
        .ilike(
            ColumnRef::embedded(Table::Artists, "nationality"),
            LikePattern::prefix(prefix),
        )
        .order(ColumnRef::own("title"), Direction::Ascending)
}

pub fn paintings_in_genre(genre_id: &str) -> SelectQuery {
    SelectQuery::from(Table::PaintingGenres)
        .select(vec![Projection::Embed(
            Embed::columns(Table::Paintings, PAINTING_SUMMARY_COLUMNS).inner(),
        )])
        .eq(ColumnRef::own("genreId"), genre_id)
        .order(
            ColumnRef::embedded(Table::Paintings, "yearOfWork"),
            Direction::Ascending,
        )
}

pub fn paintings_in_era(era_id: &str) -> SelectQuery {
    SelectQuery::from(Table::PaintingGenres)
        .select(vec![
            Projection::Embed(Embed::columns(Table::Genres, &["eraId"]).inner()),
            Projection::Embed(
                Embed::columns(Table::Paintings, PAINTING_SUMMARY_COLUMNS).inner(),
            ),
        ])
        .eq(ColumnRef::embedded(Table::Genres, "eraId"), era_id)
        .order(
            ColumnRef::embedded(Table::Paintings, "yearOfWork"),
            Direction::Ascending,
        )
}

/// Every painting/genre link with the genre's name, for the genre counts
pub fn genre_links() -> SelectQuery {
    SelectQuery::from(Table::PaintingGenres).select(vec![
        Projection::Embed(Embed::columns(Table::Genres, &["genreName"]).inner()),
        Projection::Column("genreId"),
    ])
}

/// Every painting with its artist's identity, for the artist counts.
/// Ordered by artist so equal counts come out in artist order.
pub fn artist_paintings() -> SelectQuery {
    SelectQuery::from(Table::Paintings)
        .select(vec![
            Projection::Column("paintingId"),
            Projection::Embed(
                Embed::columns(Table::Artists, &["artistId", "firstName", "lastName"]).inner(),
            ),
        ])
        .order(
            ColumnRef::embedded(Table::Artists, "artistId"),
            Direction::Ascending,
        )
}
