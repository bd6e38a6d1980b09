//! Post-fetch aggregation for the count endpoints.
//!
//! Counting happens here rather than in SQL: the store hands back every
//! joined row and these functions reduce them. All of them are pure so they
//! can be exercised without a database.

use std::collections::HashMap;
use std::hash::Hash;

use crate::model::{ArtistCount, ArtistPaintingRow, GenreCount, GenreLinkRow};

/// Minimum number of paintings a genre must exceed to be reported.
///
/// `0` keeps every genre with at least one painting. Clients of the older
/// service received a "No genres found" 404 for `0` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinCount(pub usize);

/// Count rows per distinct key.
///
/// Groups come out in order of first appearance, which is what keeps the
/// later sorts stable for equal counts.
pub fn count_by<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, usize)> = Vec::new();

    for key in keys {
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, 0));
            groups.len() - 1
        });
        groups[slot].1 += 1;
    }

    groups
}

fn genre_counts(rows: Vec<GenreLinkRow>) -> Vec<GenreCount> {
    count_by(rows.into_iter().map(|row| row.genre.genre_name.unwrap_or_default()))
        .into_iter()
        .map(|(genre_name, paint_count)| GenreCount {
            genre_name,
            paint_count,
        })
        .collect()
}

/// Paintings per genre, fewest first
pub fn genre_summary(rows: Vec<GenreLinkRow>) -> Vec<GenreCount> {
    let mut counts = genre_counts(rows);
    counts.sort_by(|a, b| a.paint_count.cmp(&b.paint_count));
    counts
}

/// Genres with strictly more than `min` paintings, most first
pub fn top_genres(rows: Vec<GenreLinkRow>, min: MinCount) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = genre_counts(rows)
        .into_iter()
        .filter(|genre| genre.paint_count > min.0)
        .collect();
    counts.sort_by(|a, b| b.paint_count.cmp(&a.paint_count));
    counts
}

/// Paintings per artist, most first.
///
/// Rows are paintings joined to their artist, so artists without paintings
/// never appear.
pub fn artist_summary(rows: Vec<ArtistPaintingRow>) -> Vec<ArtistCount> {
    let keys = rows
        .into_iter()
        .map(|row| (row.artist.artist_id, row.artist.display_name()));

    let mut counts: Vec<ArtistCount> = count_by(keys)
        .into_iter()
        .map(|((_, artist_name), painting_count)| ArtistCount {
            artist_name,
            painting_count,
        })
        .collect();
    counts.sort_by(|a, b| b.painting_count.cmp(&a.painting_count));
    counts
}
