//! Rating ingestion
//!
//! Loads the ratings and movie metadata CSVs, joins them on movie id, keeps
//! ratings strictly above `min_rating`, and groups the liked titles per user.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

use crate::config::DataConfig;
use crate::error::{Error, Result};

/// Liked titles per user id, users ascending, titles in rating-file order
pub type UserHistories = BTreeMap<u32, Vec<String>>;

/// One row of the ratings file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "userId")]
    pub user_id: u32,
    #[serde(rename = "movieId")]
    pub movie_id: u32,
    pub rating: f64,
}

/// Load both datasets and build user histories
pub fn load_histories(config: &DataConfig) -> Result<UserHistories> {
    let ratings = read_ratings(&config.ratings_path)?;
    let titles = read_titles(&config.movies_path)?;
    let histories = group_liked(&ratings, &titles, config.min_rating);

    info!(
        "Loaded {} ratings and {} titles: {} users with liked movies",
        ratings.len(),
        titles.len(),
        histories.len()
    );

    Ok(histories)
}

/// Read every rating row
pub fn read_ratings(path: &Path) -> Result<Vec<RatingRecord>> {
    let mut reader = open(path)?;
    require_columns(path, &mut reader, &["userId", "movieId", "rating"])?;

    reader
        .deserialize()
        .map(|row| row.map_err(|e| Error::csv(path, e)))
        .collect()
}

/// Read the movie id → title mapping.
///
/// Rows whose `id` is not a plain non-negative integer are dropped; for
/// repeated ids the first title wins.
pub fn read_titles(path: &Path) -> Result<HashMap<u32, String>> {
    let mut reader = open(path)?;
    let columns = require_columns(path, &mut reader, &["id", "title"])?;
    let (id_idx, title_idx) = (columns[0], columns[1]);

    let mut titles = HashMap::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let record = row.map_err(|e| Error::csv(path, e))?;
        let id = record.get(id_idx).and_then(parse_movie_id);
        let title = record.get(title_idx).map(str::trim).filter(|t| !t.is_empty());

        match (id, title) {
            (Some(id), Some(title)) => {
                titles.entry(id).or_insert_with(|| title.to_string());
            }
            _ => skipped += 1,
        }
    }

    debug!("Skipped {} movie rows without a numeric id or title", skipped);
    Ok(titles)
}

/// Join ratings with titles and group liked titles per user
pub fn group_liked(
    ratings: &[RatingRecord],
    titles: &HashMap<u32, String>,
    min_rating: f64,
) -> UserHistories {
    let mut histories = UserHistories::new();

    for rating in ratings.iter().filter(|r| r.rating > min_rating) {
        if let Some(title) = titles.get(&rating.movie_id) {
            histories
                .entry(rating.user_id)
                .or_default()
                .push(title.clone());
        }
    }

    histories
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    Ok(csv::ReaderBuilder::new().flexible(true).from_reader(file))
}

/// Positions of `columns` in the header row, in the order requested
fn require_columns(
    path: &Path,
    reader: &mut csv::Reader<std::fs::File>,
    columns: &[&'static str],
) -> Result<Vec<usize>> {
    let headers = reader.headers().map_err(|e| Error::csv(path, e))?;
    columns
        .iter()
        .map(|&column| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| Error::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        })
        .collect()
}

fn parse_movie_id(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
