//! Cards and the roster file they are loaded from.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// A single person entry in a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Position in the roster at load time. Stable for the card's lifetime.
    pub id: usize,
    pub name: String,
    /// `None` when the roster value was not numeric.
    pub popularity: Option<f64>,
}

impl Card {
    pub fn new(id: usize, name: impl Into<String>, popularity: Option<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            popularity,
        }
    }

    /// Popularity formatted for display.
    pub fn popularity_label(&self) -> String {
        match self.popularity {
            Some(p) => format!("{:.0}", p),
            None => "?".to_string(),
        }
    }
}

/// One card as it appears in the roster file.
#[derive(Debug, Clone, Deserialize)]
pub struct CardRecord {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_popularity")]
    pub popularity: Option<f64>,
}

/// The roster file: one list of cards per category.
///
/// ```json
/// {
///   "directors": [{ "name": "Bong", "popularity": 80 }],
///   "actors": [{ "name": "Yeun", "popularity": "72" }]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub directors: Vec<CardRecord>,
    #[serde(default)]
    pub actors: Vec<CardRecord>,
}

impl Roster {
    /// Load and parse a roster from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a roster from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Convert a list of records into cards, assigning ids by position.
    pub fn cards(records: &[CardRecord]) -> Vec<Card> {
        records
            .iter()
            .enumerate()
            .map(|(id, r)| Card::new(id, r.name.clone(), r.popularity))
            .collect()
    }
}

/// Accept numbers, numeric strings, and anything else as unknown.
fn lenient_popularity<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    })
}
