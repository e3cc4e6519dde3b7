//! Player photo resolution
//!
//! Two interchangeable strategies, tried in order: a dictionary of players we
//! have real photo URLs for, then a generated-avatar URL built from the name.

use serde::Serialize;
use std::collections::HashMap;

use crate::utils::generated_avatar_url;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerPhoto {
    pub name: String,
    pub photo: String,
    /// Which strategy produced the URL: "dictionary" or "generated"
    pub source: &'static str,
}

pub struct PhotoService {
    known: HashMap<&'static str, &'static str>,
}

impl Default for PhotoService {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoService {
    pub fn new() -> Self {
        // Keyed by lower-cased full name
        let known = HashMap::from([
            (
                "kylian mbappe",
                "https://media.api-sports.io/football/players/278.png",
            ),
            (
                "robert lewandowski",
                "https://media.api-sports.io/football/players/521.png",
            ),
            (
                "lamine yamal",
                "https://media.api-sports.io/football/players/382722.png",
            ),
            (
                "antoine griezmann",
                "https://media.api-sports.io/football/players/735.png",
            ),
            (
                "vinicius junior",
                "https://media.api-sports.io/football/players/757.png",
            ),
            (
                "julian alvarez",
                "https://media.api-sports.io/football/players/1101.png",
            ),
            (
                "raphinha",
                "https://media.api-sports.io/football/players/642.png",
            ),
            (
                "iago aspas",
                "https://media.api-sports.io/football/players/2281.png",
            ),
            (
                "oihan sancet",
                "https://media.api-sports.io/football/players/47516.png",
            ),
            (
                "ayoze perez",
                "https://media.api-sports.io/football/players/2296.png",
            ),
        ]);
        Self { known }
    }

    pub fn resolve(&self, name: &str) -> PlayerPhoto {
        let key = name.trim().to_lowercase();
        match self.known.get(key.as_str()) {
            Some(url) => PlayerPhoto {
                name: name.trim().to_string(),
                photo: (*url).to_string(),
                source: "dictionary",
            },
            None => PlayerPhoto {
                name: name.trim().to_string(),
                photo: generated_avatar_url(name.trim()),
                source: "generated",
            },
        }
    }
}
