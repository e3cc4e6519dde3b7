//! Bundled mock dataset
//!
//! The guaranteed fallback for every aggregated resource. The JSON fixtures
//! are embedded into the binary and deserialized once at startup; the store
//! is read-only for the life of the process.

use anyhow::{anyhow, Context, Result};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;

use crate::models::{Fixture, LeagueStats, NewsArticle, Scorer, Standing, Transfer};

#[derive(RustEmbed)]
#[folder = "data/"]
struct MockAssets;

#[derive(Debug, Clone)]
pub struct MockStore {
    pub teams: Vec<Standing>,
    pub scorers: Vec<Scorer>,
    pub fixtures: Vec<Fixture>,
    pub news: Vec<NewsArticle>,
    pub transfers: Vec<Transfer>,
    pub stats: LeagueStats,
}

impl MockStore {
    pub fn load() -> Result<Self> {
        Ok(Self {
            teams: load_json("teams.json")?,
            scorers: load_json("scorers.json")?,
            fixtures: load_json("fixtures.json")?,
            news: load_json("news.json")?,
            transfers: load_json("transfers.json")?,
            stats: load_json("stats.json")?,
        })
    }
}

fn load_json<T: DeserializeOwned>(name: &str) -> Result<T> {
    let file = MockAssets::get(name).ok_or_else(|| anyhow!("missing embedded dataset {name}"))?;
    serde_json::from_slice(&file.data).with_context(|| format!("malformed dataset {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_datasets_deserialize() {
        let store = MockStore::load().unwrap();

        assert!(!store.teams.is_empty());
        assert!(!store.scorers.is_empty());
        assert!(!store.fixtures.is_empty());
        assert!(!store.news.is_empty());
        assert!(!store.transfers.is_empty());
        assert!(store.stats.total_matches > 0);
    }

    #[test]
    fn bundled_standings_satisfy_goal_difference_invariant() {
        let store = MockStore::load().unwrap();
        for team in &store.teams {
            assert_eq!(
                team.goal_difference,
                team.goals_for as i32 - team.goals_against as i32,
                "goal difference mismatch for {}",
                team.name
            );
        }
    }
}
