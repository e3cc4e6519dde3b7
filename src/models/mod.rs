use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the league table
///
/// `goal_difference` and `points` are trusted from upstream rather than
/// recomputed; the mappers assert the GF/GA invariant in tests only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub id: u64,
    pub name: String,
    pub logo: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    /// Recent-form string such as "WWDLW", newest first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scorer {
    pub id: u64,
    pub name: String,
    pub photo: String,
    pub team: String,
    pub team_logo: String,
    pub nationality: String,
    pub position: String,
    pub goals: u32,
    pub assists: u32,
    pub matches: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: u64,
    /// Calendar date of the match, league-local
    pub date: NaiveDate,
    /// Local kickoff time, "HH:MM"
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    pub home_logo: String,
    pub away_logo: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub status: MatchStatus,
    pub matchday: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

/// Closed set of news categories used by the frontend filter chips
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    League,
    Match,
    Transfer,
    Injury,
    International,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 5] = [
        NewsCategory::League,
        NewsCategory::Match,
        NewsCategory::Transfer,
        NewsCategory::Injury,
        NewsCategory::International,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::League => "league",
            NewsCategory::Match => "match",
            NewsCategory::Transfer => "transfer",
            NewsCategory::Injury => "injury",
            NewsCategory::International => "international",
        }
    }

    /// Parse a category filter value; `None` for anything outside the closed set
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "league" => Some(NewsCategory::League),
            "match" => Some(NewsCategory::Match),
            "transfer" => Some(NewsCategory::Transfer),
            "injury" => Some(NewsCategory::Injury),
            "international" => Some(NewsCategory::International),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: u64,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub category: NewsCategory,
    pub image: String,
    pub date: DateTime<Utc>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    In,
    Out,
    Loan,
    Extension,
}

impl TransferType {
    /// Parse a transfer-type path segment; `None` for unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in" => Some(TransferType::In),
            "out" => Some(TransferType::Out),
            "loan" => Some(TransferType::Loan),
            "extension" => Some(TransferType::Extension),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: u64,
    pub player: String,
    pub from_team: String,
    pub to_team: String,
    pub date: DateTime<Utc>,
    /// Free-text fee ("€60m", "Free", "Undisclosed")
    pub fee: String,
    #[serde(rename = "type")]
    pub transfer_type: TransferType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_crest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_crest: Option<String>,
}

/// Season-level aggregate numbers shown on the home page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeagueStats {
    pub total_matches: u32,
    pub total_goals: u32,
    pub avg_goals_per_match: f64,
    pub clean_sheets: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub top_teams: Vec<Standing>,
    pub top_scorers: Vec<Scorer>,
    pub next_fixtures: Vec<Fixture>,
    pub latest_news: Vec<NewsArticle>,
    pub latest_transfers: Vec<Transfer>,
    pub stats: LeagueStats,
}

/// One day of the fixture calendar, matches sorted by kickoff time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub matches: Vec<Fixture>,
}
