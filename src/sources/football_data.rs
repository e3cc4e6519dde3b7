//! football-data.org v4 client and mappers
//!
//! Wire shapes are kept private to this module; only canonical models leave.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::{FetchError, FetchResult};
use crate::models::{Fixture, MatchStatus, Scorer, Standing};
use crate::sources::{FixturesProvider, ScorersProvider, StandingsProvider};
use crate::utils::generated_avatar_url;
use crate::utils::time::league_local_parts;

const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";

/// Competition code for La Liga
const COMPETITION: &str = "PD";

pub struct FootballDataProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FootballDataProvider {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout_seconds: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("X-Auth-Token", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl StandingsProvider for FootballDataProvider {
    async fn fetch_standings(&self) -> FetchResult<Vec<Standing>> {
        let response: StandingsResponse = self
            .get(&format!("competitions/{COMPETITION}/standings"))
            .await?;
        map_standings(response)
    }
}

#[async_trait::async_trait]
impl ScorersProvider for FootballDataProvider {
    async fn fetch_scorers(&self) -> FetchResult<Vec<Scorer>> {
        let response: ScorersResponse = self
            .get(&format!("competitions/{COMPETITION}/scorers?limit=10"))
            .await?;
        Ok(map_scorers(response))
    }
}

#[async_trait::async_trait]
impl FixturesProvider for FootballDataProvider {
    async fn fetch_fixtures(&self) -> FetchResult<Vec<Fixture>> {
        let response: MatchesResponse = self
            .get(&format!("competitions/{COMPETITION}/matches"))
            .await?;
        Ok(map_matches(response))
    }
}

// ---- wire shapes ----

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    standings: Vec<StandingsBlock>,
}

#[derive(Debug, Deserialize)]
struct StandingsBlock {
    #[serde(rename = "type")]
    kind: String,
    table: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableRow {
    team: TeamRef,
    played_games: u32,
    won: u32,
    draw: u32,
    lost: u32,
    points: u32,
    goals_for: u32,
    goals_against: u32,
    goal_difference: i32,
    form: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    id: u64,
    name: String,
    crest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScorersResponse {
    scorers: Vec<ScorerEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScorerEntry {
    player: PlayerRef,
    team: TeamRef,
    played_matches: u32,
    goals: u32,
    assists: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PlayerRef {
    id: u64,
    name: String,
    nationality: Option<String>,
    position: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    matches: Vec<MatchEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchEntry {
    id: u64,
    utc_date: chrono::DateTime<chrono::Utc>,
    status: String,
    matchday: Option<u32>,
    home_team: TeamRef,
    away_team: TeamRef,
    score: Score,
    venue: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Score {
    full_time: ScorePair,
}

#[derive(Debug, Deserialize)]
struct ScorePair {
    home: Option<u32>,
    away: Option<u32>,
}

// ---- mappers ----

fn map_standings(response: StandingsResponse) -> FetchResult<Vec<Standing>> {
    let table = response
        .standings
        .into_iter()
        .find(|block| block.kind == "TOTAL")
        .map(|block| block.table)
        .ok_or_else(|| FetchError::missing_field("standings[type=TOTAL]"))?;

    Ok(table.into_iter().map(map_table_row).collect())
}

fn map_table_row(row: TableRow) -> Standing {
    Standing {
        id: row.team.id,
        logo: crest_or_avatar(&row.team),
        name: row.team.name,
        played: row.played_games,
        won: row.won,
        drawn: row.draw,
        lost: row.lost,
        goals_for: row.goals_for,
        goals_against: row.goals_against,
        goal_difference: row.goal_difference,
        points: row.points,
        // upstream sends "W,W,D,L,W"
        form: row.form.map(|f| f.replace(',', "")),
    }
}

fn map_scorers(response: ScorersResponse) -> Vec<Scorer> {
    response
        .scorers
        .into_iter()
        .map(|entry| Scorer {
            id: entry.player.id,
            photo: generated_avatar_url(&entry.player.name),
            team_logo: crest_or_avatar(&entry.team),
            team: entry.team.name,
            nationality: entry.player.nationality.unwrap_or_default(),
            position: entry.player.position.unwrap_or_else(|| "Unknown".to_string()),
            name: entry.player.name,
            goals: entry.goals,
            assists: entry.assists.unwrap_or(0),
            matches: entry.played_matches,
            minutes: None,
        })
        .collect()
}

fn map_matches(response: MatchesResponse) -> Vec<Fixture> {
    response
        .matches
        .into_iter()
        .map(|entry| {
            let (date, time) = league_local_parts(entry.utc_date);
            Fixture {
                id: entry.id,
                date,
                time,
                home_logo: crest_or_avatar(&entry.home_team),
                away_logo: crest_or_avatar(&entry.away_team),
                home_team: entry.home_team.name,
                away_team: entry.away_team.name,
                home_goals: entry.score.full_time.home,
                away_goals: entry.score.full_time.away,
                status: map_status(&entry.status),
                matchday: entry.matchday.unwrap_or(0),
                venue: entry.venue,
            }
        })
        .collect()
}

fn map_status(status: &str) -> MatchStatus {
    match status {
        "IN_PLAY" | "PAUSED" => MatchStatus::Live,
        "FINISHED" => MatchStatus::Finished,
        "POSTPONED" | "SUSPENDED" | "CANCELLED" => MatchStatus::Postponed,
        _ => MatchStatus::Scheduled,
    }
}

fn crest_or_avatar(team: &TeamRef) -> String {
    team.crest
        .clone()
        .unwrap_or_else(|| generated_avatar_url(&team.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standings_fixture() -> StandingsResponse {
        serde_json::from_value(serde_json::json!({
            "standings": [
                { "type": "HOME", "table": [] },
                { "type": "TOTAL", "table": [
                    {
                        "team": { "id": 86, "name": "Real Madrid", "crest": "https://crests.football-data.org/86.png" },
                        "playedGames": 20, "won": 16, "draw": 2, "lost": 2,
                        "points": 50, "goalsFor": 48, "goalsAgainst": 19,
                        "goalDifference": 29, "form": "W,W,W,D,W"
                    }
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn standings_use_the_total_block() {
        let standings = map_standings(standings_fixture()).unwrap();
        assert_eq!(standings.len(), 1);
        let row = &standings[0];
        assert_eq!(row.name, "Real Madrid");
        assert_eq!(row.drawn, 2);
        assert_eq!(
            row.goal_difference,
            row.goals_for as i32 - row.goals_against as i32
        );
        assert_eq!(row.form.as_deref(), Some("WWWDW"));
    }

    #[test]
    fn standings_without_total_block_is_an_error() {
        let response: StandingsResponse =
            serde_json::from_value(serde_json::json!({ "standings": [] })).unwrap();
        assert!(matches!(
            map_standings(response),
            Err(FetchError::MissingField { .. })
        ));
    }

    #[test]
    fn scorer_without_photo_gets_generated_avatar() {
        let response: ScorersResponse = serde_json::from_value(serde_json::json!({
            "scorers": [{
                "player": { "id": 1, "name": "Kylian Mbappe", "nationality": "France", "position": "Offence" },
                "team": { "id": 86, "name": "Real Madrid", "crest": null },
                "playedMatches": 19, "goals": 18, "assists": null
            }]
        }))
        .unwrap();

        let scorers = map_scorers(response);
        assert!(scorers[0].photo.contains("ui-avatars.com"));
        assert!(scorers[0].team_logo.contains("ui-avatars.com"));
        assert_eq!(scorers[0].assists, 0);
    }

    #[test]
    fn match_kickoff_is_league_local() {
        let response: MatchesResponse = serde_json::from_value(serde_json::json!({
            "matches": [{
                "id": 42,
                "utcDate": "2026-01-24T20:00:00Z",
                "status": "TIMED",
                "matchday": 21,
                "homeTeam": { "id": 86, "name": "Real Madrid", "crest": "x" },
                "awayTeam": { "id": 94, "name": "Villarreal", "crest": "y" },
                "score": { "fullTime": { "home": null, "away": null } },
                "venue": "Santiago Bernabeu"
            }]
        }))
        .unwrap();

        let fixtures = map_matches(response);
        assert_eq!(fixtures[0].time, "21:00");
        assert_eq!(fixtures[0].status, MatchStatus::Scheduled);
        assert_eq!(fixtures[0].home_goals, None);
    }

    #[test]
    fn status_mapping_covers_live_and_terminal_states() {
        assert_eq!(map_status("IN_PLAY"), MatchStatus::Live);
        assert_eq!(map_status("PAUSED"), MatchStatus::Live);
        assert_eq!(map_status("FINISHED"), MatchStatus::Finished);
        assert_eq!(map_status("POSTPONED"), MatchStatus::Postponed);
        assert_eq!(map_status("TIMED"), MatchStatus::Scheduled);
    }
}
