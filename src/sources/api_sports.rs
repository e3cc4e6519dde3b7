//! api-sports.io (API-Football v3) client and mappers
//!
//! Interchangeable with the football-data.org provider; everything response[]
//! envelopes and nested statistics arrays here, flattened into the same
//! canonical models.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::{FetchError, FetchResult};
use crate::models::{Fixture, MatchStatus, Scorer, Standing};
use crate::sources::{FixturesProvider, ScorersProvider, StandingsProvider};
use crate::utils::generated_avatar_url;
use crate::utils::time::league_local_parts;

const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

/// League id for La Liga
const LEAGUE_ID: u32 = 140;

pub struct ApiSportsProvider {
    client: Client,
    base_url: String,
    api_key: String,
    season: i32,
}

impl ApiSportsProvider {
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
            season: current_season(Utc::now()),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let url = format!(
            "{}/{}?league={}&season={}",
            self.base_url, path, LEAGUE_ID, self.season
        );
        let response = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.api_key)
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

/// Seasons are labelled by their starting year; the split is in July
fn current_season(now: DateTime<Utc>) -> i32 {
    if now.month() >= 7 {
        now.year()
    } else {
        now.year() - 1
    }
}

#[async_trait::async_trait]
impl StandingsProvider for ApiSportsProvider {
    async fn fetch_standings(&self) -> FetchResult<Vec<Standing>> {
        let response: Envelope<StandingsEntry> = self.get("standings").await?;
        map_standings(response)
    }
}

#[async_trait::async_trait]
impl ScorersProvider for ApiSportsProvider {
    async fn fetch_scorers(&self) -> FetchResult<Vec<Scorer>> {
        let response: Envelope<TopScorerEntry> = self.get("players/topscorers").await?;
        map_scorers(response)
    }
}

#[async_trait::async_trait]
impl FixturesProvider for ApiSportsProvider {
    async fn fetch_fixtures(&self) -> FetchResult<Vec<Fixture>> {
        let response: Envelope<FixtureEntry> = self.get("fixtures").await?;
        Ok(map_fixtures(response))
    }
}

// ---- wire shapes ----

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StandingsEntry {
    league: LeagueStandings,
}

#[derive(Debug, Deserialize)]
struct LeagueStandings {
    standings: Vec<Vec<StandingRow>>,
}

#[derive(Debug, Deserialize)]
struct StandingRow {
    team: TeamRef,
    points: u32,
    #[serde(rename = "goalsDiff")]
    goals_diff: i32,
    form: Option<String>,
    all: RecordBlock,
}

#[derive(Debug, Deserialize)]
struct RecordBlock {
    played: u32,
    win: u32,
    draw: u32,
    lose: u32,
    goals: GoalsBlock,
}

#[derive(Debug, Deserialize)]
struct GoalsBlock {
    #[serde(rename = "for")]
    goals_for: u32,
    against: u32,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    id: u64,
    name: String,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopScorerEntry {
    player: PlayerRef,
    statistics: Vec<PlayerStatistics>,
}

#[derive(Debug, Deserialize)]
struct PlayerRef {
    id: u64,
    name: String,
    nationality: Option<String>,
    photo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerStatistics {
    team: TeamRef,
    games: GamesBlock,
    goals: PlayerGoals,
}

#[derive(Debug, Deserialize)]
struct GamesBlock {
    // upstream spells it this way
    appearences: Option<u32>,
    position: Option<String>,
    minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PlayerGoals {
    total: Option<u32>,
    assists: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: FixtureBlock,
    league: LeagueRound,
    teams: TeamsBlock,
    goals: ScorePair,
}

#[derive(Debug, Deserialize)]
struct FixtureBlock {
    id: u64,
    date: DateTime<FixedOffset>,
    status: StatusBlock,
    venue: VenueBlock,
}

#[derive(Debug, Deserialize)]
struct StatusBlock {
    short: String,
}

#[derive(Debug, Deserialize)]
struct VenueBlock {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeagueRound {
    round: String,
}

#[derive(Debug, Deserialize)]
struct TeamsBlock {
    home: TeamRef,
    away: TeamRef,
}

#[derive(Debug, Deserialize)]
struct ScorePair {
    home: Option<u32>,
    away: Option<u32>,
}

// ---- mappers ----

fn map_standings(envelope: Envelope<StandingsEntry>) -> FetchResult<Vec<Standing>> {
    let rows = envelope
        .response
        .into_iter()
        .next()
        .and_then(|entry| entry.league.standings.into_iter().next())
        .ok_or_else(|| FetchError::missing_field("response[0].league.standings[0]"))?;

    Ok(rows
        .into_iter()
        .map(|row| Standing {
            id: row.team.id,
            logo: logo_or_avatar(&row.team),
            name: row.team.name,
            played: row.all.played,
            won: row.all.win,
            drawn: row.all.draw,
            lost: row.all.lose,
            goals_for: row.all.goals.goals_for,
            goals_against: row.all.goals.against,
            goal_difference: row.goals_diff,
            points: row.points,
            form: row.form,
        })
        .collect())
}

fn map_scorers(envelope: Envelope<TopScorerEntry>) -> FetchResult<Vec<Scorer>> {
    envelope
        .response
        .into_iter()
        .map(|entry| {
            let stats = entry
                .statistics
                .into_iter()
                .next()
                .ok_or_else(|| FetchError::missing_field("statistics[0]"))?;

            Ok(Scorer {
                id: entry.player.id,
                photo: entry
                    .player
                    .photo
                    .unwrap_or_else(|| generated_avatar_url(&entry.player.name)),
                team_logo: logo_or_avatar(&stats.team),
                team: stats.team.name,
                nationality: entry.player.nationality.unwrap_or_default(),
                position: stats.games.position.unwrap_or_else(|| "Unknown".to_string()),
                name: entry.player.name,
                goals: stats.goals.total.unwrap_or(0),
                assists: stats.goals.assists.unwrap_or(0),
                matches: stats.games.appearences.unwrap_or(0),
                minutes: stats.games.minutes,
            })
        })
        .collect()
}

fn map_fixtures(envelope: Envelope<FixtureEntry>) -> Vec<Fixture> {
    envelope
        .response
        .into_iter()
        .map(|entry| {
            let (date, time) = league_local_parts(entry.fixture.date.with_timezone(&Utc));
            Fixture {
                id: entry.fixture.id,
                date,
                time,
                home_logo: logo_or_avatar(&entry.teams.home),
                away_logo: logo_or_avatar(&entry.teams.away),
                home_team: entry.teams.home.name,
                away_team: entry.teams.away.name,
                home_goals: entry.goals.home,
                away_goals: entry.goals.away,
                status: map_status(&entry.fixture.status.short),
                matchday: parse_round(&entry.league.round),
                venue: entry.fixture.venue.name,
            }
        })
        .collect()
}

fn map_status(short: &str) -> MatchStatus {
    match short {
        "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" => MatchStatus::Live,
        "FT" | "AET" | "PEN" => MatchStatus::Finished,
        "PST" | "CANC" | "ABD" | "SUSP" | "AWD" | "WO" => MatchStatus::Postponed,
        _ => MatchStatus::Scheduled,
    }
}

/// "Regular Season - 21" carries the matchday in its last token
fn parse_round(round: &str) -> u32 {
    round
        .rsplit(' ')
        .next()
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

fn logo_or_avatar(team: &TeamRef) -> String {
    team.logo
        .clone()
        .unwrap_or_else(|| generated_avatar_url(&team.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_splits_in_july() {
        let june: DateTime<Utc> = "2026-06-30T12:00:00Z".parse().unwrap();
        let july: DateTime<Utc> = "2026-07-01T12:00:00Z".parse().unwrap();
        assert_eq!(current_season(june), 2025);
        assert_eq!(current_season(july), 2026);
    }

    #[test]
    fn standings_flatten_the_nested_table() {
        let envelope: Envelope<StandingsEntry> = serde_json::from_value(serde_json::json!({
            "response": [{
                "league": {
                    "standings": [[{
                        "team": { "id": 529, "name": "Barcelona", "logo": "https://media.api-sports.io/teams/529.png" },
                        "points": 48,
                        "goalsDiff": 31,
                        "form": "WWDWW",
                        "all": {
                            "played": 20, "win": 15, "draw": 3, "lose": 2,
                            "goals": { "for": 52, "against": 21 }
                        }
                    }]]
                }
            }]
        }))
        .unwrap();

        let standings = map_standings(envelope).unwrap();
        assert_eq!(standings.len(), 1);
        let row = &standings[0];
        assert_eq!(row.drawn, 3);
        assert_eq!(
            row.goal_difference,
            row.goals_for as i32 - row.goals_against as i32
        );
    }

    #[test]
    fn empty_standings_response_is_an_error() {
        let envelope: Envelope<StandingsEntry> =
            serde_json::from_value(serde_json::json!({ "response": [] })).unwrap();
        assert!(matches!(
            map_standings(envelope),
            Err(FetchError::MissingField { .. })
        ));
    }

    #[test]
    fn scorer_takes_first_statistics_entry() {
        let envelope: Envelope<TopScorerEntry> = serde_json::from_value(serde_json::json!({
            "response": [{
                "player": { "id": 278, "name": "Kylian Mbappe", "nationality": "France", "photo": "https://media.api-sports.io/players/278.png" },
                "statistics": [{
                    "team": { "id": 541, "name": "Real Madrid", "logo": null },
                    "games": { "appearences": 19, "position": "Attacker", "minutes": 1690 },
                    "goals": { "total": 18, "assists": 4 }
                }]
            }]
        }))
        .unwrap();

        let scorers = map_scorers(envelope).unwrap();
        assert_eq!(scorers[0].matches, 19);
        assert_eq!(scorers[0].minutes, Some(1690));
        assert!(scorers[0].team_logo.contains("ui-avatars.com"));
    }

    #[test]
    fn fixture_round_and_offset_date_are_normalized() {
        let envelope: Envelope<FixtureEntry> = serde_json::from_value(serde_json::json!({
            "response": [{
                "fixture": {
                    "id": 9001,
                    "date": "2026-01-24T21:00:00+01:00",
                    "status": { "short": "NS" },
                    "venue": { "name": "Santiago Bernabeu" }
                },
                "league": { "round": "Regular Season - 21" },
                "teams": {
                    "home": { "id": 541, "name": "Real Madrid", "logo": "h.png" },
                    "away": { "id": 533, "name": "Villarreal", "logo": "a.png" }
                },
                "goals": { "home": null, "away": null }
            }]
        }))
        .unwrap();

        let fixtures = map_fixtures(envelope);
        assert_eq!(fixtures[0].matchday, 21);
        assert_eq!(fixtures[0].time, "21:00");
        assert_eq!(fixtures[0].status, MatchStatus::Scheduled);
    }

    #[test]
    fn unparsable_round_maps_to_zero() {
        assert_eq!(parse_round("Relegation Round"), 0);
        assert_eq!(parse_round("Regular Season - 7"), 7);
    }
}
