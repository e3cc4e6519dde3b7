use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    CalendarDay, Dashboard, Fixture, LeagueStats, NewsArticle, NewsCategory, Scorer, Standing,
    Transfer, TransferType,
};
use crate::services::photos::PlayerPhoto;
use crate::services::subscription::SubscribeResponse;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "liga-hub",
    }))
}

pub async fn api_info() -> Json<Value> {
    Json(json!({
        "name": "La Liga Hub API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "dashboard": "GET /api/dashboard",
            "teams": "GET /api/teams",
            "team": "GET /api/teams/:id",
            "scorers": "GET /api/scorers",
            "scorer": "GET /api/scorers/:id",
            "stats": "GET /api/stats",
            "fixtures": "GET /api/fixtures",
            "matchday": "GET /api/fixtures/matchday/:matchday",
            "teamFixtures": "GET /api/fixtures/team/:teamName",
            "calendar": "GET /api/calendar",
            "matchesToday": "GET /api/matches/today",
            "news": "GET /api/news?category=",
            "newsCategories": "GET /api/news/categories",
            "article": "GET /api/news/articles/:id",
            "transfers": "GET /api/transfers",
            "transfersByType": "GET /api/transfers/type/:type",
            "playerPhoto": "GET /api/player-photo?name=",
            "subscribe": "POST /api/subscribe",
        }
    }))
}

// ---- standings ----

pub async fn list_teams(State(state): State<AppState>) -> Json<Vec<Standing>> {
    Json(state.league.standings().await)
}

pub async fn get_team(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Standing>> {
    let id = parse_id(&id, "team id")?;
    state
        .league
        .team_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Team"))
}

// ---- scorers ----

pub async fn list_scorers(State(state): State<AppState>) -> Json<Vec<Scorer>> {
    Json(state.league.scorers().await)
}

pub async fn get_scorer(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Scorer>> {
    let id = parse_id(&id, "scorer id")?;
    state
        .league
        .scorer_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Scorer"))
}

pub async fn league_stats(State(state): State<AppState>) -> Json<LeagueStats> {
    Json(state.league.stats())
}

// ---- fixtures ----

pub async fn list_fixtures(State(state): State<AppState>) -> Json<Vec<Fixture>> {
    Json(state.league.fixtures().await)
}

pub async fn fixtures_by_matchday(
    Path(matchday): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Fixture>>> {
    let matchday: u32 = matchday
        .parse()
        .map_err(|_| ApiError::bad_request("matchday must be a number"))?;
    Ok(Json(state.league.fixtures_for_matchday(matchday).await))
}

pub async fn fixtures_by_team(
    Path(team): Path<String>,
    State(state): State<AppState>,
) -> Json<Vec<Fixture>> {
    Json(state.league.fixtures_for_team(&team).await)
}

pub async fn calendar(State(state): State<AppState>) -> Json<Vec<CalendarDay>> {
    Json(state.league.calendar().await)
}

pub async fn matches_today(State(state): State<AppState>) -> Json<Vec<Fixture>> {
    Json(state.league.matches_today().await)
}

// ---- news ----

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub category: Option<String>,
}

pub async fn list_news(
    Query(query): Query<NewsQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<NewsArticle>>> {
    let articles = state.feeds.news().await;

    let filtered = match query.category.as_deref() {
        None | Some("") | Some("all") | Some("All") => articles,
        Some(raw) => {
            let category = NewsCategory::parse(raw)
                .ok_or_else(|| ApiError::bad_request(format!("unknown category: {raw}")))?;
            articles
                .into_iter()
                .filter(|a| a.category == category)
                .collect()
        }
    };

    Ok(Json(filtered))
}

pub async fn news_categories() -> Json<Vec<String>> {
    let mut categories = vec!["All".to_string()];
    categories.extend(NewsCategory::ALL.iter().map(|c| title_case(c.as_str())));
    Json(categories)
}

pub async fn get_article(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<NewsArticle>> {
    let id = parse_id(&id, "article id")?;
    state
        .feeds
        .article(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Article"))
}

// ---- transfers ----

pub async fn list_transfers(State(state): State<AppState>) -> Json<Vec<Transfer>> {
    Json(state.feeds.transfers().await)
}

pub async fn transfers_by_type(
    Path(kind): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Transfer>>> {
    let kind = TransferType::parse(&kind)
        .ok_or_else(|| ApiError::bad_request(format!("unknown transfer type: {kind}")))?;
    let transfers = state
        .feeds
        .transfers()
        .await
        .into_iter()
        .filter(|t| t.transfer_type == kind)
        .collect();
    Ok(Json(transfers))
}

// ---- dashboard ----

pub async fn dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.league.dashboard(&state.feeds).await)
}

// ---- player photos ----

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    pub name: Option<String>,
}

pub async fn player_photo(
    Query(query): Query<PhotoQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<PlayerPhoto>> {
    let name = query.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("name query parameter is required"));
    }
    Ok(Json(state.photos.resolve(&name)))
}

// ---- subscription ----

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> ApiResult<Json<SubscribeResponse>> {
    let email = payload.email.unwrap_or_default();
    let match_count = state.league.cached_today_match_count().await;
    let response = state.subscription.subscribe(&email, match_count).await?;
    Ok(Json(response))
}

// ---- misc ----

pub async fn not_found() -> ApiError {
    ApiError::not_found("Route")
}

fn parse_id(raw: &str, field: &str) -> ApiResult<u64> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("{field} must be a number")))
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
