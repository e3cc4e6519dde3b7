//! Web layer
//!
//! Thin axum handlers over the service layer. Data endpoints never surface
//! upstream failures; they degrade to the bundled dataset inside the
//! services, so the router only knows about validation and lookup errors.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    cache::TtlCache,
    config::Config,
    mock::MockStore,
    services::{FeedService, LeagueDataService, PhotoService, SubscriptionService},
    sources::build_provider,
};

pub mod api;
pub mod responses;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub league: Arc<LeagueDataService>,
    pub feeds: Arc<FeedService>,
    pub photos: Arc<PhotoService>,
    pub subscription: Arc<SubscriptionService>,
}

impl AppState {
    /// Wire the full service stack from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Arc::new(TtlCache::with_system_clock(config.cache.ttl_seconds));
        let mock = Arc::new(MockStore::load()?);
        let provider = build_provider(&config.upstream)?;

        Ok(Self {
            league: Arc::new(LeagueDataService::new(
                provider,
                cache.clone(),
                mock.clone(),
            )),
            feeds: Arc::new(FeedService::new(&config.feeds, cache, mock)?),
            photos: Arc::new(PhotoService::new()),
            subscription: Arc::new(SubscriptionService::new(config.email.clone())?),
        })
    }
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &Config) -> Result<Self> {
        let state = AppState::from_config(config)?;
        let app = create_router(state);
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        Ok(Self { app, addr })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api", get(api::api_info))
        // standings
        .route("/api/teams", get(api::list_teams))
        .route("/api/teams/:id", get(api::get_team))
        // scorers
        .route("/api/scorers", get(api::list_scorers))
        .route("/api/scorers/:id", get(api::get_scorer))
        .route("/api/stats", get(api::league_stats))
        // fixtures
        .route("/api/fixtures", get(api::list_fixtures))
        .route("/api/fixtures/matchday/:matchday", get(api::fixtures_by_matchday))
        .route("/api/fixtures/team/:team", get(api::fixtures_by_team))
        .route("/api/calendar", get(api::calendar))
        .route("/api/matches/today", get(api::matches_today))
        // news
        .route("/api/news", get(api::list_news))
        .route("/api/news/categories", get(api::news_categories))
        .route("/api/news/articles/:id", get(api::get_article))
        // transfers
        .route("/api/transfers", get(api::list_transfers))
        .route("/api/transfers/type/:type", get(api::transfers_by_type))
        // aggregates and extras
        .route("/api/dashboard", get(api::dashboard))
        .route("/api/player-photo", get(api::player_photo))
        .route("/api/subscribe", post(api::subscribe))
        .fallback(api::not_found)
        // Middleware (applied in reverse order)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
