//! Upstream data sources
//!
//! One client + mapper pair per third-party football-data API, behind
//! capability traits so the rest of the service never sees a provider's wire
//! shapes. The provider in use is selected by configuration; when no API key
//! is configured there is no provider at all and every resource serves the
//! bundled mock dataset.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{ProviderKind, UpstreamConfig};
use crate::errors::FetchResult;
use crate::models::{Fixture, Scorer, Standing};

pub mod api_sports;
pub mod football_data;
pub mod rss;

pub use api_sports::ApiSportsProvider;
pub use football_data::FootballDataProvider;
pub use rss::{FeedClient, FeedItem};

#[async_trait]
pub trait StandingsProvider: Send + Sync {
    async fn fetch_standings(&self) -> FetchResult<Vec<Standing>>;
}

#[async_trait]
pub trait ScorersProvider: Send + Sync {
    async fn fetch_scorers(&self) -> FetchResult<Vec<Scorer>>;
}

#[async_trait]
pub trait FixturesProvider: Send + Sync {
    async fn fetch_fixtures(&self) -> FetchResult<Vec<Fixture>>;
}

/// The full capability set a live provider supplies
pub trait LeagueProvider: StandingsProvider + ScorersProvider + FixturesProvider {}

impl<T: StandingsProvider + ScorersProvider + FixturesProvider> LeagueProvider for T {}

/// Build the configured provider, or `None` when live fetching is disabled
pub fn build_provider(config: &UpstreamConfig) -> Result<Option<Arc<dyn LeagueProvider>>> {
    let Some(api_key) = config.api_key.clone() else {
        tracing::info!("no upstream API key configured, serving bundled data only");
        return Ok(None);
    };

    let provider: Arc<dyn LeagueProvider> = match config.provider {
        ProviderKind::FootballData => Arc::new(FootballDataProvider::new(
            api_key,
            config.base_url.clone(),
            config.timeout_seconds,
        )?),
        ProviderKind::ApiSports => Arc::new(ApiSportsProvider::new(
            api_key,
            config.base_url.clone(),
            config.timeout_seconds,
        )?),
    };

    Ok(Some(provider))
}
