//! League data orchestration
//!
//! Every resource follows the same shape: cache lookup, then the live
//! provider when one is configured, then the bundled dataset. The fallback
//! composition lives in [`LeagueDataService::resolve`] so route handlers and
//! per-resource methods never repeat the try/catch dance.

use chrono::{NaiveDate, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cache::{CacheKey, TtlCache};
use crate::errors::FetchResult;
use crate::mock::MockStore;
use crate::models::{
    CalendarDay, Dashboard, Fixture, LeagueStats, MatchStatus, Scorer, Standing,
};
use crate::services::FeedService;
use crate::sources::{FixturesProvider, LeagueProvider, ScorersProvider, StandingsProvider};
use crate::utils::time::league_today;

pub struct LeagueDataService {
    provider: Option<Arc<dyn LeagueProvider>>,
    cache: Arc<TtlCache>,
    mock: Arc<MockStore>,
}

impl LeagueDataService {
    pub fn new(
        provider: Option<Arc<dyn LeagueProvider>>,
        cache: Arc<TtlCache>,
        mock: Arc<MockStore>,
    ) -> Self {
        Self {
            provider,
            cache,
            mock,
        }
    }

    /// cache -> live -> bundled, with a cache write after a successful live fetch
    async fn resolve<T>(
        &self,
        key: CacheKey,
        live: Option<BoxFuture<'_, FetchResult<Vec<T>>>>,
        bundled: &[T],
    ) -> Vec<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        if let Some(cached) = self.cache.get_as::<Vec<T>>(key).await {
            return cached;
        }

        if let Some(fetch) = live {
            match fetch.await {
                Ok(data) => {
                    self.cache.set_as(key, &data).await;
                    return data;
                }
                Err(e) => {
                    tracing::warn!(
                        "live {} fetch failed, serving bundled data: {}",
                        key.as_str(),
                        e
                    );
                }
            }
        }

        bundled.to_vec()
    }

    pub async fn standings(&self) -> Vec<Standing> {
        let live = self
            .provider
            .as_ref()
            .map(|p| p.fetch_standings().boxed());
        let mut rows = self
            .resolve(CacheKey::Standings, live, &self.mock.teams)
            .await;
        rows.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.goal_difference.cmp(&a.goal_difference))
        });
        rows
    }

    pub async fn team_by_id(&self, id: u64) -> Option<Standing> {
        self.standings().await.into_iter().find(|t| t.id == id)
    }

    pub async fn scorers(&self) -> Vec<Scorer> {
        let live = self.provider.as_ref().map(|p| p.fetch_scorers().boxed());
        let mut rows = self
            .resolve(CacheKey::Scorers, live, &self.mock.scorers)
            .await;
        rows.sort_by(|a, b| b.goals.cmp(&a.goals).then(b.assists.cmp(&a.assists)));
        rows
    }

    pub async fn scorer_by_id(&self, id: u64) -> Option<Scorer> {
        self.scorers().await.into_iter().find(|s| s.id == id)
    }

    /// Season aggregates are a bundled snapshot, not derived from live data
    pub fn stats(&self) -> LeagueStats {
        self.mock.stats.clone()
    }

    pub async fn fixtures(&self) -> Vec<Fixture> {
        let live = self.provider.as_ref().map(|p| p.fetch_fixtures().boxed());
        let mut rows = self
            .resolve(CacheKey::Fixtures, live, &self.mock.fixtures)
            .await;
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.time.cmp(&b.time)));
        rows
    }

    pub async fn fixtures_for_matchday(&self, matchday: u32) -> Vec<Fixture> {
        self.fixtures()
            .await
            .into_iter()
            .filter(|f| f.matchday == matchday)
            .collect()
    }

    /// Case-insensitive substring match against either team name
    pub async fn fixtures_for_team(&self, team: &str) -> Vec<Fixture> {
        let needle = team.to_lowercase();
        self.fixtures()
            .await
            .into_iter()
            .filter(|f| {
                f.home_team.to_lowercase().contains(&needle)
                    || f.away_team.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub async fn calendar(&self) -> Vec<CalendarDay> {
        let mut days: BTreeMap<NaiveDate, Vec<Fixture>> = BTreeMap::new();
        for fixture in self.fixtures().await {
            days.entry(fixture.date).or_default().push(fixture);
        }

        days.into_iter()
            .map(|(date, mut matches)| {
                matches.sort_by(|a, b| a.time.cmp(&b.time));
                CalendarDay {
                    date,
                    day_name: date.format("%A").to_string(),
                    matches,
                }
            })
            .collect()
    }

    pub async fn matches_on(&self, date: NaiveDate) -> Vec<Fixture> {
        self.fixtures()
            .await
            .into_iter()
            .filter(|f| f.date == date)
            .collect()
    }

    pub async fn matches_today(&self) -> Vec<Fixture> {
        self.matches_on(league_today(Utc::now())).await
    }

    /// Same-day match count read from the fixtures cache only; a cold cache
    /// counts as zero so the subscribe path never blocks on an upstream call
    pub async fn cached_today_match_count(&self) -> usize {
        let today = league_today(Utc::now());
        match self.cache.get_as::<Vec<Fixture>>(CacheKey::Fixtures).await {
            Some(fixtures) => fixtures.iter().filter(|f| f.date == today).count(),
            None => 0,
        }
    }

    pub async fn dashboard(&self, feeds: &FeedService) -> Dashboard {
        if let Some(cached) = self.cache.get_as::<Dashboard>(CacheKey::Dashboard).await {
            return cached;
        }

        let top_teams: Vec<Standing> = self.standings().await.into_iter().take(5).collect();
        let top_scorers: Vec<Scorer> = self.scorers().await.into_iter().take(3).collect();
        let next_fixtures: Vec<Fixture> = self
            .fixtures()
            .await
            .into_iter()
            .filter(|f| f.status == MatchStatus::Scheduled)
            .take(3)
            .collect();
        let latest_news = feeds.news().await.into_iter().take(3).collect();
        let latest_transfers = feeds.transfers().await.into_iter().take(3).collect();

        let dashboard = Dashboard {
            top_teams,
            top_scorers,
            next_fixtures,
            latest_news,
            latest_transfers,
            stats: self.stats(),
        };

        self.cache.set_as(CacheKey::Dashboard, &dashboard).await;
        dashboard
    }
}
