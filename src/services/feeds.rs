//! News and transfer aggregation from RSS feeds
//!
//! Feed items only carry a title reliably; category, transfer type, player,
//! clubs and fee are all classified or extracted from the title text with
//! keyword heuristics, defaulting to safe placeholders. When every feed is
//! unusable the bundled datasets are served instead.

use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::cache::{CacheKey, TtlCache};
use crate::config::FeedsConfig;
use crate::mock::MockStore;
use crate::models::{NewsArticle, NewsCategory, Transfer, TransferType};
use crate::sources::rss::{source_label, FeedClient, FeedItem};
use crate::utils::{generated_avatar_url, strip_html_tags, truncate_chars};

const SUMMARY_MAX_CHARS: usize = 220;

/// How much of a player name participates in duplicate detection
const DEDUP_KEY_CHARS: usize = 12;

pub struct FeedService {
    client: FeedClient,
    news_urls: Vec<String>,
    transfer_urls: Vec<String>,
    cache: Arc<TtlCache>,
    mock: Arc<MockStore>,
}

impl FeedService {
    pub fn new(
        config: &FeedsConfig,
        cache: Arc<TtlCache>,
        mock: Arc<MockStore>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: FeedClient::new(config.timeout_seconds, config.max_items)?,
            news_urls: config.news_urls.clone(),
            transfer_urls: config.transfer_urls.clone(),
            cache,
            mock,
        })
    }

    pub async fn news(&self) -> Vec<NewsArticle> {
        if let Some(cached) = self.cache.get_as::<Vec<NewsArticle>>(CacheKey::News).await {
            return cached;
        }

        if let Some((items, url)) = self.client.fetch_first_usable(&self.news_urls).await {
            let articles = map_news_items(items, &source_label(url));
            self.cache.set_as(CacheKey::News, &articles).await;
            return articles;
        }

        tracing::warn!("all news feeds unusable, serving bundled articles");
        let mut articles: Vec<NewsArticle> = self
            .mock
            .news
            .iter()
            .cloned()
            .map(|mut article| {
                if article.image.is_empty() {
                    article.image = smart_image(article.category).to_string();
                }
                article
            })
            .collect();
        articles.sort_by(|a, b| b.date.cmp(&a.date));
        articles
    }

    pub async fn article(&self, id: u64) -> Option<NewsArticle> {
        self.news().await.into_iter().find(|a| a.id == id)
    }

    pub async fn transfers(&self) -> Vec<Transfer> {
        if let Some(cached) = self
            .cache
            .get_as::<Vec<Transfer>>(CacheKey::Transfers)
            .await
        {
            return cached;
        }

        if let Some((items, _url)) = self.client.fetch_first_usable(&self.transfer_urls).await {
            let transfers = self.map_transfer_items(items);
            self.cache.set_as(CacheKey::Transfers, &transfers).await;
            return transfers;
        }

        tracing::warn!("all transfer feeds unusable, serving bundled transfers");
        let mut transfers = self.mock.transfers.clone();
        transfers.sort_by(|a, b| b.date.cmp(&a.date));
        transfers
    }

    fn map_transfer_items(&self, items: Vec<FeedItem>) -> Vec<Transfer> {
        let mut seen_keys: Vec<String> = Vec::new();
        let mut transfers = Vec::new();

        for item in items {
            let title = clean_title(&item.title);
            let player = extract_player(&title);
            if player.is_empty() {
                continue;
            }

            // first mention of a player wins, later duplicates are dropped
            let key: String = player
                .to_lowercase()
                .chars()
                .take(DEDUP_KEY_CHARS)
                .collect();
            if seen_keys.contains(&key) {
                continue;
            }
            seen_keys.push(key);

            let transfer_type = classify_transfer(&title);
            let clubs = self.find_clubs(&title);
            let (from_team, from_crest, to_team, to_crest) =
                assign_clubs(transfer_type, &clubs);

            transfers.push(Transfer {
                id: transfers.len() as u64 + 1,
                player_photo: Some(
                    item.image
                        .clone()
                        .unwrap_or_else(|| generated_avatar_url(&player)),
                ),
                player,
                from_team,
                to_team,
                date: item.published.unwrap_or_else(Utc::now),
                fee: extract_fee(&title),
                transfer_type,
                headline: Some(title),
                from_crest,
                to_crest,
            });
        }

        transfers.sort_by(|a, b| b.date.cmp(&a.date));
        transfers
    }

    /// Clubs mentioned in a title, in order of appearance
    fn find_clubs(&self, title: &str) -> Vec<(String, String)> {
        let lower = title.to_lowercase();
        let mut found: Vec<(usize, String, String)> = self
            .mock
            .teams
            .iter()
            .filter_map(|team| {
                lower
                    .find(&team.name.to_lowercase())
                    .map(|pos| (pos, team.name.clone(), team.logo.clone()))
            })
            .collect();
        found.sort_by_key(|(pos, _, _)| *pos);
        found.into_iter().map(|(_, name, logo)| (name, logo)).collect()
    }
}

fn map_news_items(items: Vec<FeedItem>, source: &str) -> Vec<NewsArticle> {
    let mut articles: Vec<NewsArticle> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let title = clean_title(&item.title);
            let category = classify_news(&title);
            let summary = item
                .description
                .as_deref()
                .map(strip_html_tags)
                .filter(|s| !s.is_empty())
                .map(|s| truncate_chars(&s, SUMMARY_MAX_CHARS))
                .unwrap_or_else(|| title.clone());

            NewsArticle {
                id: index as u64 + 1,
                image: item
                    .image
                    .unwrap_or_else(|| smart_image(category).to_string()),
                title,
                summary,
                content: None,
                category,
                date: item.published.unwrap_or_else(Utc::now),
                source: source.to_string(),
                author: None,
                link: item.link,
            }
        })
        .collect();

    articles.sort_by(|a, b| b.date.cmp(&a.date));
    articles
}

/// Strip feed-specific prefixes
fn clean_title(title: &str) -> String {
    title
        .trim()
        .trim_start_matches("BBC Sport - ")
        .trim()
        .to_string()
}

const TRANSFER_WORDS: &[&str] = &[
    "transfer", "sign", "signs", "signing", "deal", "bid", "move", "joins", "loan", "fee",
    "medical", "swoop", "target",
];
const INJURY_WORDS: &[&str] = &[
    "injury", "injured", "blow", "ruled out", "sidelined", "surgery", "hamstring", "knock",
    "fitness",
];
const INTERNATIONAL_WORDS: &[&str] = &[
    "world cup",
    "euro",
    "nations league",
    "international",
    "national team",
];
const MATCH_WORDS: &[&str] = &[
    "beat", "beats", "draw", "win", "wins", "defeat", "loss", "derby", "clasico", "victory",
    "highlights", "report", "goal",
];

/// Keyword-membership test over the lower-cased title
fn classify_news(title: &str) -> NewsCategory {
    let lower = title.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if contains_any(TRANSFER_WORDS) {
        NewsCategory::Transfer
    } else if contains_any(INJURY_WORDS) {
        NewsCategory::Injury
    } else if contains_any(INTERNATIONAL_WORDS) {
        NewsCategory::International
    } else if contains_any(MATCH_WORDS) {
        NewsCategory::Match
    } else {
        NewsCategory::League
    }
}

const LOAN_WORDS: &[&str] = &["loan", "loaned"];
const EXTENSION_WORDS: &[&str] = &[
    "extends",
    "extension",
    "renews",
    "renewal",
    "new contract",
    "new deal",
];
const OUT_WORDS: &[&str] = &["leaves", "departs", "exit", "sold", "sells", "released"];

fn classify_transfer(title: &str) -> TransferType {
    let lower = title.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if contains_any(LOAN_WORDS) {
        TransferType::Loan
    } else if contains_any(EXTENSION_WORDS) {
        TransferType::Extension
    } else if contains_any(OUT_WORDS) {
        TransferType::Out
    } else {
        TransferType::In
    }
}

const PLAYER_STOP_WORDS: &[&str] = &[
    "signs", "joins", "agrees", "completes", "extends", "leaves", "departs", "linked", "set",
    "to", "in", "on", "for", "seals", "nears", "transfer", "from", "after",
];

/// Leading words of the headline up to the first verb-ish stop word
fn extract_player(title: &str) -> String {
    let mut words: Vec<&str> = Vec::new();
    for word in title.split_whitespace() {
        let bare = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if bare.is_empty() || PLAYER_STOP_WORDS.contains(&bare.as_str()) {
            break;
        }
        words.push(word.trim_matches(|c: char| c == ':' || c == ','));
        if words.len() == 3 {
            break;
        }
    }
    words.join(" ")
}

fn extract_fee(title: &str) -> String {
    static FEE_RE: OnceLock<Regex> = OnceLock::new();
    let re = FEE_RE.get_or_init(|| {
        Regex::new(r"(?i)[€£$]\s?\d+(?:\.\d+)?\s?m").expect("valid fee regex")
    });

    if let Some(m) = re.find(title) {
        return m.as_str().replace(' ', "");
    }
    if title.to_lowercase().contains("free") {
        return "Free".to_string();
    }
    "Undisclosed".to_string()
}

/// Place the mentioned clubs on the right side of the move for the type
fn assign_clubs(
    transfer_type: TransferType,
    clubs: &[(String, String)],
) -> (String, Option<String>, String, Option<String>) {
    let unknown = || ("Unknown".to_string(), None);

    let first = clubs
        .first()
        .map(|(n, l)| (n.clone(), Some(l.clone())));
    let second = clubs
        .get(1)
        .map(|(n, l)| (n.clone(), Some(l.clone())));

    let ((from, from_crest), (to, to_crest)) = match transfer_type {
        // "Barcelona sign X from Athletic" mentions the buyer first
        TransferType::In => (second.unwrap_or_else(unknown), first.unwrap_or_else(unknown)),
        TransferType::Out => (first.unwrap_or_else(unknown), second.unwrap_or_else(unknown)),
        TransferType::Loan => (first.unwrap_or_else(unknown), second.unwrap_or_else(unknown)),
        // an extension stays at the same club
        TransferType::Extension => {
            let club = first.unwrap_or_else(unknown);
            (club.clone(), club)
        }
    };

    (from, from_crest, to, to_crest)
}

/// Stock imagery per category for items without their own picture
fn smart_image(category: NewsCategory) -> &'static str {
    match category {
        NewsCategory::Transfer => {
            "https://images.unsplash.com/photo-1459865264687-595d652de67e?auto=format&fit=crop&q=80&w=800"
        }
        NewsCategory::Injury => {
            "https://images.unsplash.com/photo-1551958219-acbc608c6377?auto=format&fit=crop&q=80&w=800"
        }
        NewsCategory::Match => {
            "https://images.unsplash.com/photo-1522778119026-d647f0596c20?auto=format&fit=crop&q=80&w=800"
        }
        NewsCategory::International => {
            "https://images.unsplash.com/photo-1574629810360-7efbbe195018?auto=format&fit=crop&q=80&w=800"
        }
        NewsCategory::League => {
            "https://images.unsplash.com/photo-1579952363873-27f3bde9be2e?auto=format&fit=crop&q=80&w=800"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(title: &str, minutes_ago: i64) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            link: Some("https://example.com/story".to_string()),
            description: Some("<p>Some <b>markup</b> here</p>".to_string()),
            published: Some(
                Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap()
                    - chrono::Duration::minutes(minutes_ago),
            ),
            image: None,
        }
    }

    fn service_without_feeds() -> FeedService {
        let mut config = crate::config::Config::default().feeds;
        config.news_urls.clear();
        config.transfer_urls.clear();
        FeedService::new(
            &config,
            Arc::new(TtlCache::with_system_clock(300)),
            Arc::new(MockStore::load().unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn news_classification_uses_keyword_membership() {
        assert_eq!(
            classify_news("Barcelona complete €58m signing"),
            NewsCategory::Transfer
        );
        assert_eq!(
            classify_news("Sancet suffers hamstring injury"),
            NewsCategory::Injury
        );
        assert_eq!(
            classify_news("Spain name World Cup squad"),
            NewsCategory::International
        );
        assert_eq!(
            classify_news("Real Madrid beat Getafe"),
            NewsCategory::Match
        );
        assert_eq!(
            classify_news("Broadcast schedule confirmed"),
            NewsCategory::League
        );
    }

    #[test]
    fn transfer_type_classification() {
        assert_eq!(classify_transfer("Vermeeren loaned to Leipzig"), TransferType::Loan);
        assert_eq!(classify_transfer("Pedri extends until 2030"), TransferType::Extension);
        assert_eq!(classify_transfer("Kubo leaves Real Sociedad"), TransferType::Out);
        assert_eq!(classify_transfer("Joao Gomes joins Atletico"), TransferType::In);
    }

    #[test]
    fn player_extraction_stops_at_verbs() {
        assert_eq!(extract_player("Nico Williams joins Barcelona"), "Nico Williams");
        assert_eq!(extract_player("Kubo leaves Real Sociedad"), "Kubo");
        assert_eq!(
            extract_player("Joao Felix Gomes Silva something"),
            "Joao Felix Gomes"
        );
    }

    #[test]
    fn fee_extraction() {
        assert_eq!(extract_fee("Barcelona agree €58m deal"), "€58m");
        assert_eq!(extract_fee("Done on a free transfer"), "Free");
        assert_eq!(extract_fee("Fee not disclosed"), "Undisclosed");
    }

    #[test]
    fn news_items_are_sorted_newest_first_with_stripped_summaries() {
        let articles = map_news_items(
            vec![item("Older story", 60), item("Newer story", 0)],
            "BBC Sport",
        );
        assert_eq!(articles[0].title, "Newer story");
        assert_eq!(articles[0].summary, "Some markup here");
        assert_eq!(articles[0].source, "BBC Sport");
        assert!(articles[0].image.contains("unsplash"));
    }

    #[test]
    fn bbc_prefix_is_stripped() {
        assert_eq!(clean_title("BBC Sport - Big derby preview"), "Big derby preview");
    }

    #[tokio::test]
    async fn transfer_dedup_is_first_seen_wins() {
        let service = service_without_feeds();
        let transfers = service.map_transfer_items(vec![
            item("Nico Williams joins Barcelona in €58m deal", 0),
            item("Nico Williams medical booked", 5),
            item("Kubo leaves Real Sociedad in €45m move", 10),
        ]);

        assert_eq!(transfers.len(), 2);
        let nico = transfers.iter().find(|t| t.player == "Nico Williams").unwrap();
        assert_eq!(nico.fee, "€58m");
        assert_eq!(nico.to_team, "Barcelona");
    }

    #[tokio::test]
    async fn no_usable_feeds_falls_back_to_bundled_news() {
        let service = service_without_feeds();
        let articles = service.news().await;
        let mock = MockStore::load().unwrap();

        assert_eq!(articles.len(), mock.news.len());
        // newest first
        for pair in articles.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[tokio::test]
    async fn no_usable_feeds_falls_back_to_bundled_transfers() {
        let service = service_without_feeds();
        let transfers = service.transfers().await;
        assert!(!transfers.is_empty());
        for pair in transfers.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }
}
