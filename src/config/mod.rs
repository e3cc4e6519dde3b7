use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub feeds: FeedsConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

/// Which third-party football-data API supplies live standings/scorers/fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    FootballData,
    ApiSports,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub provider: ProviderKind,
    /// API key for the selected provider; live fetching is disabled when unset
    pub api_key: Option<String>,
    /// Base URL override, mainly for tests against a local stub
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// News feed URLs, tried in priority order
    pub news_urls: Vec<String>,
    /// Transfer-rumour feed URLs, tried in priority order
    pub transfer_urls: Vec<String>,
    pub max_items: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_url: String,
    /// Transactional mail API key; sending is skipped when unset
    pub api_key: Option<String>,
    pub sender_name: String,
    pub sender_email: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            upstream: UpstreamConfig {
                provider: ProviderKind::FootballData,
                api_key: None,
                base_url: None,
                timeout_seconds: 8,
            },
            cache: CacheConfig { ttl_seconds: 300 },
            feeds: FeedsConfig {
                news_urls: vec![
                    "https://feeds.bbci.co.uk/sport/football/spanish-la-liga/rss.xml".to_string(),
                    "https://news.google.com/rss/search?q=La+Liga+Football&hl=en-GB&gl=GB&ceid=GB:en"
                        .to_string(),
                ],
                transfer_urls: vec![
                    "https://news.google.com/rss/search?q=La+Liga+transfer&hl=en-GB&gl=GB&ceid=GB:en"
                        .to_string(),
                ],
                max_items: 10,
                timeout_seconds: 5,
            },
            email: EmailConfig {
                api_url: "https://api.brevo.com/v3/smtp/email".to_string(),
                api_key: None,
                sender_name: "La Liga Hub".to_string(),
                sender_email: "alerts@laligahub.example".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        let mut config: Config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            default_config
        };

        // Secrets come from the environment when present, so keys never need
        // to live in the config file.
        if let Ok(key) = std::env::var("LIGA_HUB_API_KEY") {
            if !key.is_empty() {
                config.upstream.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("LIGA_HUB_EMAIL_KEY") {
            if !key.is_empty() {
                config.email.api_key = Some(key);
            }
        }
        if let Ok(sender) = std::env::var("LIGA_HUB_EMAIL_SENDER") {
            if !sender.is_empty() {
                config.email.sender_email = sender;
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.web.port = port;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.web.port, 3000);
        assert_eq!(parsed.cache.ttl_seconds, 300);
        assert_eq!(parsed.upstream.provider, ProviderKind::FootballData);
        assert!(parsed.upstream.api_key.is_none());
        assert_eq!(parsed.feeds.max_items, 10);
    }

    #[test]
    fn provider_kind_uses_kebab_case() {
        let toml_str = r#"
            provider = "api-sports"
            timeout_seconds = 8
        "#;
        let upstream: UpstreamConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(upstream.provider, ProviderKind::ApiSports);
    }
}
