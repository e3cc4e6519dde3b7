//! RSS feed client and streaming parser
//!
//! Feeds are parsed with quick-xml rather than pattern matching over raw
//! text. Each field extraction is optional: an item only needs a title to be
//! usable, everything else gets a synthesized fallback further up. Feed URLs
//! are tried in priority order; the first one that yields usable items wins.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::{FetchError, FetchResult};

/// One normalized feed entry, before classification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

pub struct FeedClient {
    client: Client,
    max_items: usize,
}

impl FeedClient {
    pub fn new(timeout_seconds: u64, max_items: usize) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            // some feed hosts reject unknown agents outright
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self { client, max_items })
    }

    /// Fetch and parse a single feed; an empty result is an error so the
    /// caller can fall through to the next URL
    pub async fn fetch_feed(&self, url: &str) -> FetchResult<Vec<FeedItem>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let items = parse_feed(&body, self.max_items)?;
        if items.is_empty() {
            return Err(FetchError::EmptyFeed {
                url: url.to_string(),
            });
        }
        Ok(items)
    }

    /// Try each feed URL in priority order, returning the first usable batch
    /// together with the URL it came from
    pub async fn fetch_first_usable<'a>(
        &self,
        urls: &'a [String],
    ) -> Option<(Vec<FeedItem>, &'a str)> {
        for url in urls {
            match self.fetch_feed(url).await {
                Ok(items) => return Some((items, url)),
                Err(e) => {
                    tracing::warn!("feed {} unusable, trying next: {}", url, e);
                }
            }
        }
        None
    }
}

/// Human-readable source label for a feed URL
pub fn source_label(url: &str) -> String {
    let host = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();

    if host.contains("bbc") {
        "BBC Sport".to_string()
    } else if host.contains("google") {
        "Google News".to_string()
    } else if host.is_empty() {
        "RSS".to_string()
    } else {
        host
    }
}

/// Parse RSS content, keeping at most `max_items` usable items
///
/// Items without a title are dropped and do not count against the cap.
pub fn parse_feed(content: &str, max_items: usize) -> FetchResult<Vec<FeedItem>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut items: Vec<FeedItem> = Vec::new();
    let mut current_item: Option<FeedItem> = None;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e)?;
                match name.as_str() {
                    "item" | "entry" => current_item = Some(FeedItem::default()),
                    "enclosure" | "media:content" | "media:thumbnail" => {
                        if let Some(ref mut item) = current_item {
                            apply_media_attributes(item, e);
                        }
                    }
                    _ => {}
                }
                current_text.clear();
            }

            Ok(Event::Empty(ref e)) => {
                let name = element_name(e)?;
                if matches!(
                    name.as_str(),
                    "enclosure" | "media:content" | "media:thumbnail"
                ) {
                    if let Some(ref mut item) = current_item {
                        apply_media_attributes(item, e);
                    }
                }
            }

            Ok(Event::End(ref e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .map_err(|e| {
                        FetchError::parse("rss", format!("invalid UTF-8 in element name: {e}"))
                    })?
                    .to_string();
                if matches!(name.as_str(), "item" | "entry") {
                    if let Some(finished) = current_item.take() {
                        if !finished.title.is_empty() {
                            items.push(finished);
                            if items.len() >= max_items {
                                break;
                            }
                        }
                    }
                } else if let Some(ref mut item) = current_item {
                    let text = current_text.trim();
                    match name.as_str() {
                        "title" => item.title = text.to_string(),
                        "link" => {
                            if !text.is_empty() {
                                item.link = Some(text.to_string());
                            }
                        }
                        "description" | "summary" => {
                            if !text.is_empty() {
                                item.description = Some(text.to_string());
                            }
                        }
                        "pubDate" | "published" => item.published = parse_feed_date(text),
                        _ => {}
                    }
                }
                current_text.clear();
            }

            Ok(Event::Text(e)) => {
                // tolerate entities quick-xml does not know about
                let text = match e.unescape() {
                    Ok(t) => t.into_owned(),
                    Err(_) => String::from_utf8_lossy(&e).into_owned(),
                };
                current_text.push_str(&text);
            }

            Ok(Event::CData(e)) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|e| FetchError::parse("rss", format!("invalid UTF-8 in CDATA: {e}")))?;
                current_text.push_str(text);
            }

            Ok(Event::Eof) => break,

            Err(e) => return Err(FetchError::parse("rss", format!("XML error: {e}"))),

            _ => {}
        }
    }

    Ok(items)
}

fn element_name(element: &BytesStart) -> FetchResult<String> {
    std::str::from_utf8(element.name().as_ref())
        .map(str::to_string)
        .map_err(|e| FetchError::parse("rss", format!("invalid UTF-8 in element name: {e}")))
}

/// Pull an image URL out of enclosure/media attributes, first one wins
fn apply_media_attributes(item: &mut FeedItem, element: &BytesStart) {
    if item.image.is_some() {
        return;
    }
    let attrs = parse_attributes(element);
    let is_image = attrs
        .get("type")
        .map(|t| t.starts_with("image/"))
        .unwrap_or(true);
    if is_image {
        if let Some(url) = attrs.get("url") {
            item.image = Some(url.clone());
        }
    }
}

fn parse_attributes(element: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for attr in element.attributes().flatten() {
        if let (Ok(key), Ok(value)) = (
            std::str::from_utf8(attr.key.as_ref()),
            std::str::from_utf8(&attr.value),
        ) {
            attrs.insert(key.to_string(), value.to_string());
        }
    }
    attrs
}

/// Feeds disagree on date formats; RFC 2822 is the RSS norm, Atom uses RFC 3339
fn parse_feed_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
