//! News feed aggregation.
//!
//! Feeds are fetched one after another in declaration order. Each feed goes
//! through the same pipeline:
//!
//! 1. **Fetching**: rss2json JSON ([`rss2json`]) or raw RSS XML ([`rss`])
//! 2. **Filtering**: drop items without title/description and
//!    newsletter-style or known-bad items ([`passes_content_filter`])
//! 3. **Mapping**: clean up into an [`Article`] and classify ([`to_article`])
//!
//! The merged list is then deduplicated by title ([`dedupe_by_title`]) and
//! narrowed to articles worth showing, newest first ([`eligible_pool`]).
//!
//! A failing feed is logged and skipped; it never affects the other feeds.

pub mod rss;
pub mod rss2json;

use crate::api::{HttpGet, get_json};
use crate::classify::classify;
use crate::error::FetchError;
use crate::models::{Article, PLACEHOLDER_IMAGE};
use crate::utils::{strip_html, truncate_chars};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Longest description kept, in characters.
pub const DESCRIPTION_LIMIT: usize = 200;
/// Description used when a feed item's description is empty after cleanup.
pub const FALLBACK_DESCRIPTION: &str = "Read more about this important LGBTQ+ news story.";
/// Source label used when a feed item names no author.
pub const FALLBACK_SOURCE: &str = "LGBTQ+ News";

/// Lower-case fragments that disqualify an item by its title.
const BLOCKED_TITLE_FRAGMENTS: [&str; 6] = [
    "newsletter",
    "weekly roundup",
    "subscribe",
    "sign up",
    "clock twink",
    "allah is lesbian",
];
/// Lower-case fragments that disqualify an item by its description.
const BLOCKED_DESCRIPTION_FRAGMENTS: [&str; 2] = ["newsletter", "weekly roundup"];

/// How a feed is retrieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedFormat {
    /// Through the rss2json conversion endpoint.
    #[default]
    #[serde(rename = "rss2json")]
    Rss2Json,
    /// Raw RSS 2.0 XML parsed locally.
    #[serde(rename = "rss")]
    Rss,
}

/// A configured news source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    /// The source's own RSS URL.
    pub url: String,
    #[serde(default)]
    pub format: FeedFormat,
}

impl FeedSource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            format: FeedFormat::Rss2Json,
        }
    }

    /// URL actually requested for this feed.
    ///
    /// rss2json requests carry a `_` cache-busting parameter.
    pub fn request_url(&self, rss2json_endpoint: &str, cache_buster: i64) -> Result<String, FetchError> {
        match self.format {
            FeedFormat::Rss => Ok(self.url.clone()),
            FeedFormat::Rss2Json => {
                let buster = cache_buster.to_string();
                Url::parse_with_params(
                    rss2json_endpoint,
                    &[("rss_url", self.url.as_str()), ("_", buster.as_str())],
                )
                .map(String::from)
                .map_err(|e| FetchError::Request(format!("bad rss2json endpoint: {}", e)))
            }
        }
    }
}

/// The community news sources shipped by default.
pub fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("The Advocate", "https://www.advocate.com/rss.xml"),
        FeedSource::new("PinkNews", "https://www.pinknews.co.uk/feed/"),
        FeedSource::new("LGBTQ Nation", "https://www.lgbtqnation.com/feed/"),
        FeedSource::new("them", "https://www.them.us/feed/rss"),
        FeedSource::new("Queerty", "https://www.queerty.com/feed"),
        FeedSource::new("Out", "https://www.out.com/rss.xml"),
        FeedSource::new("Gay Times", "https://www.gaytimes.co.uk/feed/"),
    ]
}

/// A feed item in the shape shared by every feed format.
///
/// Empty strings are normalized to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    pub author: Option<String>,
    pub enclosure_link: Option<String>,
    pub thumbnail: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawItem {
    pub(crate) fn normalized(self) -> Self {
        Self {
            title: non_empty(self.title),
            description: non_empty(self.description),
            content: non_empty(self.content),
            link: non_empty(self.link),
            pub_date: non_empty(self.pub_date),
            author: non_empty(self.author),
            enclosure_link: non_empty(self.enclosure_link),
            thumbnail: non_empty(self.thumbnail),
        }
    }
}

/// Whether an item is real news worth keeping.
///
/// Rejects items without a title or description, and newsletter,
/// subscription and roundup posts.
pub fn passes_content_filter(item: &RawItem) -> bool {
    let (Some(title), Some(description)) = (&item.title, &item.description) else {
        return false;
    };
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    !BLOCKED_TITLE_FRAGMENTS.iter().any(|f| title.contains(f))
        && !BLOCKED_DESCRIPTION_FRAGMENTS
            .iter()
            .any(|f| description.contains(f))
}

/// Map a filtered feed item to a classified [`Article`].
pub fn to_article(item: RawItem) -> Article {
    let title = item.title.unwrap_or_default();
    let stripped = strip_html(item.description.as_deref().unwrap_or_default());
    let mut description = truncate_chars(stripped.trim(), DESCRIPTION_LIMIT);
    if description.is_empty() {
        description = FALLBACK_DESCRIPTION.to_string();
    }
    let content = item.content.or(item.description).unwrap_or_default();
    let category = classify(&title, &description, &content);

    Article {
        image_url: item
            .enclosure_link
            .or(item.thumbnail)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        url: item.link.unwrap_or_default(),
        published_at: item.pub_date.unwrap_or_default(),
        source_name: item.author.unwrap_or_else(|| FALLBACK_SOURCE.to_string()),
        category: Some(category),
        title,
        description,
        content,
    }
}

/// Deduplicate by title: a later article replaces an earlier one with the
/// same title, in the position where that title first appeared.
pub fn dedupe_by_title(articles: Vec<Article>) -> Vec<Article> {
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Article> = Vec::with_capacity(articles.len());
    for article in articles {
        match position.get(&article.title) {
            Some(&i) => unique[i] = article,
            None => {
                position.insert(article.title.clone(), unique.len());
                unique.push(article);
            }
        }
    }
    unique
}

/// Keep articles with a real image, a title and a description, newest first.
///
/// Articles whose timestamp cannot be parsed sort last; ties keep their order.
pub fn eligible_pool(articles: Vec<Article>) -> Vec<Article> {
    let mut pool: Vec<Article> = articles
        .into_iter()
        .filter(|a| a.has_real_image() && !a.title.is_empty() && !a.description.is_empty())
        .collect();
    pool.sort_by(|a, b| b.published_time().cmp(&a.published_time()));
    pool
}

/// Fetch one feed and map its accepted items to articles.
///
/// # Arguments
///
/// * `http` - Client used for the single GET
/// * `feed` - The source; its format decides rss2json or direct XML
/// * `rss2json_endpoint` - Conversion endpoint for `rss2json` feeds
/// * `cache_buster` - Value of the `_` query parameter
/// * `items_per_feed` - Cap on accepted items, applied after filtering
///
/// # Returns
///
/// The feed's articles in feed order, or a [`FetchError`] when the request
/// fails or the payload is not a usable feed.
#[instrument(level = "info", skip_all, fields(feed = %feed.name))]
pub async fn fetch_feed<H: HttpGet>(
    http: &H,
    feed: &FeedSource,
    rss2json_endpoint: &str,
    cache_buster: i64,
    items_per_feed: usize,
) -> Result<Vec<Article>, FetchError> {
    let url = feed.request_url(rss2json_endpoint, cache_buster)?;
    let items = match feed.format {
        FeedFormat::Rss2Json => get_json::<_, rss2json::Rss2JsonResponse>(http, &url)
            .await?
            .into_items()?,
        FeedFormat::Rss => rss::parse_channel(&http.get_text(&url).await?)?,
    };

    let raw_count = items.len();
    let articles: Vec<Article> = items
        .into_iter()
        .filter(passes_content_filter)
        .take(items_per_feed)
        .map(to_article)
        .collect();
    debug!(raw_count, accepted = articles.len(), "Parsed feed");
    Ok(articles)
}

/// Fetch every feed in order and return all accepted articles, not yet
/// deduplicated.
///
/// Feeds are awaited one at a time: a slow feed delays the next one but
/// never aborts it.
#[instrument(level = "info", skip_all, fields(feeds = feeds.len()))]
pub async fn fetch_all<H: HttpGet>(
    http: &H,
    feeds: &[FeedSource],
    rss2json_endpoint: &str,
    cache_buster: i64,
    items_per_feed: usize,
) -> Vec<Article> {
    let per_feed: Vec<Vec<Article>> = stream::iter(feeds)
        .then(|feed| async move {
            match fetch_feed(http, feed, rss2json_endpoint, cache_buster, items_per_feed).await {
                Ok(articles) => {
                    info!(feed = %feed.name, count = articles.len(), "Fetched feed");
                    articles
                }
                Err(e) => {
                    warn!(feed = %feed.name, error = %e, "Failed to fetch feed; skipping");
                    Vec::new()
                }
            }
        })
        .collect()
        .await;

    let articles: Vec<Article> = per_feed.into_iter().flatten().collect();
    info!(count = articles.len(), "Fetched articles from all feeds");
    articles
}
