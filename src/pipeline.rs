//! Page build: location, directory and news, assembled into a [`SitePage`].
//!
//! 1. **Location**: run the fallback chain, derive keywords, local
//!    resources and event links from the result
//! 2. **News**: fetch every feed, deduplicate by title, keep the eligible
//!    pool (real image, title, description) newest first
//! 3. **Selection**: balanced grid, then a carousel disjoint from it
//!
//! Nothing here fails. Every remote failure degrades to a fallback, and an
//! empty pool becomes the page's news error state.

use crate::api::HttpGet;
use crate::config::SiteConfig;
use crate::directory::{event_links, local_resources, location_keywords};
use crate::feeds::{dedupe_by_title, eligible_pool, fetch_all};
use crate::location::{LocationResolver, PositionSource};
use crate::models::SitePage;
use crate::select::select_sections;
use crate::utils::time_of_day;
use chrono::{DateTime, Local};
use tracing::{info, instrument, warn};

/// Shown in place of the news section when no article could be loaded.
pub const NEWS_ERROR: &str = "Unable to load latest news. Please try again later.";

/// Runtime hints for the location chain.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// IANA timezone name, e.g. `Europe/London`.
    pub timezone: Option<String>,
    /// Language tag, e.g. `en_GB.UTF-8` or `de-DE`.
    pub language: Option<String>,
}

/// Build the page as of `now`.
///
/// # Arguments
///
/// * `http` - Client for geolocation and feed requests
/// * `position` - Device position source for the first location strategy
/// * `config` - Feeds, section sizes and location settings
/// * `env` - Timezone and language hints for the offline strategies
/// * `now` - Local time; picks the edition and the cache-busting value
///
/// # Returns
///
/// A complete [`SitePage`]. With no usable article the news sections are
/// empty and `news_error` is set.
#[instrument(level = "info", skip_all, fields(feeds = config.feeds.len()))]
pub async fn build_page<H, P>(
    http: &H,
    position: &P,
    config: &SiteConfig,
    env: Environment,
    now: DateTime<Local>,
) -> SitePage
where
    H: HttpGet,
    P: PositionSource,
{
    let location = LocationResolver::new(http, position, &config.location)
        .with_timezone(env.timezone)
        .with_language(env.language)
        .resolve()
        .await;
    let location_keywords = location_keywords(&location.country, &location.country_code);
    let (resources_country, resources) = local_resources(&location.country);
    let events = event_links(&location);

    let fetched = fetch_all(
        http,
        &config.feeds,
        &config.rss2json_endpoint,
        now.timestamp_millis(),
        config.items_per_feed,
    )
    .await;
    let pool = eligible_pool(dedupe_by_title(fetched));
    info!(pool = pool.len(), "Eligible article pool");

    let (grid, carousel) = select_sections(&pool, config.grid_size, config.carousel_size);
    let news_error = if pool.is_empty() {
        warn!("No articles available; rendering news error state");
        Some(NEWS_ERROR.to_string())
    } else {
        None
    };

    let page = SitePage {
        local_date: now.date_naive().to_string(),
        time_of_day: time_of_day(now.time()).to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        location,
        location_keywords,
        carousel,
        grid,
        news_error,
        resources_country,
        resources,
        events,
    };
    info!(
        country = %page.location.country,
        grid = page.grid.len(),
        carousel = page.carousel.len(),
        edition = %page.time_of_day,
        "Built page"
    );
    page
}
