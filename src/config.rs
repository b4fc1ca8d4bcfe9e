//! Site configuration.
//!
//! Every setting has a built-in default, so the binary runs without a config
//! file. A YAML file passed with `--config` overrides any subset of fields:
//!
//! ```yaml
//! grid_size: 9
//! carousel_size: 6
//! feeds:
//!   - name: The Advocate
//!     url: https://www.advocate.com/rss.xml
//!   - name: PinkNews
//!     url: https://www.pinknews.co.uk/feed/
//!     format: rss
//! location:
//!   position_timeout_secs: 5
//!   chain: [device_geolocation, ip_lookup, timezone, language]
//! ```

use crate::feeds::{FeedSource, default_feeds};
use crate::location::{DEFAULT_CHAIN, Strategy};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

/// Top-level configuration for one page build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Feeds fetched in this order.
    pub feeds: Vec<FeedSource>,
    /// rss2json conversion endpoint used for `rss2json` feeds.
    pub rss2json_endpoint: String,
    /// Maximum accepted items per feed.
    pub items_per_feed: usize,
    pub grid_size: usize,
    pub carousel_size: usize,
    pub location: LocationSettings,
    pub http: HttpSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            rss2json_endpoint: "https://api.rss2json.com/v1/api.json".to_string(),
            items_per_feed: 12,
            grid_size: 9,
            carousel_size: 6,
            location: LocationSettings::default(),
            http: HttpSettings::default(),
        }
    }
}

/// Endpoints and ordering for the location fallback chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
    pub reverse_geocode_url: String,
    pub ip_lookup_url: String,
    /// Upper bound on acquiring the device position.
    pub position_timeout_secs: u64,
    pub chain: Vec<Strategy>,
}

impl LocationSettings {
    pub fn position_timeout(&self) -> Duration {
        Duration::from_secs(self.position_timeout_secs)
    }
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            reverse_geocode_url: "https://api.bigdatacloud.net/data/reverse-geocode-client"
                .to_string(),
            ip_lookup_url: "https://ipapi.co/json/".to_string(),
            position_timeout_secs: 5,
            chain: DEFAULT_CHAIN.to_vec(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
    /// Per-request timeout; `None` waits as long as the server does.
    pub timeout_secs: Option<u64>,
}

impl HttpSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("shespeaks_news/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

/// Parse a YAML configuration document.
pub fn parse_config(yaml: &str) -> Result<SiteConfig, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Load the configuration at `path`, or the defaults when `path` is `None`.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<SiteConfig, Box<dyn Error>> {
    let Some(path) = path else {
        info!("No config file given; using built-in defaults");
        return Ok(SiteConfig::default());
    };
    let yaml = tokio::fs::read_to_string(path).await?;
    let config = parse_config(&yaml)?;
    info!(
        path,
        feeds = config.feeds.len(),
        grid_size = config.grid_size,
        carousel_size = config.carousel_size,
        "Loaded configuration"
    );
    Ok(config)
}
