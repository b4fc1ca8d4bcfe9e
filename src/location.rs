//! Best-effort visitor location.
//!
//! Resolution is an ordered chain of [`Strategy`] values. A single combinator
//! ([`LocationResolver::resolve`]) runs them in order and stops at the first
//! one that yields a [`LocationInfo`]:
//!
//! | Strategy | Source |
//! |----------|--------|
//! | [`Strategy::DeviceGeolocation`] | device position (bounded by a timeout), reverse-geocoded |
//! | [`Strategy::IpLookup`] | IP-geolocation service |
//! | [`Strategy::Timezone`] | static IANA timezone table |
//! | [`Strategy::Language`] | static language-tag table |
//!
//! When every strategy comes up empty the result is
//! [`LocationInfo::default`] ("United States"/"US"). Nothing is retried and
//! nothing here returns an error.

use crate::api::{HttpGet, get_json};
use crate::config::LocationSettings;
use crate::error::FetchError;
use crate::models::{Coordinates, LocationInfo};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// One step of the location fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    DeviceGeolocation,
    IpLookup,
    Timezone,
    Language,
}

/// The order strategies are tried in unless configured otherwise.
pub const DEFAULT_CHAIN: [Strategy; 4] = [
    Strategy::DeviceGeolocation,
    Strategy::IpLookup,
    Strategy::Timezone,
    Strategy::Language,
];

const TIMEZONE_COUNTRIES: [(&str, &str, &str); 15] = [
    ("Europe/London", "United Kingdom", "GB"),
    ("Europe/Berlin", "Germany", "DE"),
    ("Europe/Paris", "France", "FR"),
    ("Europe/Amsterdam", "Netherlands", "NL"),
    ("Europe/Stockholm", "Sweden", "SE"),
    ("Europe/Oslo", "Norway", "NO"),
    ("Europe/Copenhagen", "Denmark", "DK"),
    ("Europe/Helsinki", "Finland", "FI"),
    ("Europe/Dublin", "Ireland", "IE"),
    ("America/Toronto", "Canada", "CA"),
    ("America/Vancouver", "Canada", "CA"),
    ("Australia/Sydney", "Australia", "AU"),
    ("Australia/Melbourne", "Australia", "AU"),
    ("Pacific/Auckland", "New Zealand", "NZ"),
    ("Africa/Johannesburg", "South Africa", "ZA"),
];

/// Checked in order; the first prefix that matches whole subtags wins.
const LANGUAGE_COUNTRIES: [(&str, &str, &str); 12] = [
    ("en-gb", "United Kingdom", "GB"),
    ("en-ca", "Canada", "CA"),
    ("en-au", "Australia", "AU"),
    ("de", "Germany", "DE"),
    ("fr", "France", "FR"),
    ("nl", "Netherlands", "NL"),
    ("sv", "Sweden", "SE"),
    ("no", "Norway", "NO"),
    ("nb", "Norway", "NO"),
    ("nn", "Norway", "NO"),
    ("da", "Denmark", "DK"),
    ("fi", "Finland", "FI"),
];

/// Something that can report the device position.
pub trait PositionSource {
    /// Current coordinates, or `None` when unavailable or denied.
    async fn current_position(&self) -> Option<Coordinates>;
}

/// A position known up front, e.g. from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(pub Option<Coordinates>);

impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Option<Coordinates> {
        self.0
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReverseGeocodeResponse {
    country_name: Option<String>,
    country_code: Option<String>,
    city: Option<String>,
    locality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    country_name: Option<String>,
    country_code: Option<String>,
    city: Option<String>,
}

fn both(country: Option<String>, code: Option<String>) -> Option<LocationInfo> {
    match (country, code) {
        (Some(country), Some(code)) if !country.is_empty() && !code.is_empty() => {
            Some(LocationInfo::new(&country, &code))
        }
        _ => None,
    }
}

/// Look up a country by IANA timezone name.
pub fn from_timezone(timezone: &str) -> Option<LocationInfo> {
    TIMEZONE_COUNTRIES
        .iter()
        .find(|(tz, _, _)| *tz == timezone.trim())
        .map(|(_, country, code)| LocationInfo::new(country, code))
}

/// Look up a country by language tag.
///
/// Accepts BCP 47 tags (`en-GB`) as well as POSIX locales (`en_GB.UTF-8`).
pub fn from_language(tag: &str) -> Option<LocationInfo> {
    let tag = tag
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-")
        .to_lowercase();

    LANGUAGE_COUNTRIES
        .iter()
        .find(|(prefix, _, _)| {
            tag == *prefix
                || tag
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('-'))
        })
        .map(|(_, country, code)| LocationInfo::new(country, code))
}

/// The timezone to feed the chain: `explicit` (a flag or `TZ`) when set,
/// otherwise the zone the operating system reports.
///
/// A POSIX-style leading `:` (`TZ=:Europe/London`) is dropped.
pub fn runtime_timezone(explicit: Option<&str>) -> Option<String> {
    pick_timezone(explicit, || match iana_time_zone::get_timezone() {
        Ok(zone) => Some(zone),
        Err(e) => {
            debug!(error = %e, "System timezone unavailable");
            None
        }
    })
}

fn pick_timezone(explicit: Option<&str>, system: impl FnOnce() -> Option<String>) -> Option<String> {
    explicit
        .map(|tz| tz.trim().trim_start_matches(':').trim())
        .filter(|tz| !tz.is_empty())
        .map(str::to_string)
        .or_else(system)
}

/// Runs the location fallback chain.
#[derive(Debug)]
pub struct LocationResolver<'a, H, P> {
    http: &'a H,
    position: &'a P,
    settings: &'a LocationSettings,
    timezone: Option<String>,
    language: Option<String>,
}

impl<'a, H, P> LocationResolver<'a, H, P>
where
    H: HttpGet,
    P: PositionSource,
{
    pub fn new(http: &'a H, position: &'a P, settings: &'a LocationSettings) -> Self {
        Self {
            http,
            position,
            settings,
            timezone: None,
            language: None,
        }
    }

    /// Timezone reported by the runtime, e.g. `Europe/London`.
    pub fn with_timezone(mut self, timezone: Option<String>) -> Self {
        self.timezone = timezone;
        self
    }

    /// Language tag reported by the runtime, e.g. `en_GB.UTF-8`.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Resolve the location. Never fails.
    #[instrument(level = "info", skip(self))]
    pub async fn resolve(&self) -> LocationInfo {
        for strategy in &self.settings.chain {
            if let Some(location) = self.attempt(*strategy).await {
                info!(?strategy, country = %location.country, "Resolved location");
                return location;
            }
            debug!(?strategy, "Location strategy yielded nothing");
        }
        let fallback = LocationInfo::default();
        info!(country = %fallback.country, "Every location strategy failed; using default");
        fallback
    }

    /// Run a single strategy.
    pub async fn attempt(&self, strategy: Strategy) -> Option<LocationInfo> {
        match strategy {
            Strategy::DeviceGeolocation => self.device_geolocation().await,
            Strategy::IpLookup => self.ip_lookup().await,
            Strategy::Timezone => self.timezone.as_deref().and_then(from_timezone),
            Strategy::Language => self.language.as_deref().and_then(from_language),
        }
    }

    async fn device_geolocation(&self) -> Option<LocationInfo> {
        let timeout = self.settings.position_timeout();
        let coords = match tokio::time::timeout(timeout, self.position.current_position()).await {
            Ok(Some(coords)) => coords,
            Ok(None) => {
                debug!("Device position unavailable");
                return None;
            }
            Err(_) => {
                warn!(?timeout, "Timed out waiting for device position");
                return None;
            }
        };

        match self.reverse_geocode(coords).await {
            Ok(location) => location,
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                None
            }
        }
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Option<LocationInfo>, FetchError> {
        let url = Url::parse_with_params(
            &self.settings.reverse_geocode_url,
            &[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("localityLanguage", "en".to_string()),
            ],
        )
        .map_err(|e| FetchError::Request(e.to_string()))?;

        let data: ReverseGeocodeResponse = get_json(self.http, url.as_str()).await?;
        let city = data.city.filter(|c| !c.is_empty()).or(data.locality);
        Ok(both(data.country_name, data.country_code).map(|l| l.with_city(city)))
    }

    async fn ip_lookup(&self) -> Option<LocationInfo> {
        match get_json::<_, IpLookupResponse>(self.http, &self.settings.ip_lookup_url).await {
            Ok(data) => both(data.country_name, data.country_code).map(|l| l.with_city(data.city)),
            Err(e) => {
                warn!(error = %e, "IP geolocation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubHttp;
    use std::time::Duration;

    struct SlowPosition;

    impl PositionSource for SlowPosition {
        async fn current_position(&self) -> Option<Coordinates> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Some(Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            })
        }
    }

    fn london() -> FixedPosition {
        FixedPosition(Some(Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        }))
    }

    fn toronto() -> LocationInfo {
        LocationInfo::new("Canada", "CA").with_city(Some("Toronto".to_string()))
    }

    const REVERSE_GB: &str = r#"{"countryName": "United Kingdom", "countryCode": "GB", "city": "London"}"#;
    const IP_CA: &str = r#"{"country_name": "Canada", "country_code": "CA", "city": "Toronto"}"#;

    #[test]
    fn test_from_timezone() {
        assert_eq!(from_timezone("Europe/Berlin"), Some(LocationInfo::new("Germany", "DE")));
        assert_eq!(from_timezone("America/Vancouver"), Some(LocationInfo::new("Canada", "CA")));
        assert_eq!(from_timezone("Asia/Tokyo"), None);
    }

    #[test]
    fn test_from_language() {
        assert_eq!(from_language("en-GB"), Some(LocationInfo::new("United Kingdom", "GB")));
        assert_eq!(from_language("en_AU.UTF-8"), Some(LocationInfo::new("Australia", "AU")));
        assert_eq!(from_language("de_DE.UTF-8"), Some(LocationInfo::new("Germany", "DE")));
        assert_eq!(from_language("nb-NO"), Some(LocationInfo::new("Norway", "NO")));
        assert_eq!(from_language("fi"), Some(LocationInfo::new("Finland", "FI")));
        assert_eq!(from_language("fil-PH"), None);
        assert_eq!(from_language("en-US"), None);
        assert_eq!(from_language("C"), None);
    }

    #[tokio::test]
    async fn test_device_geolocation_reverse_geocodes() {
        let http = StubHttp::new().with("reverse-geocode", REVERSE_GB).with("ipapi", IP_CA);
        let settings = LocationSettings::default();
        let position = london();
        let location = LocationResolver::new(&http, &position, &settings).resolve().await;
        assert_eq!(
            location,
            LocationInfo::new("United Kingdom", "GB").with_city(Some("London".to_string()))
        );
        let requested = http.requests();
        assert_eq!(requested.len(), 1);
        assert!(requested[0].contains("latitude=51.5"));
        assert!(requested[0].contains("localityLanguage=en"));
    }

    #[tokio::test]
    async fn test_denied_position_falls_back_to_ip() {
        let http = StubHttp::new().with("reverse-geocode", REVERSE_GB).with("ipapi", IP_CA);
        let settings = LocationSettings::default();
        let position = FixedPosition(None);
        let location = LocationResolver::new(&http, &position, &settings).resolve().await;
        assert_eq!(location, toronto());
    }

    #[tokio::test]
    async fn test_reverse_geocode_failure_falls_back_to_ip() {
        let http = StubHttp::new().failing("reverse-geocode", 503).with("ipapi", IP_CA);
        let settings = LocationSettings::default();
        let position = london();
        let location = LocationResolver::new(&http, &position, &settings).resolve().await;
        assert_eq!(location, toronto());
    }

    #[tokio::test]
    async fn test_incomplete_payload_falls_through() {
        let http = StubHttp::new()
            .with("reverse-geocode", r#"{"city": "Nowhere"}"#)
            .with("ipapi", r#"{"error": true, "reason": "RateLimited"}"#);
        let settings = LocationSettings::default();
        let position = london();
        let location = LocationResolver::new(&http, &position, &settings)
            .with_timezone(Some("Europe/Paris".to_string()))
            .resolve()
            .await;
        assert_eq!(location, LocationInfo::new("France", "FR"));
    }

    #[tokio::test]
    async fn test_position_timeout_falls_through() {
        let http = StubHttp::new().with("ipapi", IP_CA);
        let settings = LocationSettings {
            position_timeout_secs: 0,
            ..LocationSettings::default()
        };
        let location = LocationResolver::new(&http, &SlowPosition, &settings).resolve().await;
        assert_eq!(location, toronto());
    }

    #[tokio::test]
    async fn test_language_used_after_timezone() {
        let http = StubHttp::new();
        let settings = LocationSettings::default();
        let position = FixedPosition(None);
        let location = LocationResolver::new(&http, &position, &settings)
            .with_timezone(Some("Asia/Tokyo".to_string()))
            .with_language(Some("sv_SE.UTF-8".to_string()))
            .resolve()
            .await;
        assert_eq!(location, LocationInfo::new("Sweden", "SE"));
    }

    #[tokio::test]
    async fn test_total_failure_returns_default() {
        let http = StubHttp::new()
            .failing("reverse-geocode", 500)
            .failing("ipapi", 500);
        let settings = LocationSettings::default();
        let position = london();
        let location = LocationResolver::new(&http, &position, &settings)
            .with_timezone(Some("Mars/Olympus_Mons".to_string()))
            .with_language(Some("xx-YY".to_string()))
            .resolve()
            .await;
        assert_eq!(location, LocationInfo::new("United States", "US"));
    }

    #[tokio::test]
    async fn test_chain_order_is_configurable() {
        let http = StubHttp::new().with("ipapi", IP_CA);
        let settings = LocationSettings {
            chain: vec![Strategy::Timezone, Strategy::IpLookup],
            ..LocationSettings::default()
        };
        let position = FixedPosition(None);
        let location = LocationResolver::new(&http, &position, &settings)
            .with_timezone(Some("Europe/Dublin".to_string()))
            .resolve()
            .await;
        assert_eq!(location, LocationInfo::new("Ireland", "IE"));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_reverse_geocode_uses_locality_without_city() {
        let http = StubHttp::new().with(
            "reverse-geocode",
            r#"{"countryName": "Germany", "countryCode": "DE", "city": "", "locality": "Mitte"}"#,
        );
        let settings = LocationSettings::default();
        let position = london();
        let location = LocationResolver::new(&http, &position, &settings).resolve().await;
        assert_eq!(location.city.as_deref(), Some("Mitte"));
    }

    #[test]
    fn test_runtime_timezone_prefers_explicit_value() {
        let system = || Some("Asia/Tokyo".to_string());
        assert_eq!(
            pick_timezone(Some("Europe/London"), system).as_deref(),
            Some("Europe/London")
        );
        assert_eq!(
            pick_timezone(Some(":Europe/London"), system).as_deref(),
            Some("Europe/London")
        );
    }

    #[test]
    fn test_runtime_timezone_falls_back_to_system_zone() {
        let system = || Some("Europe/Oslo".to_string());
        assert_eq!(pick_timezone(None, system).as_deref(), Some("Europe/Oslo"));
        assert_eq!(pick_timezone(Some("  "), system).as_deref(), Some("Europe/Oslo"));
        assert_eq!(pick_timezone(Some(":"), system).as_deref(), Some("Europe/Oslo"));
        assert_eq!(pick_timezone(None, || None), None);

        let location = pick_timezone(None, system).as_deref().and_then(from_timezone);
        assert_eq!(location, Some(LocationInfo::new("Norway", "NO")));
    }
}
