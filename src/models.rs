//! Data models for articles, locations and the rendered page.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: a normalized feed item, optionally categorized
//! - [`Category`]: the nine fixed news categories
//! - [`LocationInfo`]: best-effort visitor location, never absent
//! - [`SitePage`]: everything one run renders, serialized to JSON and Markdown
//!
//! Field names are serialized in camelCase to match the JSON consumed by the
//! site's front end.

use crate::utils::parse_published;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder image used when a feed item carries no image at all.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=400&query=LGBTQ+ news";

/// One of the nine fixed categories a news article can be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Rights & Politics")]
    RightsPolitics,
    #[serde(rename = "Health")]
    Health,
    #[serde(rename = "Sports")]
    Sports,
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Technology")]
    Technology,
    #[serde(rename = "Community")]
    Community,
    #[serde(rename = "LGBTQ+ News")]
    LgbtqNews,
}

impl Category {
    /// Every category, in classification rule order.
    #[cfg(test)]
    pub const ALL: [Category; 9] = [
        Category::Entertainment,
        Category::RightsPolitics,
        Category::Health,
        Category::Sports,
        Category::Business,
        Category::Education,
        Category::Technology,
        Category::Community,
        Category::LgbtqNews,
    ];

    /// The human-readable label shown on the page.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Entertainment => "Entertainment",
            Category::RightsPolitics => "Rights & Politics",
            Category::Health => "Health",
            Category::Sports => "Sports",
            Category::Business => "Business",
            Category::Education => "Education",
            Category::Technology => "Technology",
            Category::Community => "Community",
            Category::LgbtqNews => "LGBTQ+ News",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized news article built from one feed item.
///
/// Articles are built fresh on every run and never mutated after the
/// classifier has assigned a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    /// HTML-stripped and truncated summary.
    pub description: String,
    pub url: String,
    /// Image URL, or [`PLACEHOLDER_IMAGE`].
    pub image_url: String,
    /// Timestamp exactly as supplied by the source.
    pub published_at: String,
    pub source_name: String,
    /// Raw body, or the description when the source sent no body.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Article {
    /// The assigned category, defaulting to [`Category::LgbtqNews`].
    pub fn category_or_default(&self) -> Category {
        self.category.unwrap_or(Category::LgbtqNews)
    }

    /// Parsed publication time, if the source timestamp is understood.
    pub fn published_time(&self) -> Option<DateTime<Utc>> {
        parse_published(&self.published_at)
    }

    /// Whether the article carries an image other than the placeholder.
    pub fn has_real_image(&self) -> bool {
        !self.image_url.trim().is_empty() && !self.image_url.starts_with("/placeholder.svg")
    }
}

/// Best-effort visitor location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    pub country: String,
    pub country_code: String,
    /// Only the network strategies report a city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl LocationInfo {
    pub fn new(country: &str, country_code: &str) -> Self {
        Self {
            country: country.to_string(),
            country_code: country_code.to_string(),
            city: None,
        }
    }

    /// Attach a city, ignoring blank names.
    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.city = city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }
}

impl Default for LocationInfo {
    fn default() -> Self {
        Self::new("United States", "US")
    }
}

/// Device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A support organization listed in the resources directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalResource {
    pub name: String,
    /// Kind of service, e.g. "Crisis Support".
    pub kind: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub location: String,
}

/// An outbound link to an event-discovery service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLink {
    pub platform: String,
    pub description: String,
    pub url: String,
}

/// Everything rendered by one run.
///
/// # Edition Naming
///
/// The `time_of_day` field categorizes editions as:
/// - `"morning"`: 00:00 - 08:00
/// - `"afternoon"`: 08:00 - 16:00
/// - `"evening"`: 16:00 - 24:00
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitePage {
    /// The date of generation in `YYYY-MM-DD` format.
    pub local_date: String,
    pub time_of_day: String,
    pub local_time: String,
    pub location: LocationInfo,
    /// Country-specific keywords for the resolved location.
    pub location_keywords: Vec<String>,
    /// Rotating banner articles, disjoint from `grid`.
    pub carousel: Vec<Article>,
    pub grid: Vec<Article>,
    /// Set when no article could be loaded at all.
    pub news_error: Option<String>,
    /// Directory key the resources were found under ("Global" on fallback).
    pub resources_country: String,
    pub resources: Vec<LocalResource>,
    pub events: Vec<EventLink>,
}
