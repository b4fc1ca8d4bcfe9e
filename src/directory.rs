//! Location-keyed community directory: resources, keywords and event links.

use crate::models::{EventLink, LocalResource, LocationInfo};
use tracing::debug;

/// Directory key used when the visitor's country has no entry.
pub const GLOBAL: &str = "Global";

/// Terms that identify news local to a country.
pub fn location_keywords(country: &str, country_code: &str) -> Vec<String> {
    let keywords: &[&str] = match country_code {
        "US" => &["United States", "America", "American", "US", "USA", "federal", "congress", "senate"],
        "GB" => &["UK", "United Kingdom", "Britain", "British", "England", "Scotland", "Wales", "parliament"],
        "CA" => &["Canada", "Canadian", "Ottawa", "provincial", "federal"],
        "AU" => &["Australia", "Australian", "Canberra", "NSW", "Victoria"],
        "DE" => &["Germany", "German", "Berlin", "Bundestag"],
        "FR" => &["France", "French", "Paris", "République"],
        "NL" => &["Netherlands", "Dutch", "Amsterdam", "Holland"],
        "SE" => &["Sweden", "Swedish", "Stockholm"],
        "NO" => &["Norway", "Norwegian", "Oslo"],
        "DK" => &["Denmark", "Danish", "Copenhagen"],
        "FI" => &["Finland", "Finnish", "Helsinki"],
        "IE" => &["Ireland", "Irish", "Dublin"],
        "NZ" => &["New Zealand", "Kiwi", "Wellington"],
        "ZA" => &["South Africa", "South African", "Cape Town", "Johannesburg"],
        _ => return vec![country.to_string()],
    };
    keywords.iter().map(|k| k.to_string()).collect()
}

fn resource(name: &str, kind: &str, description: &str, website: &str, location: &str) -> LocalResource {
    LocalResource {
        name: name.to_string(),
        kind: kind.to_string(),
        description: description.to_string(),
        website: Some(website.to_string()),
        location: location.to_string(),
    }
}

fn resources_for(key: &str) -> Option<Vec<LocalResource>> {
    let list = match key {
        "United Kingdom" => vec![
            resource(
                "Stonewall UK",
                "Support Organization",
                "Leading LGBTQ+ charity providing support, information and advocacy services.",
                "https://www.stonewall.org.uk",
                "London, UK",
            ),
            resource(
                "LGBT Foundation",
                "Community Center",
                "National charity delivering advice, support and information services to LGBT communities.",
                "https://lgbt.foundation",
                "Manchester, UK",
            ),
            resource(
                "Mermaids",
                "Trans Support",
                "Supporting transgender, nonbinary and gender-diverse children and young people.",
                "https://mermaidsuk.org.uk",
                "UK Wide",
            ),
        ],
        "United States" => vec![
            resource(
                "The Trevor Project",
                "Crisis Support",
                "24/7 crisis support services for LGBTQ+ young people.",
                "https://www.thetrevorproject.org",
                "National",
            ),
            resource(
                "GLAAD",
                "Advocacy",
                "Working to accelerate acceptance for the LGBTQ+ community.",
                "https://www.glaad.org",
                "National",
            ),
            resource(
                "PFLAG",
                "Family Support",
                "Support, education and advocacy for LGBTQ+ people and their families.",
                "https://pflag.org",
                "National",
            ),
        ],
        "Canada" => vec![
            resource(
                "Egale Canada",
                "Human Rights",
                "Advancing equality for LGBTQI2S people and their families across Canada.",
                "https://egale.ca",
                "National",
            ),
            resource(
                "The 519",
                "Community Center",
                "Community center offering programs and services for LGBTQ2S communities.",
                "https://www.the519.org",
                "Toronto, ON",
            ),
        ],
        "Australia" => vec![
            resource(
                "ACON",
                "Health & Support",
                "Health promotion organization for LGBTQ+ communities.",
                "https://www.acon.org.au",
                "NSW, Australia",
            ),
            resource(
                "Minus18",
                "Youth Support",
                "Supporting LGBTQ+ young people across Australia.",
                "https://www.minus18.org.au",
                "National",
            ),
        ],
        GLOBAL => vec![
            resource(
                "ILGA World",
                "International Advocacy",
                "Worldwide federation of LGBTI organizations from over 150 countries.",
                "https://ilga.org",
                "International",
            ),
            resource(
                "OutRight Action International",
                "Human Rights",
                "Fighting for LGBTIQ human rights worldwide.",
                "https://outrightinternational.org",
                "International",
            ),
            resource(
                "IGLYO",
                "Youth Network",
                "International network of LGBTQI youth and student organizations.",
                "https://www.iglyo.com",
                "International",
            ),
        ],
        _ => return None,
    };
    Some(list)
}

/// Local support organizations for `country`.
///
/// Tries the exact name, then common spellings (`UK`, `Britain`, `USA`), then
/// the global list. Returns the directory key used alongside the resources.
pub fn local_resources(country: &str) -> (String, Vec<LocalResource>) {
    let variations = [
        country.to_string(),
        country.replace("Britain", "United Kingdom"),
        country.replace("USA", "United States"),
        country.replace("UK", "United Kingdom"),
    ];
    for key in &variations {
        if let Some(list) = resources_for(key) {
            debug!(%country, key = %key, count = list.len(), "Found local resources");
            return (key.clone(), list);
        }
    }
    debug!(%country, "No local resources; using global list");
    (GLOBAL.to_string(), resources_for(GLOBAL).unwrap_or_default())
}

/// Static resource categories shown below the local directory.
pub const RESOURCE_TOPICS: [(&str, &str); 4] = [
    (
        "Educational Resources",
        "Helpful, affirming resources about LGBTQ+ identities, transgender journeys, accessing healthcare, and finding community support along the way.",
    ),
    (
        "Community Groups",
        "Local and online support groups, meetups, and safe spaces to connect with others.",
    ),
    (
        "Local Services",
        "Find LGBTQ+-friendly healthcare providers, therapists, and services in your area.",
    ),
    (
        "Wellness Resources",
        "Mental health support, self-care tips, and inclusive wellness practices.",
    ),
];

/// Links to event-discovery services, searched around `location`.
///
/// Eventbrite searches "{city} {country}" and Meetup the bare city when the
/// location carries one; both use the country otherwise.
pub fn event_links(location: &LocationInfo) -> Vec<EventLink> {
    let (eventbrite_place, meetup_place) = match &location.city {
        Some(city) => (format!("{} {}", city, location.country), city.clone()),
        None => (location.country.clone(), location.country.clone()),
    };
    vec![
        EventLink {
            platform: "Eventbrite".to_string(),
            description: "Pride events, workshops and community gatherings".to_string(),
            url: format!(
                "https://www.eventbrite.com/d/{}/lgbtq/",
                urlencoding::encode(&eventbrite_place)
            ),
        },
        EventLink {
            platform: "Meetup".to_string(),
            description: "Recurring LGBTQ+ groups and social meetups".to_string(),
            url: format!(
                "https://www.meetup.com/find/?keywords=lgbtq&location={}",
                urlencoding::encode(&meetup_place)
            ),
        },
        EventLink {
            platform: "Facebook Events".to_string(),
            description: "Community-organized LGBTQ+ events".to_string(),
            url: "https://www.facebook.com/events/search/?q=lgbtq".to_string(),
        },
        EventLink {
            platform: "Google".to_string(),
            description: "Search for LGBTQ+ events near you".to_string(),
            url: format!(
                "https://www.google.com/search?q=lgbtq+events+near+me+{}",
                urlencoding::encode(&location.country_code)
            ),
        },
    ]
}
