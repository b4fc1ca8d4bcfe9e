//! Markdown rendering of the full page.
//!
//! Sections, top to bottom: hero banner, news (carousel then grid),
//! resources directory, events links, footer.

use crate::directory::RESOURCE_TOPICS;
use crate::models::{Article, SitePage};
use crate::utils::{relative_date, truncate_text, upcase};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const GRID_TITLE_LIMIT: usize = 85;
const GRID_DESCRIPTION_LIMIT: usize = 100;
const ALL_NEWS_URL: &str = "https://www.thepinknews.com/";

const FOOTER_LINKS: [(&str, [&str; 3]); 3] = [
    ("Resources", ["Healthcare Guide", "Educational Materials", "Community Resources"]),
    ("Community", ["Support Groups", "Volunteer", "Events"]),
    ("About", ["Our Mission", "Privacy Policy", "Contact Us"]),
];

/// Escape characters that would break a Markdown link label.
fn label(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn published_label(article: &Article, now: DateTime<Utc>) -> String {
    match article.published_time() {
        Some(published) => relative_date(published, now),
        None => article.published_at.clone(),
    }
}

fn hero(md: &mut String, page: &SitePage) -> std::fmt::Result {
    writeln!(md, "# SheSpeaks\n")?;
    writeln!(md, "> 🏳️‍🌈 Celebrating Every Identity\n")?;
    writeln!(md, "## Your Voice. Your Story. Your Power.\n")?;
    writeln!(
        md,
        "Join thousands of LGBTQ+ and transgender individuals in a safe space where \
         authenticity is celebrated, stories are shared, and every voice creates change.\n"
    )?;
    writeln!(md, "[Join Our Community](#resources) · [Explore Stories](#news)\n")?;
    writeln!(
        md,
        "_{} edition · {} {}_\n",
        upcase(&page.time_of_day),
        page.local_date,
        page.local_time
    )
}

fn news(md: &mut String, page: &SitePage, now: DateTime<Utc>) -> std::fmt::Result {
    writeln!(md, "## LGBTQ+ News for {}\n", page.location.country)?;

    if let Some(error) = &page.news_error {
        writeln!(md, "{}\n", error)?;
        return writeln!(md, "_Run the generator again to try again._\n");
    }

    if !page.carousel.is_empty() {
        writeln!(md, "### Featured\n")?;
        for article in &page.carousel {
            writeln!(
                md,
                "- **{}** · [{}]({})  \n  {}",
                article.source_name,
                label(&article.title),
                article.url,
                article.description
            )?;
        }
        writeln!(md)?;
    }

    writeln!(md, "### Latest\n")?;
    for article in &page.grid {
        writeln!(
            md,
            "#### [{}]({})\n",
            label(&truncate_text(&article.title, GRID_TITLE_LIMIT)),
            article.url
        )?;
        writeln!(md, "![{}]({})\n", label(&article.title), article.image_url)?;
        writeln!(
            md,
            "*{}* · {} · {}\n",
            article.category_or_default(),
            article.source_name,
            published_label(article, now)
        )?;
        writeln!(
            md,
            "{}\n",
            truncate_text(&article.description, GRID_DESCRIPTION_LIMIT)
        )?;
    }
    writeln!(md, "[View All News]({})\n", ALL_NEWS_URL)
}

fn resources(md: &mut String, page: &SitePage) -> std::fmt::Result {
    writeln!(md, "## Find Resources & Community\n")?;
    writeln!(
        md,
        "Access comprehensive resources and connect with supportive communities tailored for your journey.\n"
    )?;
    writeln!(md, "### Local resources: {}\n", page.resources_country)?;
    for resource in &page.resources {
        match &resource.website {
            Some(website) => write!(md, "- **[{}]({})**", label(&resource.name), website)?,
            None => write!(md, "- **{}**", resource.name)?,
        }
        writeln!(
            md,
            " ({}, {}): {}",
            resource.kind, resource.location, resource.description
        )?;
    }
    writeln!(md)?;
    for (title, description) in RESOURCE_TOPICS {
        writeln!(md, "- **{}**: {}", title, description)?;
    }
    writeln!(md)
}

fn events(md: &mut String, page: &SitePage) -> std::fmt::Result {
    writeln!(md, "## Pride Events & Community\n")?;
    writeln!(md, "Celebrate, connect, and create change together.\n")?;
    writeln!(
        md,
        "Find LGBTQ+ events and meetups in {}:\n",
        page.location.country
    )?;
    for link in &page.events {
        writeln!(md, "- [{}]({}): {}", link.platform, link.url, link.description)?;
    }
    writeln!(md)
}

fn footer(md: &mut String) -> std::fmt::Result {
    writeln!(md, "---\n")?;
    writeln!(
        md,
        "**SheSpeaks**: a vibrant community platform where transgender and LGBTQ+ individuals \
         can stay informed, share experiences, and celebrate their authentic selves.\n"
    )?;
    for (group, links) in FOOTER_LINKS {
        writeln!(md, "**{}**: {}  ", group, links.join(" · "))?;
    }
    writeln!(md)?;
    writeln!(
        md,
        "© SheSpeaks. All rights reserved. Built with love and respect for our community."
    )
}

/// Render the whole page as Markdown. `now` anchors relative dates.
pub fn page_to_markdown(page: &SitePage, now: DateTime<Utc>) -> String {
    let mut md = String::new();
    let rendered = hero(&mut md, page)
        .and_then(|_| news(&mut md, page, now))
        .and_then(|_| resources(&mut md, page))
        .and_then(|_| events(&mut md, page))
        .and_then(|_| footer(&mut md));
    // Writing into a String only fails if a Display impl does.
    debug_assert!(rendered.is_ok());
    md
}
