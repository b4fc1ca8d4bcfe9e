//! Direct RSS 2.0 parsing for feeds that are fetched without rss2json.

use super::RawItem;
use crate::error::FetchError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<XmlItem>,
}

#[derive(Debug, Deserialize)]
struct XmlItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "encoded")]
    content_encoded: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    author: Option<String>,
    #[serde(rename = "creator")]
    creator: Option<String>,
    #[serde(rename = "enclosure", default)]
    enclosures: Vec<XmlMedia>,
    #[serde(rename = "content", default)]
    media_content: Vec<XmlMedia>,
    #[serde(rename = "thumbnail", default)]
    media_thumbnails: Vec<XmlMedia>,
}

/// `<enclosure>`, `<media:content>` and `<media:thumbnail>` share these attributes.
#[derive(Debug, Deserialize)]
struct XmlMedia {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    mime: Option<String>,
    #[serde(rename = "@medium")]
    medium: Option<String>,
}

impl XmlMedia {
    /// Untyped media is assumed to be an image.
    fn is_image(&self) -> bool {
        self.medium.as_deref().is_none_or(|m| m == "image")
            && self.mime.as_deref().is_none_or(|t| t.starts_with("image/"))
    }
}

fn first_url<'a>(media: impl IntoIterator<Item = &'a XmlMedia>) -> Option<String> {
    media
        .into_iter()
        .filter_map(|m| m.url.as_deref())
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

impl From<XmlItem> for RawItem {
    fn from(item: XmlItem) -> Self {
        let thumbnail = first_url(item.media_content.iter().filter(|m| m.is_image()))
            .or_else(|| first_url(&item.media_thumbnails));
        RawItem {
            title: item.title,
            description: item.description,
            content: item.content_encoded,
            link: item.link,
            pub_date: item.pub_date,
            author: item.author.or(item.creator),
            enclosure_link: first_url(&item.enclosures),
            thumbnail,
        }
        .normalized()
    }
}

/// Parse an RSS 2.0 document into raw items.
///
/// Images come from `<enclosure>`, then `<media:content>`, then
/// `<media:thumbnail>`; the body from `<content:encoded>`.
pub fn parse_channel(xml: &str) -> Result<Vec<RawItem>, FetchError> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    Ok(rss.channel.items.into_iter().map(RawItem::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example</title>
    <link>https://example.com</link>
    <item>
      <title>Pride month kicks off</title>
      <link>https://example.com/pride</link>
      <description><![CDATA[<p>Events across the city</p>]]></description>
      <pubDate>Sun, 01 Jun 2025 10:00:00 +0000</pubDate>
      <enclosure url="https://cdn.example.com/pride.jpg" type="image/jpeg" length="1"/>
    </item>
    <item>
      <title>No image here</title>
      <link>https://example.com/plain</link>
      <description>Plain text</description>
    </item>
  </channel>
</rss>"#;
        let items = parse_channel(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_deref(), Some("Pride month kicks off"));
        assert_eq!(
            items[0].description.as_deref(),
            Some("<p>Events across the city</p>")
        );
        assert_eq!(
            items[0].enclosure_link.as_deref(),
            Some("https://cdn.example.com/pride.jpg")
        );
        assert_eq!(items[1].enclosure_link, None);
        assert_eq!(items[1].pub_date, None);
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(parse_channel("this is not xml").is_err());
    }

    #[test]
    fn test_items_split_by_other_channel_elements() {
        let xml = r#"<rss version="2.0"><channel>
    <title>Example</title>
    <item><title>First</title><description>One</description></item>
    <image><url>https://example.com/logo.png</url><title>Example</title></image>
    <item><title>Second</title><description>Two</description></item>
    <lastBuildDate>Sun, 01 Jun 2025 10:00:00 +0000</lastBuildDate>
    <item><title>Third</title><description>Three</description></item>
</channel></rss>"#;
        let titles: Vec<Option<String>> = parse_channel(xml)
            .unwrap()
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                Some("First".to_string()),
                Some("Second".to_string()),
                Some("Third".to_string())
            ]
        );
    }

    #[test]
    fn test_media_namespace_images_and_encoded_content() {
        let xml = r#"<rss version="2.0"
    xmlns:media="http://search.yahoo.com/mrss/"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <item>
      <title>Trans athletes speak out</title>
      <description>Short summary</description>
      <content:encoded><![CDATA[<p>The full story</p>]]></content:encoded>
      <dc:creator>Jo Writer</dc:creator>
      <category>Sport</category>
      <category>Trans</category>
      <media:content url="https://cdn.example.com/clip.mp4" medium="video"/>
      <media:content url="https://cdn.example.com/hero.jpg" medium="image"/>
      <media:thumbnail url="https://cdn.example.com/thumb.jpg"/>
    </item>
    <item>
      <title>Thumbnail only</title>
      <description>Summary</description>
      <media:thumbnail url="https://cdn.example.com/only-thumb.jpg"/>
    </item>
  </channel>
</rss>"#;
        let items = parse_channel(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].enclosure_link, None);
        assert_eq!(
            items[0].thumbnail.as_deref(),
            Some("https://cdn.example.com/hero.jpg")
        );
        assert_eq!(items[0].content.as_deref(), Some("<p>The full story</p>"));
        assert_eq!(items[0].author.as_deref(), Some("Jo Writer"));
        assert_eq!(
            items[1].thumbnail.as_deref(),
            Some("https://cdn.example.com/only-thumb.jpg")
        );
    }

    #[test]
    fn test_media_image_survives_mapping() {
        let xml = r#"<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"><channel>
    <item>
      <title>Pride parade draws record crowds</title>
      <description>Thousands marched</description>
      <pubDate>Sun, 01 Jun 2025 10:00:00 +0000</pubDate>
      <media:content url="https://cdn.example.com/parade.jpg"/>
    </item>
</channel></rss>"#;
        let articles: Vec<_> = parse_channel(xml)
            .unwrap()
            .into_iter()
            .map(super::super::to_article)
            .collect();
        assert_eq!(articles[0].image_url, "https://cdn.example.com/parade.jpg");
        assert!(articles[0].has_real_image());
    }
}
