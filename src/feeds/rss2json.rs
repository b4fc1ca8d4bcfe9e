//! rss2json payloads.
//!
//! The conversion service answers `{status, items: [...]}` where each item
//! mirrors the RSS `<item>` with a few extras (`thumbnail`, an `enclosure`
//! object that is sometimes empty or an array).

use super::RawItem;
use crate::error::FetchError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct Rss2JsonResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub items: Option<Vec<Rss2JsonItem>>,
    /// Error text the service sends alongside a non-"ok" status.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Rss2JsonItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub link: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub enclosure: Value,
    pub thumbnail: Option<String>,
}

impl Rss2JsonResponse {
    /// Raw items of a successful response.
    ///
    /// # Errors
    ///
    /// [`FetchError::Payload`] when the status is not `"ok"` or `items` is absent.
    pub fn into_items(self) -> Result<Vec<RawItem>, FetchError> {
        if self.status != "ok" {
            return Err(FetchError::Payload(format!(
                "rss2json status {:?}: {}",
                self.status,
                self.message.unwrap_or_default()
            )));
        }
        let items = self
            .items
            .ok_or_else(|| FetchError::Payload("rss2json response has no items".to_string()))?;
        Ok(items.into_iter().map(RawItem::from).collect())
    }
}

impl From<Rss2JsonItem> for RawItem {
    fn from(item: Rss2JsonItem) -> Self {
        let enclosure_link = item
            .enclosure
            .get("link")
            .and_then(Value::as_str)
            .map(str::to_string);
        RawItem {
            title: item.title,
            description: item.description,
            content: item.content,
            link: item.link.or(item.url),
            pub_date: item.pub_date,
            author: item.author,
            enclosure_link,
            thumbnail: item.thumbnail,
        }
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok_response() {
        let json = r#"{
            "status": "ok",
            "feed": {"title": "Example"},
            "items": [
                {
                    "title": "Pride parade returns",
                    "description": "<p>Crowds gather</p>",
                    "content": "<p>Full</p>",
                    "link": "https://example.com/pride",
                    "pubDate": "2025-06-01 10:00:00",
                    "author": "Jo",
                    "enclosure": {"link": "https://cdn.example.com/p.jpg", "type": "image/jpeg"},
                    "thumbnail": ""
                },
                {
                    "title": "Second",
                    "description": "d",
                    "link": "https://example.com/2",
                    "pubDate": "2025-06-01 09:00:00",
                    "enclosure": [],
                    "thumbnail": "https://cdn.example.com/t.jpg"
                }
            ]
        }"#;
        let response: Rss2JsonResponse = serde_json::from_str(json).unwrap();
        let items = response.into_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].enclosure_link.as_deref(),
            Some("https://cdn.example.com/p.jpg")
        );
        assert_eq!(items[0].thumbnail, None);
        assert_eq!(items[1].enclosure_link, None);
        assert_eq!(items[1].thumbnail.as_deref(), Some("https://cdn.example.com/t.jpg"));
        assert_eq!(items[1].author, None);
    }

    #[test]
    fn test_error_status_is_payload_error() {
        let json = r#"{"status": "error", "message": "rss_url is invalid"}"#;
        let response: Rss2JsonResponse = serde_json::from_str(json).unwrap();
        let err = response.into_items().unwrap_err();
        assert!(err.to_string().contains("rss_url is invalid"));
    }

    #[test]
    fn test_missing_items_is_payload_error() {
        let response: Rss2JsonResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(response.into_items().is_err());
    }

    #[test]
    fn test_url_used_when_link_missing() {
        let item: Rss2JsonItem = serde_json::from_str(
            r#"{"title": "t", "description": "d", "url": "https://example.com/u"}"#,
        )
        .unwrap();
        let raw = RawItem::from(item);
        assert_eq!(raw.link.as_deref(), Some("https://example.com/u"));
    }
}
