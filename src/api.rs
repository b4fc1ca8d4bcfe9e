//! Outbound HTTP access.
//!
//! All remote calls in the application (reverse geocoding, IP lookup, feed
//! endpoints) go through the [`HttpGet`] trait so that the pipelines can be
//! exercised against in-memory responses.
//!
//! # Architecture
//!
//! - [`HttpGet`]: core trait defining an async GET returning the body text
//! - [`HttpClient`]: `reqwest`-backed implementation used by the binary
//! - [`get_json`]: helper that fetches and deserializes a JSON payload
//!
//! There is no retry layer: each failure is reported once and the
//! caller moves on to its next fallback.

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Trait for async HTTP GET requests.
pub trait HttpGet {
    /// Fetch `url` and return the response body as text.
    ///
    /// Implementations must return an error for non-success statuses.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed [`HttpGet`] implementation.
///
/// An offline client never touches the network and fails every request,
/// which drives every fallback chain to its static default.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    offline: bool,
}

impl HttpClient {
    /// Create a client sending `user_agent`, with an optional per-request timeout.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_else(|_| reqwest::Client::new()),
            offline: false,
        }
    }

    /// Create a client that refuses every request.
    pub fn offline() -> Self {
        Self {
            client: reqwest::Client::new(),
            offline: true,
        }
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("offline", &self.offline)
            .finish()
    }
}

impl HttpGet for HttpClient {
    #[instrument(level = "debug", skip(self))]
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        if self.offline {
            return Err(FetchError::Request("offline mode".to_string()));
        }

        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success HTTP status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = body.len(),
            "GET succeeded"
        );
        Ok(body)
    }
}

/// Fetch `url` and deserialize its JSON body into `T`.
pub async fn get_json<H, T>(http: &H, url: &str) -> Result<T, FetchError>
where
    H: HttpGet,
    T: DeserializeOwned,
{
    let body = http.get_text(url).await?;
    serde_json::from_str(&body).map_err(|e| {
        warn!(
            %url,
            error = %e,
            body_preview = %truncate_for_log(&body, 300),
            "Response was not the expected JSON"
        );
        e.into()
    })
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::sync::Mutex;

    /// In-memory [`HttpGet`]: answers with the first route whose key is a
    /// substring of the requested URL, 404 otherwise.
    #[derive(Debug, Default)]
    pub struct StubHttp {
        routes: Vec<(String, Result<String, u16>)>,
        pub requested: Mutex<Vec<String>>,
    }

    impl StubHttp {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, url_part: &str, body: &str) -> Self {
            self.routes.push((url_part.to_string(), Ok(body.to_string())));
            self
        }

        pub fn failing(mut self, url_part: &str, status: u16) -> Self {
            self.routes.push((url_part.to_string(), Err(status)));
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl HttpGet for StubHttp {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            let route = self.routes.iter().find(|(part, _)| url.contains(part.as_str()));
            match route {
                Some((_, Ok(body))) => Ok(body.clone()),
                Some((_, Err(status))) => Err(FetchError::Status {
                    status: *status,
                    url: url.to_string(),
                }),
                None => Err(FetchError::Status {
                    status: 404,
                    url: url.to_string(),
                }),
            }
        }
    }
}
