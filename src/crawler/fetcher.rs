use std::time::Duration;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use url::Url;
use crate::core::error::{Error, Result};

pub const MAX_REDIRECTS: usize = 3;

/// Source of raw page content for the crawler.
pub trait Fetcher: Send + Sync {
    /// HTML body of `url`, or a network error if the page is unreachable or not HTML.
    fn fetch(&self, url: &Url) -> Result<String>;
}

/// Blocking HTTP fetcher. Only `200 OK` responses with an HTML content type count as
/// pages; at most `MAX_REDIRECTS` redirects are followed.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send()?;

        if response.status() != StatusCode::OK {
            return Err(Error::network(format!("{} returned {}", url, response.status())));
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().starts_with("text/html"));
        if !is_html {
            return Err(Error::network(format!("{} is not HTML", url)));
        }

        Ok(response.text()?)
    }
}
