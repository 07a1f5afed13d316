//! Link counter collaborator
//!
//! Fetches the submitted page and counts its anchor elements. The count is
//! best-effort enrichment: every failure mode (network error, non-2xx
//! response, timeout) degrades to `0` with a warning log, and the analysis
//! job still completes. This asymmetry with the technology lookup is
//! intentional.

use anyhow::bail;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

/// Counts anchor elements on a target page, best-effort
pub struct LinkCounter {
    client: Client,
    fetch_timeout: Duration,
}

impl LinkCounter {
    /// Creates a link counter whose page fetch is bounded by `fetch_timeout`
    pub fn new(fetch_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("stacksight/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            fetch_timeout,
        })
    }

    /// Returns the number of `<a href>` elements on the page at `url`
    ///
    /// Never fails: the whole fetch-and-parse is wrapped in a cancellable
    /// timeout, and any error path returns `0`.
    pub async fn count_links(&self, url: &str) -> u32 {
        match tokio::time::timeout(self.fetch_timeout, self.fetch_and_count(url)).await {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => {
                tracing::warn!("failed to count links for {}: {}", url, e);
                0
            }
            Err(_) => {
                tracing::warn!(
                    "link counting for {} timed out after {:?}",
                    url,
                    self.fetch_timeout
                );
                0
            }
        }
    }

    async fn fetch_and_count(&self, url: &str) -> anyhow::Result<u32> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {}", status);
        }

        let html = response.text().await?;
        Ok(count_anchors(&html))
    }
}

/// Counts `<a href>` elements in an HTML document
fn count_anchors(html: &str) -> u32 {
    let document = Html::parse_document(html);

    match Selector::parse("a[href]") {
        Ok(selector) => document.select(&selector).count() as u32,
        Err(_) => 0,
    }
}
