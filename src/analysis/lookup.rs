//! Technology lookup collaborator
//!
//! This module answers "what is this site built with". Two implementations
//! sit behind the [`TechnologyLookup`] trait:
//!
//! - [`ApiTechnologyLookup`]: queries a BuiltWith-style JSON API
//! - [`MockTechnologyLookup`]: serves randomized data when no API key is
//!   configured, so the service is usable in development
//!
//! Lookup failures are real failures: they propagate to the caller and fail
//! the whole analysis job. (Contrast with the link counter, which degrades
//! to zero.)

use anyhow::{bail, Context};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::job::Technology;
use crate::config::LookupConfig;

/// Collaborator that detects the technology stack of a site
#[async_trait]
pub trait TechnologyLookup: Send + Sync {
    /// Returns the technologies detected on the given URL
    async fn detect(&self, url: &str) -> anyhow::Result<Vec<Technology>>;
}

/// Builds the lookup implementation selected by the configuration
///
/// With an API key the HTTP-backed lookup is used; without one, mock data.
pub fn lookup_from_config(config: &LookupConfig) -> crate::Result<Arc<dyn TechnologyLookup>> {
    if config.api_key.is_empty() {
        tracing::warn!("technology lookup API key not set, serving mock data");
        Ok(Arc::new(MockTechnologyLookup))
    } else {
        let lookup = ApiTechnologyLookup::new(config.endpoint.clone(), config.api_key.clone())?;
        Ok(Arc::new(lookup))
    }
}

// ===== HTTP-backed lookup =====

/// Subset of the lookup API response body that we consume
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "Results", default)]
    results: Vec<LookupResult>,

    #[serde(rename = "Errors", default)]
    errors: Vec<LookupApiError>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(rename = "Result")]
    result: LookupResultBody,
}

#[derive(Debug, Deserialize)]
struct LookupResultBody {
    #[serde(rename = "Paths", default)]
    paths: Vec<LookupPath>,
}

#[derive(Debug, Deserialize)]
struct LookupPath {
    #[serde(rename = "Technologies", default)]
    technologies: Vec<LookupTechnology>,
}

#[derive(Debug, Deserialize)]
struct LookupTechnology {
    #[serde(rename = "Name")]
    name: String,

    #[serde(rename = "Tag")]
    tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupApiError {
    #[serde(rename = "Message")]
    message: String,
}

/// Technology lookup backed by a BuiltWith-style JSON API
pub struct ApiTechnologyLookup {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ApiTechnologyLookup {
    /// Creates a lookup client against the given endpoint
    pub fn new(endpoint: String, api_key: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Flattens the API response into a deduplicated technology list
    ///
    /// The API reports technologies per crawled path; the same product shows
    /// up once per path, so the first occurrence wins.
    fn parse_technologies(response: LookupResponse) -> Vec<Technology> {
        let mut technologies: Vec<Technology> = Vec::new();

        for result in response.results {
            for path in result.result.paths {
                for tech in path.technologies {
                    if technologies.iter().any(|t| t.name == tech.name) {
                        continue;
                    }

                    technologies.push(Technology {
                        name: tech.name,
                        category: tech.tag.unwrap_or_else(|| "Other".to_string()),
                        version: None,
                    });
                }
            }
        }

        technologies
    }
}

#[async_trait]
impl TechnologyLookup for ApiTechnologyLookup {
    async fn detect(&self, url: &str) -> anyhow::Result<Vec<Technology>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("KEY", self.api_key.as_str()), ("LOOKUP", url)])
            .send()
            .await
            .context("technology lookup request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("technology lookup API error: {}", status);
        }

        let body: LookupResponse = response
            .json()
            .await
            .context("technology lookup returned malformed JSON")?;

        if let Some(error) = body.errors.first() {
            bail!("technology lookup API error: {}", error.message);
        }

        Ok(Self::parse_technologies(body))
    }
}

// ===== Mock lookup =====

/// Fixed catalogue the mock lookup draws from
const MOCK_CATALOGUE: &[(&str, &str)] = &[
    ("React", "JavaScript Frameworks"),
    ("WordPress", "CMS"),
    ("Google Analytics", "Analytics"),
    ("jQuery", "JavaScript Libraries"),
    ("Bootstrap", "UI Frameworks"),
    ("Node.js", "Web Servers"),
    ("Nginx", "Web Servers"),
    ("Cloudflare", "CDN"),
    ("Google Fonts", "Font Scripts"),
    ("SSL Certificate", "SSL Certificates"),
];

/// Technology lookup serving randomized mock data
///
/// Used when no API key is configured. Returns 3 to 8 technologies drawn
/// from a fixed catalogue; roughly a third of them get a random version.
pub struct MockTechnologyLookup;

#[async_trait]
impl TechnologyLookup for MockTechnologyLookup {
    async fn detect(&self, _url: &str) -> anyhow::Result<Vec<Technology>> {
        let mut rng = rand::thread_rng();

        let count = rng.gen_range(3..=8);
        let mut picks: Vec<(&str, &str)> = MOCK_CATALOGUE.to_vec();
        picks.shuffle(&mut rng);
        picks.truncate(count);

        let technologies = picks
            .into_iter()
            .map(|(name, category)| Technology {
                name: name.to_string(),
                category: category.to_string(),
                version: if rng.gen_bool(0.3) {
                    Some(format!("{}.{}", rng.gen_range(1..=5), rng.gen_range(0..10)))
                } else {
                    None
                },
            })
            .collect();

        Ok(technologies)
    }
}
