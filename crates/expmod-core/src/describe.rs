//! Repository descriptions from the hosting platform's API.
//!
//! When a repository publishes no description, the first heading of its
//! README is used instead.

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ExpmodError, Result};
use crate::http::{Access, HttpFetcher};
use crate::reference::RepositoryRef;

/// Default repository API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default raw-content host.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";

/// README location relative to `<owner>/<name>` on the raw-content host.
const README_PATH: [&str; 2] = ["HEAD", "README.md"];

#[derive(Debug, Deserialize)]
struct RepoReply {
    #[serde(default)]
    description: Option<String>,
}

/// Fetches short descriptions for repositories.
#[derive(Debug, Clone)]
pub struct DescriptionFetcher {
    http: HttpFetcher,
    api_url: String,
    raw_url: String,
}

impl DescriptionFetcher {
    /// Use the default API and raw-content hosts.
    pub fn new(http: HttpFetcher) -> Self {
        DescriptionFetcher {
            http,
            api_url: DEFAULT_API_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
        }
    }

    /// Override the repository API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the raw-content base URL.
    pub fn with_raw_url(mut self, url: impl Into<String>) -> Self {
        self.raw_url = url.into();
        self
    }

    /// Fetch the description of `repo`.
    ///
    /// API failures are errors. An empty description falls back to the
    /// README heading; a failing fallback yields `""` rather than an error.
    pub async fn fetch_description(&self, repo: &RepositoryRef) -> Result<String> {
        let url = endpoint(&self.api_url, &["repos", &repo.owner, &repo.name])?;
        let body = self.http.get_text(&url, Access::Authorized).await?;
        let reply: RepoReply =
            serde_json::from_str(&body).map_err(|source| ExpmodError::Json { url, source })?;

        let description = reply.description.unwrap_or_default();
        if !description.is_empty() {
            return Ok(description);
        }

        match self.readme_heading(repo).await {
            Ok(Some(heading)) => Ok(heading),
            Ok(None) => {
                debug!(%repo, "README has no heading");
                Ok(String::new())
            }
            Err(e) => {
                warn!(%repo, error = %e, "no description and README fallback failed");
                Ok(String::new())
            }
        }
    }

    async fn readme_heading(&self, repo: &RepositoryRef) -> Result<Option<String>> {
        let mut segments = vec![repo.owner.as_str(), repo.name.as_str()];
        segments.extend(README_PATH);
        let url = endpoint(&self.raw_url, &segments)?;
        let text = self.http.get_text(&url, Access::Authorized).await?;
        Ok(first_heading(&text))
    }
}

/// First markdown heading of `text`, without its `#` markers.
pub fn first_heading(text: &str) -> Option<String> {
    text.lines()
        .filter(|line| line.starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim())
        .find(|heading| !heading.is_empty())
        .map(str::to_string)
}

/// Append percent-encoded path segments to `base`.
fn endpoint(base: &str, segments: &[&str]) -> Result<String> {
    let invalid = |detail: String| ExpmodError::InvalidUrl {
        url: base.to_string(),
        detail,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("not a base URL".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.to_string())
}
