//! Resolution through the package index detail page.
//!
//! The index has no API, so the repository link is scraped from:
//! ```text
//! <div class="UnitMeta-repo">
//!   <a href="https://github.com/uber-go/zap" title="https://github.com/uber-go/zap">
//!     github.com/uber-go/zap
//!   </a>
//! </div>
//! ```

use async_trait::async_trait;

use crate::error::{ExpmodError, Result};
use crate::html::{attribute, find_node, is_element, parse_document};
use crate::http::{Access, HttpFetcher};
use crate::reference::{is_platform_native, RepositoryRef};

use super::RepoResolver;

/// Default package index.
pub const DEFAULT_INDEX_URL: &str = "https://pkg.go.dev";

/// Class of the element wrapping the repository link.
pub const INDEX_REPO_CLASS: &str = "UnitMeta-repo";

/// Resolves module paths through the package index.
#[derive(Debug, Clone)]
pub struct IndexResolver {
    http: HttpFetcher,
    base_url: String,
}

impl IndexResolver {
    /// Query the default package index.
    pub fn new(http: HttpFetcher) -> Self {
        IndexResolver {
            http,
            base_url: DEFAULT_INDEX_URL.to_string(),
        }
    }

    /// Query the index at `base_url` instead.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up the repository URL for `module_path`, verbatim.
    pub async fn repository_url(&self, module_path: &str) -> Result<String> {
        let url = format!("{}/{module_path}", self.base_url.trim_end_matches('/'));
        let body = self.http.get_text(&url, Access::Public).await?;
        parse_index_html(&body, &url)
    }
}

#[async_trait]
impl RepoResolver for IndexResolver {
    fn name(&self) -> &'static str {
        "index"
    }

    fn handles(&self, module_path: &str) -> bool {
        !is_platform_native(module_path)
    }

    async fn resolve(&self, module_path: &str) -> Result<RepositoryRef> {
        let repo_url = self.repository_url(module_path).await?;
        RepositoryRef::from_url(&repo_url).ok_or_else(|| ExpmodError::InvalidReference {
            path: repo_url,
        })
    }
}

/// Extract the repository link from an index detail page.
pub fn parse_index_html(body: &str, url: &str) -> Result<String> {
    let doc = parse_document(body);

    let div = find_node(doc.tree.root(), |n| {
        is_element(n, "div") && attribute(n, "class") == INDEX_REPO_CLASS
    })
    .ok_or_else(|| ExpmodError::ElementNotFound {
        url: url.to_string(),
        detail: "can't find repo div".to_string(),
    })?;

    let link = find_node(div, |n| is_element(n, "a")).ok_or_else(|| {
        ExpmodError::ElementNotFound {
            url: url.to_string(),
            detail: "can't find 'a' in repo div".to_string(),
        }
    })?;

    Ok(attribute(&link, "href").to_string())
}
