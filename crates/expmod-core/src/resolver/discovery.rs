//! Resolution through the `?go-get=1` discovery page served by a module host.
//!
//! The page looks like:
//! ```text
//! <html>
//! <head>
//! <meta name="go-import" content="gopkg.in/yaml.v3 git https://gopkg.in/yaml.v3">
//! <meta name="go-source" content="gopkg.in/yaml.v3 _ https://github.com/go-yaml/yaml/tree/v3.0.1{/dir} https://github.com/go-yaml/yaml/blob/v3.0.1{/dir}/{file}#L{line}">
//! </head>
//! <body>go get gopkg.in/yaml.v3</body>
//! </html>
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ExpmodError, Result};
use crate::html::{attribute, find_node, is_element, parse_document};
use crate::http::{Access, HttpFetcher};
use crate::reference::{is_platform_native, RepositoryRef, HOSTING_PLATFORM};

use super::RepoResolver;

/// Metadata tags consulted, in priority order.
pub const DISCOVERY_TAGS: [&str; 2] = ["go-source", "go-import"];

// Owner and name stop at whitespace, `/` and the `{}` of URL templates.
static REPO_URL: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"https://{}/([^\s/{{}}]+)/([^\s/{{}}]+)",
        regex::escape(HOSTING_PLATFORM)
    );
    Regex::new(&pattern).expect("repository URL pattern")
});

// golang.org/x modules redirect here; they are mirrored under github.com/golang.
static GO_GOOGLESOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https://go\.googlesource\.com/(\w+)").expect("googlesource pattern"));

/// Resolves vanity import paths via their discovery page.
#[derive(Debug, Clone)]
pub struct DiscoveryResolver {
    http: HttpFetcher,
    base_url: Option<String>,
}

impl DiscoveryResolver {
    /// Fetch discovery pages from `https://<module path>`.
    pub fn new(http: HttpFetcher) -> Self {
        DiscoveryResolver {
            http,
            base_url: None,
        }
    }

    /// Fetch discovery pages from `<base_url>/<module path>` instead.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The discovery URL for `module_path`.
    pub fn discovery_url(&self, module_path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/{module_path}?go-get=1", base.trim_end_matches('/')),
            None => format!("https://{module_path}?go-get=1"),
        }
    }
}

#[async_trait]
impl RepoResolver for DiscoveryResolver {
    fn name(&self) -> &'static str {
        "discovery"
    }

    fn handles(&self, module_path: &str) -> bool {
        !is_platform_native(module_path)
    }

    async fn resolve(&self, module_path: &str) -> Result<RepositoryRef> {
        let url = self.discovery_url(module_path);
        let body = self.http.get_text(&url, Access::Public).await?;
        parse_discovery_html(&body, &url)
    }
}

/// Find the hosting repository in a discovery page.
///
/// `go-source` is consulted before `go-import`. `url` is only used for
/// error messages.
pub fn parse_discovery_html(body: &str, url: &str) -> Result<RepositoryRef> {
    let doc = parse_document(body);

    let mut present = Vec::new();
    for tag in DISCOVERY_TAGS {
        let Some(node) = find_node(doc.tree.root(), |n| {
            is_element(n, "meta") && attribute(n, "name") == tag
        }) else {
            continue;
        };
        present.push(tag);

        if let Some(reference) = repository_in_content(attribute(&node, "content")) {
            return Ok(reference);
        }
    }

    if present.is_empty() {
        return Err(ExpmodError::MetadataNotFound {
            url: url.to_string(),
            tags: DISCOVERY_TAGS.join(", "),
        });
    }
    Err(ExpmodError::NoRepositoryInMetadata {
        url: url.to_string(),
        tags: present.join(", "),
    })
}

/// First repository named by a metadata `content` attribute.
fn repository_in_content(content: &str) -> Option<RepositoryRef> {
    if let Some(caps) = REPO_URL.captures(content) {
        let name = caps[2].trim().trim_end_matches(".git");
        return Some(RepositoryRef::new(caps[1].trim(), name));
    }

    GO_GOOGLESOURCE
        .captures(content)
        .map(|caps| RepositoryRef::new("golang", &caps[1]))
}
