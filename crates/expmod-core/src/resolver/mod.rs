//! Strategies that map a module path to a repository on the hosting platform.
//!
//! The [`RepoResolver`] trait abstracts over the different strategies
//! (direct parsing, discovery page, package index). A [`ResolverChain`]
//! tries them in priority order.

mod direct;
mod discovery;
mod index;

pub use direct::DirectResolver;
pub use discovery::{parse_discovery_html, DiscoveryResolver, DISCOVERY_TAGS};
pub use index::{parse_index_html, IndexResolver, DEFAULT_INDEX_URL, INDEX_REPO_CLASS};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ExpmodError, Result};
use crate::reference::RepositoryRef;

/// A repository resolution strategy.
#[async_trait]
pub trait RepoResolver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this strategy applies to `module_path` at all.
    fn handles(&self, _module_path: &str) -> bool {
        true
    }

    /// Resolve `module_path` to a valid repository reference.
    async fn resolve(&self, module_path: &str) -> Result<RepositoryRef>;
}

/// An ordered list of resolvers; the first success wins.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn RepoResolver>>,
}

impl ResolverChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        ResolverChain::default()
    }

    /// Append a resolver with lower priority than those already present.
    pub fn with(mut self, resolver: impl RepoResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Names of the resolvers in priority order.
    pub fn names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Try each applicable resolver in order.
    ///
    /// Returns the first successful reference, or the last failure when
    /// every applicable resolver failed.
    pub async fn resolve(&self, module_path: &str) -> Result<RepositoryRef> {
        let mut last_error = None;
        for resolver in self.resolvers.iter().filter(|r| r.handles(module_path)) {
            match resolver.resolve(module_path).await {
                Ok(reference) => {
                    debug!(module_path, resolver = resolver.name(), %reference, "resolved");
                    return Ok(reference);
                }
                Err(e) => {
                    debug!(module_path, resolver = resolver.name(), error = %e, "resolver failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ExpmodError::InvalidReference {
            path: module_path.to_string(),
        }))
    }
}
