//! Human-readable descriptions for the direct dependencies of a Go module.
//!
//! Reads the `require` directives of a `go.mod`, maps every direct
//! requirement to a repository on the hosting platform, and fetches a
//! short description for it. Descriptions are kept in a local cache so
//! repeated runs stay off the network.
//!
//! # Architecture
//!
//! - **Resolvers**: map a module path to an `owner/name` pair: direct
//!   parsing for platform-hosted paths, the `?go-get=1` discovery page for
//!   vanity paths, and optionally the package index
//! - **Description fetcher**: repository API, with a README heading
//!   fallback
//! - **Cache store**: `owner/name` → description, persisted as JSON
//! - **Pipeline**: drives the batch; failures stay per dependency

pub mod cache;
pub mod describe;
pub mod error;
pub mod html;
pub mod http;
pub mod modfile;
pub mod pipeline;
pub mod reference;
pub mod report;
pub mod resolver;

// Re-exports for convenience.
pub use cache::{CacheStore, CACHE_ENV_KEY};
pub use describe::{first_heading, DescriptionFetcher, DEFAULT_API_URL, DEFAULT_RAW_URL};
pub use error::{ExpmodError, Result};
pub use http::{Access, HttpFetcher, DEFAULT_BODY_LIMIT, DEFAULT_TIMEOUT};
pub use modfile::{parse_requirements, Requirement};
pub use pipeline::{Outcome, Pipeline, RunReport, RunSummary, DEFAULT_CONCURRENCY};
pub use reference::{parse_reference, RepositoryRef, HOSTING_PLATFORM};
pub use report::{format_entry, write_report};
pub use resolver::{
    DirectResolver, DiscoveryResolver, IndexResolver, RepoResolver, ResolverChain,
    DEFAULT_INDEX_URL,
};
