//! Batch description of direct requirements.
//!
//! Direct requirements are resolved to repositories, looked up in the
//! cache, and described. Resolution runs for every requirement; the API is
//! then called once per distinct uncached repository. A failure for one
//! requirement is recorded in its [`Outcome`] and never stops the batch.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::describe::DescriptionFetcher;
use crate::error::{ExpmodError, Result};
use crate::modfile::Requirement;
use crate::reference::RepositoryRef;
use crate::resolver::ResolverChain;

/// Default number of lookups in flight.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// What happened to one direct requirement.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Resolved and described.
    Described {
        requirement: Requirement,
        repository: RepositoryRef,
        description: String,
        /// The description came from the cache.
        cached: bool,
    },
    /// Resolution or description failed.
    Failed {
        requirement: Requirement,
        error: Arc<ExpmodError>,
    },
}

impl Outcome {
    /// The requirement this outcome is about.
    pub fn requirement(&self) -> &Requirement {
        match self {
            Outcome::Described { requirement, .. } | Outcome::Failed { requirement, .. } => {
                requirement
            }
        }
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Requirements with a report line.
    pub described: usize,
    /// Requirements that could not be resolved or described.
    pub failed: usize,
    /// Described requirements answered from the cache.
    pub cache_hits: usize,
    /// Description API lookups performed.
    pub fetched: usize,
    /// Indirect requirements that were skipped.
    pub skipped_indirect: usize,
}

/// The result of a run, ordered by module path.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// One outcome per direct requirement.
    pub outcomes: Vec<Outcome>,
    /// Counters.
    pub summary: RunSummary,
}

/// Drives resolution, cache lookup and description for a batch.
pub struct Pipeline {
    resolvers: ResolverChain,
    fetcher: DescriptionFetcher,
    concurrency: usize,
}

impl Pipeline {
    /// Create a pipeline with the default concurrency.
    pub fn new(resolvers: ResolverChain, fetcher: DescriptionFetcher) -> Self {
        Pipeline {
            resolvers,
            fetcher,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Limit the number of lookups in flight (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Describe the direct requirements, updating `cache` with new descriptions.
    ///
    /// Empty descriptions are reported but not cached, so a later run can
    /// retry them.
    pub async fn run(&self, requirements: &[Requirement], cache: &mut CacheStore) -> RunReport {
        let mut direct: Vec<&Requirement> = requirements.iter().filter(|r| !r.indirect).collect();
        direct.sort_by(|a, b| a.module_path.cmp(&b.module_path));
        let skipped_indirect = requirements.len() - direct.len();

        let resolved: Vec<(Requirement, Result<RepositoryRef>)> = stream::iter(direct)
            .map(|requirement| async move {
                let reference = self.resolvers.resolve(&requirement.module_path).await;
                (requirement.clone(), reference)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        // One lookup per distinct repository missing from the cache.
        let mut pending: BTreeMap<String, RepositoryRef> = BTreeMap::new();
        for reference in resolved.iter().filter_map(|(_, r)| r.as_ref().ok()) {
            let key = reference.cache_key();
            if cache.contains(&key) {
                debug!(%key, "cache hit");
                continue;
            }
            pending.entry(key).or_insert_with(|| reference.clone());
        }

        let fetched: HashMap<String, std::result::Result<String, Arc<ExpmodError>>> =
            stream::iter(pending)
                .map(|(key, reference)| async move {
                    let description = self
                        .fetcher
                        .fetch_description(&reference)
                        .await
                        .map_err(Arc::new);
                    (key, description)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        for (key, description) in &fetched {
            match description {
                Ok(description) if !description.is_empty() => {
                    cache.insert(key.clone(), description.clone());
                }
                Ok(_) => debug!(%key, "empty description, not cached"),
                Err(e) => debug!(%key, error = %e, "description lookup failed"),
            }
        }

        let mut summary = RunSummary {
            fetched: fetched.len(),
            skipped_indirect,
            ..RunSummary::default()
        };

        let mut outcomes = Vec::with_capacity(resolved.len());
        for (requirement, reference) in resolved {
            let outcome = match reference {
                Err(e) => {
                    debug!(module = %requirement.module_path, error = %e, "resolution failed");
                    Outcome::Failed {
                        requirement,
                        error: Arc::new(e),
                    }
                }
                Ok(repository) => {
                    let key = repository.cache_key();
                    match fetched.get(&key) {
                        Some(Ok(description)) => Outcome::Described {
                            requirement,
                            repository,
                            description: description.clone(),
                            cached: false,
                        },
                        Some(Err(e)) => Outcome::Failed {
                            requirement,
                            error: Arc::clone(e),
                        },
                        None => Outcome::Described {
                            requirement,
                            description: cache.get(&key).unwrap_or_default().to_string(),
                            repository,
                            cached: true,
                        },
                    }
                }
            };

            match &outcome {
                Outcome::Described { cached: true, .. } => {
                    summary.described += 1;
                    summary.cache_hits += 1;
                }
                Outcome::Described { .. } => summary.described += 1,
                Outcome::Failed { .. } => summary.failed += 1,
            }
            outcomes.push(outcome);
        }

        info!(
            described = summary.described,
            failed = summary.failed,
            cache_hits = summary.cache_hits,
            fetched = summary.fetched,
            skipped_indirect = summary.skipped_indirect,
            "run complete"
        );

        RunReport { outcomes, summary }
    }
}
