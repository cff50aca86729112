//! `expmod [FILE|URL|-]`: print a description for every direct requirement.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use expmod_core::{
    parse_requirements, write_report, CacheStore, DescriptionFetcher, DirectResolver,
    DiscoveryResolver, HttpFetcher, IndexResolver, Pipeline, ResolverChain, RunSummary,
};

use crate::input::ManifestSource;
use crate::settings::Settings;

/// Build the resolver chain for `settings`.
pub fn resolver_chain(settings: &Settings, http: &HttpFetcher) -> ResolverChain {
    let mut discovery = DiscoveryResolver::new(http.clone());
    if let Some(base) = &settings.endpoints.discovery {
        discovery = discovery.with_base_url(base.clone());
    }
    let chain = ResolverChain::new().with(DirectResolver).with(discovery);
    if settings.index_fallback {
        chain.with(IndexResolver::new(http.clone()).with_base_url(settings.endpoints.index.clone()))
    } else {
        chain
    }
}

pub async fn run(
    settings: &Settings,
    source: &ManifestSource,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<RunSummary> {
    let http = HttpFetcher::new(settings.timeout())
        .context("building HTTP client")?
        .with_token(settings.token.clone());

    let text = source.read(&http).await?;
    let requirements = parse_requirements(&text).context("parsing module file")?;

    let cache_path = super::cache_path(settings)?;
    let mut cache = CacheStore::load_or_default(cache_path);

    let fetcher = DescriptionFetcher::new(http.clone())
        .with_api_url(settings.endpoints.api.clone())
        .with_raw_url(settings.endpoints.raw.clone());
    let resolvers = resolver_chain(settings, &http);
    info!(
        resolvers = ?resolvers.names(),
        jobs = settings.concurrency,
        "describing {} requirements",
        requirements.len()
    );
    let pipeline = Pipeline::new(resolvers, fetcher).with_concurrency(settings.concurrency);

    let report = pipeline.run(&requirements, &mut cache).await;
    write_report(out, err, &report.outcomes).context("writing report")?;

    if let Err(e) = cache.save() {
        warn!(error = %e, "can't save cache");
    }
    Ok(report.summary)
}
