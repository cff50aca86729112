use std::path::PathBuf;
use std::time::Duration;

use expmod_core::{
    parse_requirements, write_report, CacheStore, DescriptionFetcher, DirectResolver,
    DiscoveryResolver, ExpmodError, HttpFetcher, Outcome, Pipeline, Requirement, ResolverChain,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline(server: &MockServer) -> Pipeline {
    let http = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let resolvers = ResolverChain::new()
        .with(DirectResolver)
        .with(DiscoveryResolver::new(http.clone()).with_base_url(server.uri()));
    let fetcher = DescriptionFetcher::new(http)
        .with_api_url(server.uri())
        .with_raw_url(server.uri());
    Pipeline::new(resolvers, fetcher)
}

fn empty_cache() -> CacheStore {
    CacheStore::new(PathBuf::from("unused-cache.json"))
}

async fn mount_description(server: &MockServer, repo: &str, description: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "description": description })))
        .expect(calls)
        .mount(server)
        .await;
}

fn render(outcomes: &[Outcome]) -> (String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    write_report(&mut out, &mut err, outcomes).unwrap();
    (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[tokio::test]
async fn direct_requirements_are_reported_sorted() {
    let server = MockServer::start().await;
    mount_description(
        &server,
        "stretchr/testify",
        "A toolkit with common assertions and mocks that plays nicely with the standard library",
        1,
    )
    .await;
    mount_description(
        &server,
        "sahilm/fuzzy",
        "Go library that provides fuzzy string matching",
        1,
    )
    .await;

    let requirements = parse_requirements(
        "module m\n\nrequire (\n\tgithub.com/stretchr/testify v1.8.4\n\tgithub.com/sahilm/fuzzy v0.1.0\n\tgithub.com/davecgh/go-spew v1.1.1 // indirect\n)\n",
    )
    .unwrap();

    let mut cache = empty_cache();
    let report = pipeline(&server).run(&requirements, &mut cache).await;

    let (out, err) = render(&report.outcomes);
    assert_eq!(
        out,
        "github.com/sahilm/fuzzy v0.1.0:\n\tGo library that provides fuzzy string matching\n\
         github.com/stretchr/testify v1.8.4:\n\tA toolkit with common assertions and mocks that plays nicely with the standard library\n"
    );
    assert_eq!(err, "");
    assert_eq!(report.summary.described, 2);
    assert_eq!(report.summary.skipped_indirect, 1);
    assert_eq!(report.summary.fetched, 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn cache_hit_makes_no_network_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut cache = empty_cache();
    cache.insert("pkg/errors", "cached desc");

    let requirements = vec![Requirement::new("github.com/pkg/errors", "v0.9.1", false)];
    let report = pipeline(&server).run(&requirements, &mut cache).await;

    let (out, _) = render(&report.outcomes);
    assert_eq!(out, "github.com/pkg/errors v0.9.1:\n\tcached desc\n");
    assert_eq!(report.summary.cache_hits, 1);
    assert_eq!(report.summary.fetched, 0);
}

#[tokio::test]
async fn one_lookup_per_repository() {
    let server = MockServer::start().await;
    mount_description(&server, "go-redis/redis", "Redis Go client", 1).await;

    let requirements = vec![
        Requirement::new("github.com/go-redis/redis/v8", "v8.11.5", false),
        Requirement::new("github.com/go-redis/redis", "v6.15.9", false),
        Requirement::new("github.com/go-redis/redis/v9", "v9.0.0", false),
    ];
    let mut cache = empty_cache();
    let report = pipeline(&server).run(&requirements, &mut cache).await;

    assert_eq!(report.summary.described, 3);
    assert_eq!(report.summary.fetched, 1);
    let paths: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| o.requirement().module_path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec![
            "github.com/go-redis/redis",
            "github.com/go-redis/redis/v8",
            "github.com/go-redis/redis/v9"
        ]
    );
}

#[tokio::test]
async fn failures_do_not_stop_the_batch() {
    let server = MockServer::start().await;
    Mock::given(path("/repos/broken/repo"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_description(&server, "good/repo", "works", 1).await;

    let requirements = vec![
        Requirement::new("github.com/broken/repo", "v1.0.0", false),
        Requirement::new("github.com/good/repo", "v1.0.0", false),
        Requirement::new("github.com/short", "v1.0.0", false),
    ];
    let mut cache = empty_cache();
    let report = pipeline(&server).run(&requirements, &mut cache).await;

    let (out, err) = render(&report.outcomes);
    assert_eq!(out, "github.com/good/repo v1.0.0:\n\tworks\n");
    assert!(err.contains("error: github.com/broken/repo - "));
    assert!(err.contains("500"));
    assert!(err.contains("error: github.com/short - "));
    assert_eq!(report.summary.failed, 2);

    assert!(cache.contains("good/repo"));
    assert!(!cache.contains("broken/repo"));

    match &report.outcomes[2] {
        Outcome::Failed { error, .. } => {
            assert!(matches!(**error, ExpmodError::InvalidReference { .. }))
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_descriptions_are_reported_but_not_cached() {
    let server = MockServer::start().await;
    mount_description(&server, "no/desc", "", 1).await;

    let requirements = vec![Requirement::new("github.com/no/desc", "v0.1.0", false)];
    let mut cache = empty_cache();
    let report = pipeline(&server).run(&requirements, &mut cache).await;

    let (out, _) = render(&report.outcomes);
    assert_eq!(out, "github.com/no/desc v0.1.0:\n\t\n");
    assert!(cache.is_empty());
}

#[tokio::test]
async fn vanity_paths_go_through_discovery() {
    let server = MockServer::start().await;
    Mock::given(path("/gopkg.in/yaml.v3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<meta name="go-source" content="gopkg.in/yaml.v3 _ https://github.com/go-yaml/yaml/tree/v3.0.1{/dir} https://github.com/go-yaml/yaml/blob/v3.0.1{/dir}/{file}#L{line}">"#,
        ))
        .mount(&server)
        .await;
    mount_description(&server, "go-yaml/yaml", "YAML support for the Go language.", 1).await;

    let requirements = vec![Requirement::new("gopkg.in/yaml.v3", "v3.0.1", false)];
    let mut cache = empty_cache();
    let report = pipeline(&server).run(&requirements, &mut cache).await;

    let (out, _) = render(&report.outcomes);
    assert_eq!(out, "gopkg.in/yaml.v3 v3.0.1:\n\tYAML support for the Go language.\n");
    assert_eq!(cache.get("go-yaml/yaml"), Some("YAML support for the Go language."));
}

#[tokio::test]
async fn cache_survives_a_save_between_runs() {
    let server = MockServer::start().await;
    mount_description(&server, "pkg/errors", "Simple error handling primitives", 1).await;

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let requirements = vec![Requirement::new("github.com/pkg/errors", "v0.9.1", false)];
    let pipeline = pipeline(&server).with_concurrency(1);

    let mut cache = CacheStore::load(cache_path.clone()).unwrap();
    pipeline.run(&requirements, &mut cache).await;
    cache.save().unwrap();

    let mut cache = CacheStore::load(cache_path).unwrap();
    let report = pipeline.run(&requirements, &mut cache).await;
    assert_eq!(report.summary.cache_hits, 1);
    assert_eq!(report.summary.fetched, 0);
}
