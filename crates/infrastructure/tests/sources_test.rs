mod helpers;

use ferrous_doh_application::ports::Source;
use ferrous_doh_domain::config::{QueryConfig, SourceApi};
use ferrous_doh_domain::{DnsQuery, DomainError, RecordType};
use ferrous_doh_infrastructure::sources::{ProviderSource, SourceRegistry};
use helpers::doh_upstream::{Behavior, StubUpstream};
use helpers::plain_transport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

fn example_query(record_type: RecordType) -> DnsQuery {
    DnsQuery::new("example.com", record_type)
}

#[tokio::test]
async fn test_message_source_answers() {
    let upstream = StubUpstream::start(Behavior::Answer).await;
    let source = ProviderSource::new("stub", upstream.url(), SourceApi::Message, plain_transport());

    let response = source
        .query(&CancellationToken::new(), &example_query(RecordType::A))
        .await
        .unwrap();

    assert_eq!(source.name(), "stub");
    assert_eq!(response.answer[0].data, "93.184.216.34");
}

#[tokio::test]
async fn test_json_source_sends_name_and_type() {
    let upstream = StubUpstream::start(Behavior::Json).await;
    let source = ProviderSource::new("stub", upstream.json_url(), SourceApi::Json, plain_transport());

    let response = source
        .query(&CancellationToken::new(), &example_query(RecordType::AAAA))
        .await
        .unwrap();

    assert_eq!(response.answer[0].ttl, 300);
    assert!(response.recursion_available);

    let seen = upstream.seen();
    assert_eq!(seen[0].query.as_deref(), Some("name=example.com&type=AAAA"));
    assert_eq!(seen[0].accept.as_deref(), Some("application/dns-json"));
}

#[tokio::test]
async fn test_json_source_error_status_is_transport_error() {
    let upstream = StubUpstream::start(Behavior::Answer).await;
    let source = ProviderSource::new("stub", upstream.json_url(), SourceApi::Json, plain_transport());

    let err = source
        .query(&CancellationToken::new(), &example_query(RecordType::A))
        .await
        .unwrap_err();

    // The stub answers GET /resolve without a dns param with 400.
    assert!(matches!(err, DomainError::TransportError(_)));
}

#[tokio::test]
async fn test_limiter_bounds_in_flight_queries() {
    let upstream = StubUpstream::start(Behavior::SlowAnswer(Duration::from_millis(100))).await;
    let source = Arc::new(
        ProviderSource::new("stub", upstream.url(), SourceApi::Message, plain_transport())
            .with_limiter(Arc::new(Semaphore::new(2))),
    );
    let cancel = CancellationToken::new();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let source = source.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                source
                    .query(&cancel, &example_query(RecordType::A))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(upstream.hits(), 6);
    assert!(upstream.max_in_flight() <= 2, "max in flight {}", upstream.max_in_flight());
}

#[tokio::test]
async fn test_waiting_for_permit_is_cancellable() {
    let upstream = StubUpstream::start(Behavior::Answer).await;
    let limiter = Arc::new(Semaphore::new(1));
    let _held = limiter.clone().acquire_owned().await.unwrap();
    let source = ProviderSource::new("stub", upstream.url(), SourceApi::Message, plain_transport())
        .with_limiter(limiter);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = source
        .query(&cancel, &example_query(RecordType::A))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::Cancelled);
    assert_eq!(upstream.hits(), 0);
}

#[test]
fn test_lazy_limiter_is_created_once() {
    let source = ProviderSource::new(
        "stub",
        "http://127.0.0.1:1/dns-query",
        SourceApi::Message,
        plain_transport(),
    );

    let first = source.limiter().clone();
    let second = source.limiter().clone();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.available_permits() >= 1);
}

fn registry() -> SourceRegistry {
    SourceRegistry::new(plain_transport())
}

fn names(sources: &[Arc<dyn Source>]) -> Vec<String> {
    sources.iter().map(|s| s.name().to_string()).collect()
}

#[test]
fn test_registry_resolves_default_sources() {
    let sources = registry().resolve(&QueryConfig::default()).unwrap();
    assert_eq!(names(&sources), vec!["google", "cloudflare", "quad9"]);
}

#[test]
fn test_registry_skips_unknown_and_accepts_urls() {
    let config = QueryConfig {
        sources: vec![
            "Mozilla".to_string(),
            "nonexistent".to_string(),
            "https://doh.example/dns-query".to_string(),
        ],
        ..QueryConfig::default()
    };

    let sources = registry().resolve(&config).unwrap();
    assert_eq!(
        names(&sources),
        vec!["mozilla", "https://doh.example/dns-query"]
    );
}

#[test]
fn test_registry_json_api_skips_providers_without_json() {
    let config = QueryConfig {
        sources: vec!["google".to_string(), "adguard".to_string()],
        api: SourceApi::Json,
        ..QueryConfig::default()
    };

    let sources = registry().resolve(&config).unwrap();
    assert_eq!(names(&sources), vec!["google"]);
}

#[test]
fn test_registry_adds_custom_source() {
    let config = QueryConfig {
        sources: vec!["google".to_string()],
        custom_source_name: "mine".to_string(),
        custom_source_url: Some("https://doh.example/dns-query".to_string()),
        ..QueryConfig::default()
    };

    let sources = registry().resolve(&config).unwrap();
    assert_eq!(names(&sources), vec!["google", "mine"]);
}

#[test]
fn test_registry_custom_only() {
    let config = QueryConfig {
        custom_source_url: Some("https://doh.example/dns-query".to_string()),
        custom_only: true,
        ..QueryConfig::default()
    };

    let sources = registry().resolve(&config).unwrap();
    assert_eq!(names(&sources), vec!["custom"]);
}

#[test]
fn test_registry_errors() {
    let zero_workers = QueryConfig {
        workers: Some(0),
        ..QueryConfig::default()
    };
    assert!(matches!(
        registry().resolve(&zero_workers),
        Err(DomainError::ConfigError(_))
    ));

    let nothing_known = QueryConfig {
        sources: vec!["nonexistent".to_string()],
        ..QueryConfig::default()
    };
    assert!(matches!(
        registry().resolve(&nothing_known),
        Err(DomainError::ConfigError(_))
    ));

    let custom_only_without_url = QueryConfig {
        custom_only: true,
        ..QueryConfig::default()
    };
    assert!(matches!(
        registry().resolve(&custom_only_without_url),
        Err(DomainError::ConfigError(_))
    ));
}
