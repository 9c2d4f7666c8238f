//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the provider and run the real
//! HTTP client through the full catalogue → events → markets cycle.

use odds_ripple::config::{
    Config, CrawlerConfig, HttpConfig, OutputConfig, ProviderConfig, ServerConfig,
};
use odds_ripple::crawler::{Coordinator, HierarchyClient, HttpHierarchyClient};
use odds_ripple::output::{render_text, FileSink, MemorySink};
use odds_ripple::RippleError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock provider
fn create_test_config(base_url: &str, sports: &str, events_per_league: u32) -> Config {
    Config {
        provider: ProviderConfig {
            base_url: base_url.to_string(),
            sports_path: "/api/sports".to_string(),
            events_path: "/api/leagues/{league_id}/events".to_string(),
            markets_path: "/api/events/{event_id}/markets".to_string(),
        },
        crawler: CrawlerConfig {
            sports: sports.to_string(),
            max_concurrent_tasks: 3,
            events_per_league,
            record_buffer: 8,
        },
        http: HttpConfig {
            timeout_seconds: 1,
            max_body_mb: 1,
            user_agent: "OddsRippleTest/1.0".to_string(),
        },
        output: OutputConfig {
            console: false,
            file_path: None,
        },
        server: ServerConfig::default(),
    }
}

fn catalogue() -> serde_json::Value {
    json!([
        {
            "name": "Football",
            "regions": [
                {
                    "name": "England",
                    "leagues": [
                        { "id": 10, "name": "Premier League", "top": true },
                        { "id": 11, "name": "League Two", "top": false }
                    ]
                },
                { "name": "Atlantis", "leagues": null }
            ]
        },
        { "name": "Tennis", "regions": null }
    ])
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_reference_scenario() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/api/sports", catalogue()).await;
    mount_json(
        &mock_server,
        "/api/leagues/10/events",
        json!({
            "events": [
                { "id": 1, "name": "Arsenal - Chelsea", "kickoff": 1700000000000i64 },
                { "id": 2, "name": "Spurs - Everton", "kickoff": 1700003600000i64 }
            ]
        }),
    )
    .await;
    mount_json(
        &mock_server,
        "/api/events/1/markets",
        json!({
            "markets": [
                {
                    "name": "1X2",
                    "open": true,
                    "runners": [
                        { "id": 11, "name": "Home", "open": true, "priceStr": "1.85" },
                        { "id": 12, "name": "Away", "open": true, "priceStr": "4.20" },
                        { "id": 13, "name": "Draw", "open": false, "priceStr": "3.50" }
                    ]
                },
                { "name": "Handicap", "open": false, "runners": [] }
            ]
        }),
    )
    .await;

    // Non-top league and capped events are never requested
    Mock::given(method("GET"))
        .and(path("/api/leagues/11/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "events": [] })))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events/2/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "markets": [] })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "Football", 1);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let sink = MemorySink::new();

    let stats = coordinator.run(&sink).await.expect("Crawl failed");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(stats.records, 1);
    assert_eq!(
        render_text(&records[0]),
        "Football, England Premier League\n\
         \tArsenal - Chelsea, 2023-11-14 22:13:20 UTC, 1\n\
         \t\t1X2\n\
         \t\t\tHome, 1.85, 11\n\
         \t\t\tAway, 4.20, 12\n"
    );
}

#[tokio::test]
async fn test_failing_league_is_isolated() {
    let mock_server = MockServer::start().await;
    mount_json(
        &mock_server,
        "/api/sports",
        json!([{
            "name": "Football",
            "regions": [{
                "name": "England",
                "leagues": [
                    { "id": 10, "name": "Premier League", "top": true },
                    { "id": 12, "name": "Championship", "top": true }
                ]
            }]
        }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/leagues/10/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_json(
        &mock_server,
        "/api/leagues/12/events",
        json!({ "events": [{ "id": 5, "name": "Leeds - Hull", "kickoff": 0 }] }),
    )
    .await;
    mount_json(&mock_server, "/api/events/5/markets", json!({ "markets": null })).await;

    let config = create_test_config(&mock_server.uri(), "Football", 5);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let sink = MemorySink::new();

    let stats = coordinator.run(&sink).await.expect("Crawl failed");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].league_id, 12);
    assert!(records[0].markets.is_empty());
    assert_eq!(stats.leagues_failed, 1);
    assert_eq!(stats.leagues_assembled, 1);
}

#[tokio::test]
async fn test_empty_catalogue_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/api/sports", json!([])).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/(leagues|events)/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "Football", 5);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");

    let result = coordinator.run(&MemorySink::new()).await;

    assert!(matches!(result, Err(RippleError::NoSports(_))));
}

#[tokio::test]
async fn test_catalogue_error_status_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sports"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "Football", 5);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");

    let result = coordinator.stream().await;

    match result {
        Err(RippleError::NoSports(message)) => assert!(message.contains("503")),
        other => panic!("expected NoSports, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mock_server = MockServer::start().await;
    let body = format!("[{}]", " ".repeat(2 * 1024 * 1024));
    Mock::given(method("GET"))
        .and(path("/api/sports"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "Football", 5);
    let client = HttpHierarchyClient::from_config(&config.provider, &config.http)
        .expect("Failed to create client");

    let result = client.get_sports().await;

    assert!(matches!(
        result,
        Err(RippleError::BodyTooLarge { limit, .. }) if limit == 1024 * 1024
    ));
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leagues/10/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "events": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "Football", 5);
    let client = HttpHierarchyClient::from_config(&config.provider, &config.http)
        .expect("Failed to create client");

    let result = client.get_events(10).await;

    assert!(matches!(result, Err(RippleError::Timeout { .. })));
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/7/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"markets\": [oops"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "Football", 5);
    let client = HttpHierarchyClient::from_config(&config.provider, &config.http)
        .expect("Failed to create client");

    let result = client.get_markets(7).await;

    assert!(matches!(result, Err(RippleError::Decode { .. })));
}

#[tokio::test]
async fn test_crawl_to_file_sink() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/api/sports", catalogue()).await;
    mount_json(
        &mock_server,
        "/api/leagues/10/events",
        json!({ "events": [{ "id": 1, "name": "Arsenal - Chelsea", "kickoff": 0 }] }),
    )
    .await;
    mount_json(
        &mock_server,
        "/api/events/1/markets",
        json!({
            "markets": [{
                "name": "1X2",
                "open": true,
                "runners": [{ "id": 11, "name": "Home", "open": true, "priceStr": "1.85" }]
            }]
        }),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("lines.txt");
    let config = create_test_config(&mock_server.uri(), "Tennis, Football", 5);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let sink = FileSink::open(&out).await.expect("Failed to open file sink");

    coordinator.run(&sink).await.expect("Crawl failed");

    let content = std::fs::read_to_string(&out).expect("Failed to read output");
    assert!(content.starts_with("Football, England Premier League\n"));
    assert!(content.contains("\t\t\tHome, 1.85, 11\n"));
}
