//! Integration tests for hexapi CLI commands.
//!
//! Parses real command lines with clap and runs them against wiremock.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use hexapi::cli::{
    Cli, Commands, GeoStoreCommand, HeadFinderCommand, OneAtlasCommand, TaskingCommand, run,
};
use hexapi_client::ClientError;
use hexapi_core::{BoundingBox, ImageSize};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["hexapi"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

/// Command line pointed at the mock server with both keys set.
fn against(server: &MockServer, args: &[&str]) -> Cli {
    let uri = server.uri();
    let mut argv = vec![
        "--api-base",
        uri.as_str(),
        "--airbus-key",
        "cli-key",
        "--headfinder-key",
        "head-key",
    ];
    argv.extend_from_slice(args);
    parse(&argv)
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/realms/IDP/protocol/openid-connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

// =============================================================================
// PARSING TESTS
// =============================================================================

#[test]
fn test_oneatlas_search_flags_map_to_query() {
    let cli = parse(&[
        "oneatlas",
        "search",
        "--bbox",
        "-48.3,-16,-47.3,-15.5",
        "--constellation",
        "PHR",
        "--cloud-cover",
        "10",
        "--acquisition-date",
        "2018-01-01",
        "2018-02-01",
    ]);
    let Commands::OneAtlas {
        subcommand: OneAtlasCommand::Search(args),
    } = cli.command
    else {
        panic!("expected oneatlas search");
    };

    let query = args.to_query();
    assert_eq!(query.bbox, Some(BoundingBox::new(-48.3, -16.0, -47.3, -15.5)));
    assert_eq!(query.constellation, vec!["PHR".to_string()]);
    assert_eq!(query.cloud_cover, Some(10.0));
    assert_eq!(
        query.acquisition_date_range,
        Some(("2018-01-01".to_string(), "2018-02-01".to_string()))
    );
    // Untouched flags keep the catalogue defaults
    assert_eq!(query.processing_level, vec!["SENSOR", "ALBUM"]);
    assert_eq!(query.snow_cover, Some(100.0));
    assert_eq!(query.count, 20);
    assert_eq!(query.sort_key, "-acquisitionDate,cloudCover");
}

#[test]
fn test_invalid_bbox_is_rejected() {
    let result = Cli::try_parse_from(["hexapi", "oneatlas", "search", "--bbox", "1,2,3"]);
    assert!(result.is_err());
}

#[test]
fn test_repeated_date_range_is_rejected() {
    for command in [["oneatlas", "search"], ["geostore", "search"]] {
        let result = Cli::try_parse_from([
            "hexapi",
            command[0],
            command[1],
            "--acquisition-date",
            "2018-01-01",
            "2018-02-01",
            "--acquisition-date",
            "2019-01-01",
            "2019-02-01",
        ]);
        assert!(result.is_err(), "{command:?} accepted two date ranges");
    }

    let result = Cli::try_parse_from([
        "hexapi",
        "oneatlas",
        "search",
        "--publication-date",
        "2018-01-01",
        "2018-02-01",
        "--publication-date",
        "2019-01-01",
        "2019-02-01",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_geostore_quicklook_needs_exactly_one_source() {
    assert!(Cli::try_parse_from(["hexapi", "geostore", "quicklook"]).is_err());
    assert!(
        Cli::try_parse_from([
            "hexapi",
            "geostore",
            "quicklook",
            "--url",
            "http://x",
            "--feature-file",
            "f.json",
        ])
        .is_err()
    );

    let cli = parse(&["geostore", "quicklook", "--url", "http://x", "--size", "medium"]);
    let Commands::GeoStore {
        subcommand: GeoStoreCommand::Quicklook { source, size },
    } = cli.command
    else {
        panic!("expected geostore quicklook");
    };
    assert_eq!(source.url.as_deref(), Some("http://x"));
    assert_eq!(size, ImageSize::Medium);
}

#[test]
fn test_headfinder_flags_map_to_query() {
    let cli = parse(&[
        "headfinder",
        "search",
        "--satellites",
        "SuperView,Jilin",
        "--scene-name",
        "SV1",
        "--partial-match",
        "--cloud-cover",
        "0",
    ]);
    let Commands::HeadFinder {
        subcommand: HeadFinderCommand::Search(args),
    } = cli.command
    else {
        panic!("expected headfinder search");
    };

    let query = args.to_query();
    assert_eq!(query.satellites, vec!["SuperView", "Jilin"]);
    assert!(!query.scene_name_exact_match);
    assert_eq!(query.cloud_cover, 0);
    assert_eq!(query.incidence_angle, 60);
    assert_eq!(query.max_scenes, 50);
}

#[test]
fn test_tasking_list_contract_flag() {
    let cli = parse(&["tasking", "list", "--contract", "CIS-1"]);
    assert!(matches!(
        cli.command,
        Commands::Tasking {
            subcommand: TaskingCommand::List { contract: Some(ref id) }
        } if id == "CIS-1"
    ));
}

#[test]
fn test_global_flags_override_config() {
    let cli = parse(&[
        "--api-base",
        "http://localhost:9999/",
        "--airbus-key",
        "k",
        "--timeout",
        "5",
        "me",
    ]);
    let config = cli.client_config().unwrap();
    assert_eq!(config.airbus_api_key.as_deref(), Some("k"));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.endpoints.me_url(), "http://localhost:9999/api/v1/me");
    assert_eq!(
        config.endpoints.headfinder_search,
        "http://localhost:9999/search-ext-01/"
    );
}

// =============================================================================
// ACCOUNT COMMAND TESTS
// =============================================================================

#[tokio::test]
async fn test_token_command_reports_validity() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let output = run(&against(&server, &["token"])).await.unwrap();
    assert_eq!(output, json!({"valid": true}));
}

#[tokio::test]
async fn test_usage_command_without_limit() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"contract": {"id": "C"}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contracts/C/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": "s"}]})))
        .mount(&server)
        .await;

    let err = run(&against(&server, &["usage"])).await.unwrap_err();
    assert!(matches!(err, ClientError::NoLimitedSubscriptions));
}

#[tokio::test]
async fn test_missing_key_fails() {
    let cli = parse(&["--api-base", "http://localhost:1", "me"]);
    if cli.airbus_key.is_some() {
        // Key provided by the environment running the tests
        return;
    }
    let err = run(&cli).await.unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

// =============================================================================
// CATALOGUE COMMAND TESTS
// =============================================================================

#[tokio::test]
async fn test_oneatlas_search_command() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/opensearch"))
        .and(body_partial_json(json!({"constellation": "SPOT", "itemsPerPage": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResults": 0,
            "features": [],
        })))
        .mount(&server)
        .await;

    let output = run(&against(
        &server,
        &["oneatlas", "search", "--constellation", "SPOT", "--count", "5"],
    ))
    .await
    .unwrap();
    assert_eq!(output["totalResults"], 0);
}

#[tokio::test]
async fn test_oneatlas_tile_command_writes_file() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path(
            "/api/v1/items/abc/wmts/tiles/1.0.0/default/rgb/EPSG3857/3/2/1.png",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tile".to_vec()))
        .mount(&server)
        .await;

    let temp = create_temp_dir();
    let out = temp.path().join("tile.png");
    let output = run(&against(
        &server,
        &["oneatlas", "tile", "abc", "3", "2", "1", "--out", out.to_str().unwrap()],
    ))
    .await
    .unwrap();

    assert_eq!(output["bytes"], 4);
    assert_eq!(std::fs::read(&out).unwrap(), b"tile".to_vec());
}

#[tokio::test]
async fn test_oneatlas_quicklook_from_feature_file() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/thumb/1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpg".to_vec()))
        .mount(&server)
        .await;

    let temp = create_temp_dir();
    let feature_file = temp.path().join("feature.json");
    let feature = json!({
        "properties": {"id": "1"},
        "_links": {"thumbnail": {"href": format!("{}/thumb/1.jpg", server.uri())}},
    });
    std::fs::write(&feature_file, feature.to_string()).unwrap();

    let output = run(&against(
        &server,
        &[
            "--download-dir",
            temp.path().to_str().unwrap(),
            "oneatlas",
            "quicklook",
            "--feature-file",
            feature_file.to_str().unwrap(),
        ],
    ))
    .await
    .unwrap();

    let written = output["path"].as_str().unwrap();
    assert!(written.starts_with(temp.path().to_str().unwrap()));
    assert_eq!(std::fs::read(written).unwrap(), b"jpg".to_vec());
}

#[tokio::test]
async fn test_tasking_list_single_contract() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/CIS-7/taskings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": "t1"}]})))
        .mount(&server)
        .await;

    let output = run(&against(&server, &["tasking", "list", "--contract", "CIS-7"]))
        .await
        .unwrap();
    assert_eq!(
        output,
        json!([{"contract": "CIS-7", "taskings": {"items": [{"id": "t1"}]}}])
    );
}

#[tokio::test]
async fn test_headfinder_search_command() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search-ext-01/"))
        .and(query_param("user", "head-key"))
        .and(query_param("scenenamematch", "exact"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"&jsonscenelist=[{"id":1}]&hits=1"#),
        )
        .mount(&server)
        .await;

    let output = run(&against(&server, &["headfinder", "search"]))
        .await
        .unwrap();
    assert_eq!(output, json!({"scenes": [{"id": 1}], "hits": 1}));
}
