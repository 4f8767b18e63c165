// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the release lookup using wiremock.

use rmm_rs::update::{
    GitHubReleases, ProbeOutcome, Release, ReleaseLookup, ReleaseSource, UpdateProbe,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LATEST_PATH: &str = "/repos/SutandoTsukai181/RyuModManager/releases/latest";

async fn mount_latest(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(LATEST_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

// =============================================================================
// GitHubReleases
// =============================================================================

#[tokio::test]
async fn test_latest_release_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LATEST_PATH))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v4.0.0",
            "name": "Ryu Mod Manager v4.0.0",
            "html_url": "https://github.com/SutandoTsukai181/RyuModManager/releases/tag/v4.0.0",
            "draft": false
        })))
        .mount(&server)
        .await;

    let source = GitHubReleases::new().with_api_base(server.uri());
    let lookup = source
        .latest_release("SutandoTsukai181", "RyuModManager")
        .await;

    assert_eq!(
        lookup,
        ReleaseLookup::Found(Release {
            tag: "v4.0.0".into(),
            name: "Ryu Mod Manager v4.0.0".into(),
            url: "https://github.com/SutandoTsukai181/RyuModManager/releases/tag/v4.0.0".into(),
        })
    );
}

#[tokio::test]
async fn test_null_release_name_is_empty() {
    let server = MockServer::start().await;
    mount_latest(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v4.0.0",
            "name": null,
            "html_url": "https://example.invalid"
        })),
    )
    .await;

    let source = GitHubReleases::new().with_api_base(server.uri());
    match source.latest_release("SutandoTsukai181", "RyuModManager").await {
        ReleaseLookup::Found(release) => assert!(release.name.is_empty()),
        other => panic!("Expected a release, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_release_is_no_release() {
    let server = MockServer::start().await;
    mount_latest(&server, ResponseTemplate::new(404)).await;

    let source = GitHubReleases::new().with_api_base(server.uri());
    let lookup = source
        .latest_release("SutandoTsukai181", "RyuModManager")
        .await;
    assert_eq!(lookup, ReleaseLookup::NoRelease);
}

#[tokio::test]
async fn test_http_errors_are_failures() {
    for status in [403, 500] {
        let server = MockServer::start().await;
        mount_latest(&server, ResponseTemplate::new(status)).await;

        let source = GitHubReleases::new().with_api_base(server.uri());
        match source.latest_release("SutandoTsukai181", "RyuModManager").await {
            ReleaseLookup::Failed(reason) => {
                assert!(reason.contains(&status.to_string()), "{reason}");
            }
            other => panic!("Expected failure for {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_malformed_body_is_failure() {
    let server = MockServer::start().await;
    mount_latest(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let source = GitHubReleases::new().with_api_base(server.uri());
    let lookup = source
        .latest_release("SutandoTsukai181", "RyuModManager")
        .await;
    assert!(matches!(lookup, ReleaseLookup::Failed(_)));
}

// =============================================================================
// UpdateProbe
// =============================================================================

#[tokio::test]
async fn test_probe_reports_newer_release() {
    let server = MockServer::start().await;
    mount_latest(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v99.0.0",
            "name": "Ryu Mod Manager v99.0.0",
            "html_url": "https://example.invalid/v99"
        })),
    )
    .await;

    let source = Arc::new(GitHubReleases::new().with_api_base(server.uri()));
    let outcome = UpdateProbe::spawn(source).join(Duration::from_secs(5)).await;

    match outcome {
        ProbeOutcome::UpdateAvailable { current, latest } => {
            assert_eq!(current, format!("v{}", env!("CARGO_PKG_VERSION")));
            assert_eq!(latest.tag, "v99.0.0");
        }
        other => panic!("Expected an update, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_times_out_on_slow_server() {
    let server = MockServer::start().await;
    mount_latest(
        &server,
        ResponseTemplate::new(200)
            .set_delay(Duration::from_secs(2))
            .set_body_json(json!({
                "tag_name": "v99.0.0",
                "name": "Ryu Mod Manager",
                "html_url": "https://example.invalid"
            })),
    )
    .await;

    let source = Arc::new(GitHubReleases::new().with_api_base(server.uri()));
    let outcome = UpdateProbe::spawn(source)
        .join(Duration::from_millis(100))
        .await;
    assert_eq!(outcome, ProbeOutcome::TimedOut);
}
