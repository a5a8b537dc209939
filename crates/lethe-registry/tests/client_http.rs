//! HTTP-level tests for the registry client against a mock registry.

use chrono::{TimeZone, Utc};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lethe_registry::{RegistryAuth, RegistryClient, RegistryConfig, RegistryError};

const DIGEST: &str = "sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7";
const CONFIG_DIGEST: &str =
    "sha256:1a8b0e6c5c2e8f0f7c4b7a9e2d9b8c7a6e5d4c3b2a190817263544536271809f";

async fn client_for(server: &MockServer) -> RegistryClient {
    RegistryClient::new(RegistryConfig::new(server.uri())).unwrap()
}

fn manifest_body() -> serde_json::Value {
    serde_json::json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
        "config": {
            "mediaType": "application/vnd.docker.container.image.v1+json",
            "size": 7023,
            "digest": CONFIG_DIGEST
        },
        "layers": []
    })
}

#[tokio::test]
async fn lists_repositories_from_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "repositories": ["team/api", "team/web"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repos = client_for(&server).await.list_repositories().await.unwrap();
    assert_eq!(repos, vec!["team/api", "team/web"]);
}

#[tokio::test]
async fn lists_tags_for_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/team/api/tags/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "team/api",
            "tags": ["v2", "v1", "latest"]
        })))
        .mount(&server)
        .await;

    let tags = client_for(&server).await.list_tags("team/api").await.unwrap();
    assert_eq!(tags, vec!["v2", "v1", "latest"]);
}

#[tokio::test]
async fn content_digest_comes_from_response_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/team/api/manifests/v1"))
        .and(header(
            "accept",
            "application/vnd.docker.distribution.manifest.v2+json",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Docker-Content-Digest", DIGEST)
                .set_body_json(manifest_body()),
        )
        .mount(&server)
        .await;

    let digest = client_for(&server)
        .await
        .tag_content_digest("team/api", "v1")
        .await
        .unwrap();
    assert_eq!(digest, DIGEST);
}

#[tokio::test]
async fn missing_content_digest_header_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/team/api/manifests/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest_body()))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .tag_content_digest("team/api", "v1")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::MissingContentDigest { .. }));
}

#[tokio::test]
async fn created_at_resolves_manifest_then_config_blob() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/team/api/manifests/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Docker-Content-Digest", DIGEST)
                .set_body_json(manifest_body()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/team/api/blobs/{CONFIG_DIGEST}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "architecture": "amd64",
            "created": "2024-03-01T10:30:00Z",
            "os": "linux"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .await
        .tag_created_at("team/api", "v1")
        .await
        .unwrap();
    assert_eq!(created, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());
}

#[tokio::test]
async fn delete_targets_the_digest_url() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v2/team/api/manifests/{DIGEST}")))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .delete_manifest("team/api", DIGEST)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_failure_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v2/team/api/manifests/{DIGEST}")))
        .respond_with(ResponseTemplate::new(405).set_body_string("deletion disabled"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .delete_manifest("team/api", DIGEST)
        .await
        .unwrap_err();
    match err {
        RegistryError::Http { status, message } => {
            assert_eq!(status, 405);
            assert_eq!(message, "deletion disabled");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_success_catalog_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .list_repositories()
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Http { status: 500, .. }));
}

#[tokio::test]
async fn malformed_body_is_a_distinct_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .list_repositories()
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::MalformedResponse { .. }));
}

#[tokio::test]
async fn basic_auth_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "repositories": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = RegistryConfig::new(server.uri())
        .with_auth(RegistryAuth::basic("user", "pass"));
    let client = RegistryClient::new(config).unwrap();
    let repos = client.list_repositories().await.unwrap();
    assert!(repos.is_empty());
}
