#![allow(clippy::unwrap_used)]
// Integration tests for `Session` and `RadObject` using wiremock.

use std::time::{Duration, SystemTime};

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use radctl_api::{
    Error, Interface, Lookup, RadObject, Session, SessionConfig, SessionState, TlsMode,
};

// ── Helpers ─────────────────────────────────────────────────────────

const SESSION_PATH: &str = "/api/com.oracle.solaris.rad.authentication/1.0/Session";
const REFERENCE_HREF: &str = "api/com.oracle.solaris.rad.authentication/1.0/Session/_rad_reference/1024";

struct Dataset;

impl Interface for Dataset {
    const NAMESPACE: &'static str = "com.oracle.solaris.rad.zfsmgr";
    const API_VERSION: &'static str = "1.0";
    const COLLECTION: &'static str = "ZfsDataset";
}

async fn setup() -> (MockServer, TempDir, SessionConfig) {
    let server = MockServer::start().await;
    let cache_dir = tempfile::tempdir().unwrap();
    let config = SessionConfig::from_url(&server.uri())
        .unwrap()
        .with_cache_dir(cache_dir.path().join("rad"));
    (server, cache_dir, config)
}

fn password() -> SecretString {
    "s3cret".to_string().into()
}

async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .and(body_partial_json(json!({
            "username": "root",
            "scheme": "pam",
            "preserve": true,
            "timeout": -1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "payload": { "href": REFERENCE_HREF }
        })))
        .mount(server)
        .await;
}

async fn logged_in(config: &SessionConfig, server: &MockServer) -> Session {
    mount_login_ok(server).await;
    let mut session = Session::new(config.clone()).unwrap();
    session
        .login("root", &password(), TlsMode::DangerAcceptInvalid)
        .await
        .unwrap();
    session
}

fn dataset_path(suffix: &str) -> String {
    format!("/api/com.oracle.solaris.rad.zfsmgr/1.0/ZfsDataset{suffix}")
}

// ── Login & cache ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_writes_cache() {
    let (server, _dir, config) = setup().await;
    let session = logged_in(&config, &server).await;

    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.reference_id(), Some(1024));
    assert_eq!(session.href().to_string(), REFERENCE_HREF);

    let cache = std::fs::read_to_string(session.cache_path()).unwrap();
    let cache: serde_json::Value = serde_json::from_str(&cache).unwrap();
    assert_eq!(cache["version"], "1.0.0");
    assert_eq!(cache["reference_id"], 1024);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(session.cache_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[tokio::test]
async fn test_login_failure_leaves_no_cache() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "authentication failed",
            "payload": null
        })))
        .mount(&server)
        .await;

    let mut session = Session::new(config.clone()).unwrap();
    let result = session
        .login("root", &password(), TlsMode::DangerAcceptInvalid)
        .await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(session.reference_id(), None);
    assert!(!config.cache_path().exists());
}

#[tokio::test]
async fn test_login_reply_without_reference_is_auth_error() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("POST"))
        .and(path(SESSION_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "payload": { "href": "api/com.oracle.solaris.rad.authentication/1.0/Session/root" }
        })))
        .mount(&server)
        .await;

    let mut session = Session::new(config.clone()).unwrap();
    let result = session
        .login("root", &password(), TlsMode::DangerAcceptInvalid)
        .await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert_eq!(session.reference_id(), None);
    assert!(!config.cache_path().exists());
}

#[tokio::test]
async fn test_cached_session_is_verified_and_reused() {
    let (server, _dir, config) = setup().await;
    logged_in(&config, &server).await.close();

    Mock::given(method("GET"))
        .and(path(format!("/{REFERENCE_HREF}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "payload": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::open(config).await.unwrap();
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.reference_id(), Some(1024));
}

#[tokio::test]
async fn test_cached_session_without_liveness_check_is_cached() {
    let (server, _dir, config) = setup().await;
    logged_in(&config, &server).await.close();

    let session = Session::open(config.with_verify_cached(false)).await.unwrap();
    assert_eq!(session.state(), SessionState::Cached);
    assert_eq!(session.reference_id(), Some(1024));
}

#[tokio::test]
async fn test_failed_liveness_check_marks_session_stale() {
    let (server, _dir, config) = setup().await;
    logged_in(&config, &server).await.close();

    Mock::given(method("GET"))
        .and(path(format!("/{REFERENCE_HREF}")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let session = Session::open(config).await.unwrap();
    assert_eq!(session.state(), SessionState::Stale);
    assert_eq!(session.reference_id(), None);
}

#[tokio::test]
async fn test_expired_cache_is_not_reused() {
    let (server, _dir, config) = setup().await;
    let config = config.with_max_session_time(Duration::from_secs(60));
    logged_in(&config, &server).await.close();

    let an_hour_ago = SystemTime::now() - Duration::from_secs(3600);
    std::fs::File::options()
        .write(true)
        .open(config.cache_path())
        .unwrap()
        .set_modified(an_hour_ago)
        .unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/{REFERENCE_HREF}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = Session::open(config).await.unwrap();
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(session.reference_id(), None);
}

#[tokio::test]
async fn test_reset_removes_cache() {
    let (server, _dir, config) = setup().await;
    let mut session = logged_in(&config, &server).await;
    assert!(config.cache_path().exists());

    session.reset().unwrap();
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(!config.cache_path().exists());
}

// ── Object resolution ───────────────────────────────────────────────

#[tokio::test]
async fn test_list_objects_keeps_server_order() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("GET"))
        .and(path(dataset_path("")))
        .and(query_param("_rad_detail", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "payload": [
                {
                    "href": "api/com.oracle.solaris.rad.zfsmgr/1.0/ZfsDataset/rpool",
                    "ZfsDataset": { "name": "rpool" }
                },
                {
                    "href": "api/com.oracle.solaris.rad.zfsmgr/1.0/ZfsDataset/rpool/ROOT",
                    "ZfsDataset": { "name": "rpool/ROOT" }
                }
            ]
        })))
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let items = session
        .list_objects(&RadObject::<Dataset>::collection(), true)
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().map(|o| o.instance_id().unwrap()).collect();
    assert_eq!(ids, vec!["rpool", "rpool/ROOT"]);
    assert_eq!(items[1].payload().unwrap()["name"], "rpool/ROOT");
    assert!(items[0].session().is_some());
}

#[tokio::test]
async fn test_list_on_instance_fails_without_request() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let result = session
        .list_objects(&RadObject::<Dataset>::instance("rpool"), true)
        .await;

    assert!(
        matches!(result, Err(Error::InvalidScope { operation: "list", .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_failure_is_request_failed() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("GET"))
        .and(path(dataset_path("")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "not authorized",
            "payload": null
        })))
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let err = session
        .list_objects(&RadObject::<Dataset>::collection(), true)
        .await
        .unwrap_err();
    match err {
        Error::RequestFailed { status, .. } => assert_eq!(status, "not authorized"),
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_object_by_name_encodes_instance() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("GET"))
        .and(path(dataset_path("/rpool/data")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "payload": {
                "href": "api/com.oracle.solaris.rad.zfsmgr/1.0/ZfsDataset/rpool/data",
                "ZfsDataset": { "name": "rpool/data" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let dataset = session
        .get_object(
            &RadObject::<Dataset>::collection(),
            Some(&Lookup::name("rpool/data")),
            true,
        )
        .await
        .unwrap();

    assert_eq!(dataset.instance_id(), Some("rpool/data"));
    assert_eq!(dataset.payload().unwrap()["name"], "rpool/data");
}

#[tokio::test]
async fn test_get_object_escapes_reserved_characters() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("GET"))
        .and(path(dataset_path("/tank/with%20space")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "payload": { "ZfsDataset": { "name": "tank/with space" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let dataset = session
        .get_object(&RadObject::<Dataset>::instance("tank/with space"), None, true)
        .await
        .unwrap();
    assert_eq!(dataset.instance_id(), Some("tank/with space"));
}

#[tokio::test]
async fn test_get_object_not_found() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("GET"))
        .and(path(dataset_path("/nope")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "object not found",
            "payload": null
        })))
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let err = session
        .get_object(&RadObject::<Dataset>::instance("nope"), None, true)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}

#[tokio::test]
async fn test_get_object_on_collection_without_lookup_fails() {
    let (_server, _dir, config) = setup().await;
    let session = Session::new(config).unwrap();
    let result = session
        .get_object(&RadObject::<Dataset>::collection(), Some(&Lookup::default()), true)
        .await;
    assert!(
        matches!(result, Err(Error::InvalidScope { operation: "get", .. })),
        "got: {result:?}"
    );
}

// ── Remote methods ──────────────────────────────────────────────────

#[tokio::test]
async fn test_rad_method_returns_payload() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("PUT"))
        .and(path(dataset_path("/rpool/_rad_method/get_filesystems")))
        .and(body_partial_json(json!({ "recursive": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "payload": ["rpool", "rpool/ROOT"]
        })))
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let dataset = RadObject::<Dataset>::instance("rpool").attach(&session);
    let payload = dataset
        .rad_method("get_filesystems", &json!({ "recursive": true }))
        .await
        .unwrap();
    assert_eq!(payload, json!(["rpool", "rpool/ROOT"]));
}

#[tokio::test]
async fn test_rad_method_failure_carries_stderr() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("PUT"))
        .and(path(dataset_path("/rpool/_rad_method/get_props")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "method failure",
            "payload": { "code": 7, "stderr": "permission denied" }
        })))
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let dataset = RadObject::<Dataset>::instance("rpool").attach(&session);
    let err = dataset
        .rad_method("get_props", &json!({ "props": [] }))
        .await
        .unwrap_err();

    assert_eq!(err.remote_code(), Some("7"));
    match err {
        Error::RemoteMethod {
            method, message, ..
        } => {
            assert_eq!(method, "get_props");
            assert_eq!(message, "permission denied");
        }
        other => panic!("expected RemoteMethod, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rad_method_not_found() {
    let (server, _dir, config) = setup().await;

    Mock::given(method("PUT"))
        .and(path(dataset_path("/gone/_rad_method/get_props")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "object not found",
            "payload": null
        })))
        .mount(&server)
        .await;

    let session = Session::new(config).unwrap();
    let dataset = RadObject::<Dataset>::instance("gone").attach(&session);
    let err = dataset.rad_method("get_props", &json!({})).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got: {err:?}");
}
