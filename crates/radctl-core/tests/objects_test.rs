#![allow(clippy::unwrap_used)]
// Integration tests for the managed object kinds against a mocked RAD daemon.

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use radctl_core::{
    CoreError, Kstat, Property, Session, SessionConfig, ZfsDataset, Zone, ZoneManager, Zpool,
};

// ── Helpers ─────────────────────────────────────────────────────────

const ZONEMGR: &str = "/api/com.oracle.solaris.rad.zonemgr/1.6";
const ZFSMGR: &str = "/api/com.oracle.solaris.rad.zfsmgr/1.0";

async fn setup() -> (MockServer, TempDir, Session) {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig::from_url(&server.uri())
        .unwrap()
        .with_cache_dir(dir.path());
    let session = Session::new(config).unwrap();
    (server, dir, session)
}

fn success(payload: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "payload": payload }))
}

// ── Zones ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_zone_list_summaries() {
    let (server, _dir, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{ZONEMGR}/Zone")))
        .respond_with(success(json!([
            {
                "href": "api/com.oracle.solaris.rad.zonemgr/1.6/Zone/global",
                "Zone": {"id": 0, "name": "global", "brand": "solaris", "state": "running"}
            },
            {
                "href": "api/com.oracle.solaris.rad.zonemgr/1.6/Zone/web01",
                "Zone": {"id": -1, "name": "web01", "brand": "solaris", "state": "installed",
                         "auxstate": []}
            }
        ])))
        .mount(&server)
        .await;

    let zones = Zone::list(&session).await.unwrap();
    let names: Vec<_> = zones.iter().map(|z| z.summary().unwrap().name).collect();
    assert_eq!(names, vec!["global", "web01"]);
    assert_eq!(zones[1].summary().unwrap().state.as_deref(), Some("installed"));
}

#[tokio::test]
async fn test_zone_get_properties_builds_linked_tree() {
    let (server, _dir, session) = setup().await;
    let zone_path = format!("{ZONEMGR}/Zone/web01");

    Mock::given(method("GET"))
        .and(path(zone_path.clone()))
        .respond_with(success(json!({
            "href": "api/com.oracle.solaris.rad.zonemgr/1.6/Zone/web01",
            "Zone": {"name": "web01"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{zone_path}/_rad_method/getResources")))
        .and(body_json(json!({"scope": {"type": "anet"}})))
        .respond_with(success(json!([
            {"type": "mac", "parent": "anet,tmp-id=0", "properties": [
                {"name": "tmp-id", "value": "0"}
            ]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{zone_path}/_rad_method/getResources")))
        .and(body_json(json!({})))
        .respond_with(success(json!([
            {"type": "global", "properties": [
                {"name": "zonename", "value": "web01"},
                {"name": "zonepath", "value": "/system/zones/web01"},
                {"name": "autoboot", "value": "false"},
                {"name": "bootargs", "value": ""}
            ]},
            {"type": "anet", "properties": [
                {"name": "tmp-id", "value": "0"},
                {"name": "lower-link", "value": "auto"},
                {"name": "link-protection", "listvalue": ["mac-nospoof"]}
            ]},
            {"type": "dedicated-cpu", "properties": [
                {"name": "ncpus", "value": "1-4"}
            ]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let zone = Zone::get(&session, "web01").await.unwrap();
    let tree = zone.get_properties().await.unwrap();

    assert_eq!(
        tree.to_json(),
        json!({
            "zonename": "web01",
            "zonepath": "/system/zones/web01",
            "autoboot": false,
            "anet": [{
                "tmp-id": 0,
                "lower-link": "auto",
                "link-protection": ["mac-nospoof"],
                "mac": [{"tmp-id": 0}]
            }],
            "dedicated-cpu": {"ncpus": "1-4"}
        })
    );
}

#[tokio::test]
async fn test_zone_get_missing_is_not_found() {
    let (server, _dir, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{ZONEMGR}/Zone/ghost")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "object not found",
            "payload": null
        })))
        .mount(&server)
        .await;

    let err = Zone::get(&session, "ghost").await.unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}

#[tokio::test]
async fn test_zone_get_resource_properties_decodes_with_filter_schema() {
    let (server, _dir, session) = setup().await;
    let zone_path = format!("{ZONEMGR}/Zone/web01");

    Mock::given(method("GET"))
        .and(path(zone_path.clone()))
        .respond_with(success(json!({
            "href": "api/com.oracle.solaris.rad.zonemgr/1.6/Zone/web01",
            "Zone": {"name": "web01"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{zone_path}/_rad_method/getResourceProperties")))
        .and(body_json(json!({
            "filter": {"type": "capped-memory"},
            "properties": ["physical", "pagesize-policy"]
        })))
        .respond_with(success(json!([
            {"name": "physical", "value": "1073741824"},
            {"name": "pagesize-policy", "value": "largest-available"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let zone = Zone::get(&session, "web01").await.unwrap();
    let wanted = ["physical", "pagesize-policy"];
    let props = zone
        .get_resource_properties("capped-memory", Some(wanted.as_slice()))
        .await
        .unwrap();

    let names: Vec<_> = props.iter().map(Property::name).collect();
    assert_eq!(names, wanted);
    assert_eq!(props[0].value().as_i64(), Some(1_073_741_824));
    assert_eq!(props[1].value().as_str(), Some("largest-available"));
}

#[tokio::test]
async fn test_zone_get_resource_properties_unknown_type_sends_nothing() {
    let (server, _dir, session) = setup().await;
    let zone_path = format!("{ZONEMGR}/Zone/web01");

    Mock::given(method("GET"))
        .and(path(zone_path.clone()))
        .respond_with(success(json!({
            "href": "api/com.oracle.solaris.rad.zonemgr/1.6/Zone/web01",
            "Zone": {"name": "web01"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{zone_path}/_rad_method/getResourceProperties")))
        .respond_with(success(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let zone = Zone::get(&session, "web01").await.unwrap();
    let err = zone
        .get_resource_properties("flux-capacitor", None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, CoreError::UnknownResourceType { ref type_tag } if type_tag == "flux-capacitor"),
        "got: {err:?}"
    );
}

// ── Zone manager ────────────────────────────────────────────────────

async fn mount_zone_manager(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{ZONEMGR}/ZoneManager")))
        .respond_with(success(json!([
            {"href": "api/com.oracle.solaris.rad.zonemgr/1.6/ZoneManager/_rad_reference/2"}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_zone_manager_import_config() {
    let (server, _dir, session) = setup().await;
    mount_zone_manager(&server).await;

    Mock::given(method("PUT"))
        .and(path(format!(
            "{ZONEMGR}/ZoneManager/_rad_reference/2/_rad_method/importConfig"
        )))
        .and(body_json(json!({
            "noexecute": true,
            "name": "web02",
            "configuration": ["create -b\nset zonepath=/zones/web02"]
        })))
        .respond_with(success(json!({"code": "NONE"})))
        .expect(1)
        .mount(&server)
        .await;

    let manager = ZoneManager::open(&session).await.unwrap();
    manager
        .import_config(true, "web02", "create -b\nset zonepath=/zones/web02")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_zone_manager_create_failure_is_remote_error() {
    let (server, _dir, session) = setup().await;
    mount_zone_manager(&server).await;

    Mock::given(method("PUT"))
        .and(path(format!(
            "{ZONEMGR}/ZoneManager/_rad_reference/2/_rad_method/create"
        )))
        .and(body_json(json!({"name": "web01", "path": null, "template": "SYSdefault"})))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "method failure",
            "payload": {"code": "CONFIG_ERROR", "stderr": "zone web01 already exists"}
        })))
        .mount(&server)
        .await;

    let manager = ZoneManager::open(&session).await.unwrap();
    let err = manager
        .create("web01", None, Some("SYSdefault"))
        .await
        .unwrap_err();
    match err {
        CoreError::Api(radctl_core::api::Error::RemoteMethod { message, code, .. }) => {
            assert_eq!(message, "zone web01 already exists");
            assert_eq!(code.as_deref(), Some("CONFIG_ERROR"));
        }
        other => panic!("expected RemoteMethod, got {other:?}"),
    }
}

#[tokio::test]
async fn test_zone_manager_must_be_singleton() {
    let (server, _dir, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{ZONEMGR}/ZoneManager")))
        .respond_with(success(json!([])))
        .mount(&server)
        .await;

    let err = ZoneManager::open(&session).await.unwrap_err();
    assert!(matches!(err, CoreError::MalformedResponse { .. }), "got: {err:?}");
}

// ── ZFS ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dataset_properties_request_integer_values() {
    let (server, _dir, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{ZFSMGR}/ZfsDataset/rpool/export")))
        .respond_with(success(json!({
            "href": "api/com.oracle.solaris.rad.zfsmgr/1.0/ZfsDataset/rpool/export"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!(
            "{ZFSMGR}/ZfsDataset/rpool/export/_rad_method/get_props"
        )))
        .and(body_json(json!({"props": [
            {"name": "name"},
            {"name": "used", "integer_val": true},
            {"name": "mountpoint"}
        ]})))
        .respond_with(success(json!([
            {"name": "name", "value": "rpool/export"},
            {"name": "used", "value": "1073741824"},
            {"name": "mountpoint", "value": "/export"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dataset = ZfsDataset::get(&session, "rpool/export").await.unwrap();
    assert_eq!(dataset.name(), Some("rpool/export"));

    let props = dataset
        .get_properties(Some(&["mountpoint", "used", "name"]))
        .await
        .unwrap();
    assert_eq!(props.get("used").unwrap().unwrap().to_string(), "1.00 GB");
    assert_eq!(props.get("mountpoint").unwrap().unwrap().to_string(), "/export");
}

#[tokio::test]
async fn test_dataset_get_filesystems() {
    let (server, _dir, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{ZFSMGR}/ZfsDataset/rpool")))
        .respond_with(success(json!({
            "href": "api/com.oracle.solaris.rad.zfsmgr/1.0/ZfsDataset/rpool"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{ZFSMGR}/ZfsDataset/rpool/_rad_method/get_filesystems")))
        .and(body_json(json!({"recursive": true})))
        .respond_with(success(json!([
            {"href": "api/com.oracle.solaris.rad.zfsmgr/1.0/ZfsDataset/rpool/ROOT"},
            {"href": "api/com.oracle.solaris.rad.zfsmgr/1.0/ZfsDataset/rpool/export"}
        ])))
        .mount(&server)
        .await;

    let dataset = ZfsDataset::get(&session, "rpool").await.unwrap();
    let names = dataset.get_filesystems(true).await.unwrap();
    assert_eq!(names, vec!["rpool/ROOT", "rpool/export"]);
}

#[tokio::test]
async fn test_zpool_list_and_props() {
    let (server, _dir, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{ZFSMGR}/Zpool")))
        .respond_with(success(json!([
            {"href": "api/com.oracle.solaris.rad.zfsmgr/1.0/Zpool/rpool"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{ZFSMGR}/Zpool/rpool/_rad_method/get_props")))
        .respond_with(success(json!([
            {"name": "name", "value": "rpool"},
            {"name": "health", "value": "ONLINE"},
            {"name": "readonly", "value": "off"}
        ])))
        .mount(&server)
        .await;

    let pools = Zpool::list(&session).await.unwrap();
    assert_eq!(pools.len(), 1);
    let props = pools[0].get_properties(None).await.unwrap();
    assert_eq!(props.type_tag(), "zpool");
    assert_eq!(props.get("health").unwrap().unwrap().to_string(), "ONLINE");
    assert_eq!(props.get("readonly").unwrap().unwrap().value().as_bool(), Some(false));
}

// ── Kstat ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_kstat_get_map_by_uri() {
    let (server, _dir, session) = setup().await;
    let kstat_path = "/api/com.oracle.solaris.rad.kstat/2.0/Kstat/kstat%3A/system/cpu/0/sys";

    Mock::given(method("GET"))
        .and(path(kstat_path))
        .respond_with(success(json!({
            "href": "api/com.oracle.solaris.rad.kstat/2.0/Kstat/kstat%3A/system/cpu/0/sys"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{kstat_path}/_rad_method/getMap")))
        .respond_with(success(json!({
            "cpu_ticks_idle": {"name": "cpu_ticks_idle", "type": "UINT64", "integer": 1234},
            "crtime": {"name": "crtime", "type": "HRTIME", "integer": 99}
        })))
        .mount(&server)
        .await;

    let kstat = Kstat::get(&session, "kstat:/system/cpu/0/sys").await.unwrap();
    assert_eq!(kstat.uri(), Some("kstat:/system/cpu/0/sys"));

    let map = kstat.get_map().await.unwrap();
    let keys: Vec<_> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["cpu_ticks_idle", "crtime"]);
    assert_eq!(map["cpu_ticks_idle"].value(), json!(1234));
}

#[tokio::test]
async fn test_kstat_metadata_methods_return_raw_payloads() {
    let (server, _dir, session) = setup().await;
    let kstat_path = "/api/com.oracle.solaris.rad.kstat/2.0/Kstat/kstat%3A/system/cpu/0/sys";

    Mock::given(method("GET"))
        .and(path(kstat_path))
        .respond_with(success(json!({
            "href": "api/com.oracle.solaris.rad.kstat/2.0/Kstat/kstat%3A/system/cpu/0/sys"
        })))
        .mount(&server)
        .await;

    let flags = json!({"flags": ["KSTAT_FLAG_VIRTUAL"]});
    let map_metadata = json!({"cpu_ticks_idle": {"type": "UINT64", "units": "ticks"}});
    let nv_metadata = json!({"crtime": {"type": "HRTIME", "units": "nanoseconds"}});
    for (name, payload) in [
        ("getFlags", &flags),
        ("getMapMetadata", &map_metadata),
        ("getNvMetadata", &nv_metadata),
    ] {
        Mock::given(method("PUT"))
            .and(path(format!("{kstat_path}/_rad_method/{name}")))
            .and(body_json(json!({})))
            .respond_with(success(payload.clone()))
            .expect(1)
            .mount(&server)
            .await;
    }

    let kstat = Kstat::get(&session, "kstat:/system/cpu/0/sys").await.unwrap();
    assert_eq!(kstat.get_flags().await.unwrap(), flags);
    assert_eq!(kstat.get_map_metadata().await.unwrap(), map_metadata);
    assert_eq!(kstat.get_nv_metadata().await.unwrap(), nv_metadata);
}
