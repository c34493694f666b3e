use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use metrodesk_core::config::DeskConfig;
use metrodesk_core::gateway::{Backend, Gateway};
use metrodesk_core::profile::{keys, ProfileStore};
use metrodesk_core::session::Session;
use metrodesk_core::signal::{Signal, SignalBus};
use metrodesk_core::DeskError;

// Serves a stub backend on an ephemeral port, returns its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn desk(base: String, dir: &Path) -> (Arc<Session>, Arc<SignalBus>, Gateway) {
    let config = DeskConfig {
        api_base: base,
        profile_dir: dir.to_path_buf(),
        request_timeout_ms: 2_000,
        feedback_poll_secs: 30,
        idle_timeout_secs: 600,
        display_limit: 5,
    };
    let profile = Arc::new(ProfileStore::new(dir).expect("profile store"));
    let session = Arc::new(Session::new(Arc::clone(&profile)));
    let bus = Arc::new(SignalBus::new());
    let gateway = Gateway::new(&config, Arc::clone(&session), Arc::clone(&bus)).expect("gateway");
    (session, bus, gateway)
}

#[tokio::test]
async fn bearer_credential_rides_every_request() {
    let app = Router::new().route(
        "/whoami",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Json(json!({ "auth": auth }))
        }),
    );
    let base = serve(app).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (session, _bus, gateway) = desk(base, dir.path());

    // Signed out: no Authorization header at all
    let v = gateway.get("/whoami").await.expect("get");
    assert_eq!(v["auth"], "");

    session.store_token("tok-123").await.expect("store");
    let v = gateway.get("/whoami").await.expect("get");
    assert_eq!(v["auth"], "Bearer tok-123");
}

#[tokio::test]
async fn unauthorized_drops_the_credential_and_signals() {
    let app = Router::new().route(
        "/admin/customers",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "ok": false, "message": "jwt expired" })),
            )
        }),
    );
    let base = serve(app).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (session, bus, gateway) = desk(base, dir.path());
    session.store_token("stale").await.expect("store");
    let (_sub, mut rx) = bus.subscribe(Signal::SessionExpired);

    let err = gateway.get("/admin/customers").await.expect_err("401");
    assert!(matches!(err, DeskError::Unauthorized));

    // Credential is gone from memory and from disk
    assert!(session.token().await.is_none());
    let profile = ProfileStore::new(dir.path()).expect("profile");
    assert!(!profile.contains(keys::ADMIN_TOKEN));

    // Exactly one expiry signal for one 401
    let got = tokio::time::timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("timeout")
        .expect("channel closed");
    assert_eq!(got, Signal::SessionExpired);
    assert!(rx.try_recv().is_err(), "only one signal expected");
}

#[tokio::test]
async fn failure_status_carries_the_backend_message() {
    let app = Router::new().route(
        "/admin/stations",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "ok": false, "error": { "message": "Mã ga đã tồn tại" } })),
            )
        }),
    );
    let base = serve(app).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (_session, _bus, gateway) = desk(base, dir.path());

    let err = gateway
        .post("/admin/stations", json!({ "code": "BT" }))
        .await
        .expect_err("422");
    match err {
        DeskError::ApiError { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Mã ga đã tồn tại");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn failure_without_json_reports_the_bare_status() {
    let app = Router::new().route(
        "/admin/audit",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(app).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (_session, _bus, gateway) = desk(base, dir.path());

    let err = gateway.get("/admin/audit").await.expect_err("500");
    match err {
        DeskError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "HTTP 500");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_body_reads_as_null() {
    let app = Router::new().route(
        "/admin/stations/BT",
        delete(|| async { StatusCode::NO_CONTENT }),
    );
    let base = serve(app).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (_session, _bus, gateway) = desk(base, dir.path());

    let v = gateway.delete("/admin/stations/BT").await.expect("delete");
    assert_eq!(v, Value::Null);
}

#[tokio::test]
async fn json_body_is_posted_verbatim() {
    let app = Router::new().route(
        "/echo",
        post(|Json(body): Json<Value>| async move { Json(json!({ "echo": body })) }),
    );
    let base = serve(app).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (_session, _bus, gateway) = desk(base, dir.path());

    let v = gateway
        .post("/echo", json!({ "status": false, "stops": 13 }))
        .await
        .expect("post");
    assert_eq!(v["echo"]["status"], false);
    assert_eq!(v["echo"]["stops"], 13);
}
