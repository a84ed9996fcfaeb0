// tests/http_api.rs

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tvdeploy::fs::mock::MockFileSystem;
use tvdeploy::orchestrator::Orchestrator;
use tvdeploy::server::build_router;
use tvdeploy_test_utils::{failed, init_tracing, mock_project, ok, ConfigBuilder, FakeRunner};

const BOUNDARY: &str = "tvdeploy-test-boundary";

fn router(runner: &FakeRunner, fs: &MockFileSystem) -> Router {
    let cfg = ConfigBuilder::new()
        .with_default_tools()
        .upload_dir("/uploads")
        .build();
    let orchestrator = Orchestrator::new(&cfg, Arc::new(runner.clone()), Arc::new(fs.clone()));
    build_router(orchestrator, cfg.server.max_upload_bytes)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart body with text fields and an optional file part.
fn multipart(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, contents)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/deploy")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(router, request).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let app = router(&FakeRunner::new(), &MockFileSystem::new());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send_json(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_connection_success_is_200() {
    init_tracing();
    let runner = FakeRunner::new().on("connect", ok("connected to 192.168.1.50:26101"));
    let app = router(&runner, &MockFileSystem::new());

    let (status, body) = send_json(
        app,
        post_json("/api/test-connection", json!({ "ipAddress": "192.168.1.50" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Successfully connected to TV");
    assert_eq!(body["logs"]["connect"]["output"], "connected to 192.168.1.50:26101");
    assert!(body.get("kind").is_none());
}

#[tokio::test]
async fn test_connection_missing_ip_is_400() {
    let runner = FakeRunner::new();
    let app = router(&runner, &MockFileSystem::new());

    let (status, body) = send_json(app, post_json("/api/test-connection", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing required field: ipAddress");
    assert!(body.get("logs").is_none());
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_connection_failure_is_500_with_logs() {
    let runner = FakeRunner::new().on("connect", failed("", "error: unknown host"));
    let app = router(&runner, &MockFileSystem::new());

    let (status, body) = send_json(
        app,
        post_json(
            "/api/test-connection",
            json!({ "ipAddress": "10.0.0.9", "bridgeToolPath": "/opt/sdb" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to connect to TV");
    assert_eq!(body["logs"]["connect"]["error"], "error: unknown host");
    assert_eq!(runner.calls()[0].program, "/opt/sdb");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let runner = FakeRunner::new();
    let app = router(&runner, &MockFileSystem::new());

    let request = Request::builder()
        .method("POST")
        .uri("/api/run")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn generate_with_invalid_project_is_400_with_details() {
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    fs.add_file("/work/app/config.xml", b"<widget/>".to_vec());
    let app = router(&runner, &fs);

    let (status, body) = send_json(
        app,
        post_json("/api/generate-wgt", json!({ "projectPath": "/work/app" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Tizen project structure");
    assert_eq!(body["details"], "Missing required files: index.html, .tproject");
    assert_eq!(body["projectPath"], "/work/app");
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn generate_returns_package_path() {
    let runner = FakeRunner::new()
        .on("build-web", ok("built"))
        .on("package", ok("Package File Location: /work/app/App.wgt"));
    let fs = MockFileSystem::new();
    mock_project(&fs, "/work/app");
    let app = router(&runner, &fs);

    let (status, body) = send_json(
        app,
        post_json(
            "/api/generate-wgt",
            json!({ "projectPath": "/work/app", "tizenPath": "/opt/tizen" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["packagePath"], "/work/app/App.wgt");
    assert_eq!(runner.calls()[0].program, "/opt/tizen");
}

#[tokio::test]
async fn run_logs_keep_execution_order() {
    init_tracing();
    let runner = FakeRunner::new()
        .on("package", ok("Package File Location: /work/app/App.wgt"))
        .on("connect", ok("connected to 192.168.1.50:26101"))
        .on("install", ok("Installed the package: Id(com.sample.app)"))
        .on("run", ok("launched"));
    let fs = MockFileSystem::new();
    mock_project(&fs, "/work/app");
    let app = router(&runner, &fs);

    let (status, raw) = send(
        app,
        post_json(
            "/api/run",
            json!({ "projectPath": "/work/app", "ipAddress": "192.168.1.50" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let pos = |key: &str| raw.find(&format!("\"{key}\":{{")).unwrap();
    assert!(pos("package") < pos("connect"));
    assert!(pos("connect") < pos("install"));
    assert!(pos("install") < pos("run"));

    let body: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(body["data"]["packageId"], "com.sample.app");
}

#[tokio::test]
async fn deploy_accepts_multipart_upload() {
    init_tracing();
    let runner = FakeRunner::new()
        .on("connect", ok("connected"))
        .on("install", ok("Installed the package: Id(com.sample.app)"))
        .on("run", ok("launched"));
    let fs = MockFileSystem::new();
    let app = router(&runner, &fs);

    let request = multipart(
        &[("ipAddress", "192.168.1.50"), ("sdbPath", "/opt/sdb")],
        Some(("MyApp.wgt", b"PK\x03\x04")),
    );
    let (status, body) = send_json(app, request).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Application deployed and launched successfully");
    assert_eq!(body["data"]["ipAddress"], "192.168.1.50");
    assert_eq!(body["data"]["fileName"], "MyApp.wgt");
    assert_eq!(body["data"]["packageId"], "com.sample.app");

    let saved = fs.file_paths();
    assert_eq!(saved.len(), 1);
    assert_eq!(body["data"]["savedFilePath"], saved[0].to_string_lossy().to_string());
    assert_eq!(fs.contents(&saved[0]).unwrap(), b"PK\x03\x04".to_vec());
    assert_eq!(runner.calls()[0].program, "/opt/sdb");
    assert!(body["logs"]["launch"].is_object());
}

#[tokio::test]
async fn deploy_without_file_is_400() {
    let runner = FakeRunner::new();
    let app = router(&runner, &MockFileSystem::new());

    let (status, body) =
        send_json(app, multipart(&[("ipAddress", "192.168.1.50")], None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required field: file");
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn deploy_with_wrong_extension_is_400() {
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    let app = router(&runner, &fs);

    let request = multipart(
        &[("ipAddress", "192.168.1.50")],
        Some(("notes.txt", b"hello")),
    );
    let (status, body) = send_json(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please upload a valid .wgt file");
    assert!(fs.file_paths().is_empty());
}

#[tokio::test]
async fn deploy_write_failure_is_500() {
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    fs.fail_writes(true);
    let app = router(&runner, &fs);

    let request = multipart(
        &[("ipAddress", "192.168.1.50")],
        Some(("MyApp.wgt", b"PK")),
    );
    let (status, body) = send_json(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error deploying application");
    assert!(body["error"].as_str().unwrap().contains("Upload error"));
    assert_eq!(runner.call_count(), 0);
}
