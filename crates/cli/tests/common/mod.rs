//! Mock filing-status service shared by the binary-level tests.
//!
//! Runs on its own thread and runtime so plain `#[test]` functions can point
//! a spawned `gstn` process at it through `GSTN_API_URL`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Path to a shared fixture under crates/core/tests/fixtures.
pub fn fixture(name: &str) -> PathBuf {
    workspace_root()
        .join("crates/core/tests/fixtures")
        .join(name)
}

/// Start the mock service and return its base URL.
///
/// - `POST /status`: GSTINs starting with `33` get HTTP 500; every other
///   GSTIN has GSTR1 filed for April and nothing else.
/// - `POST /slow`: answers after ten seconds.
pub fn start_mock_remote() -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("mock runtime");
        rt.block_on(async move {
            let app = Router::new()
                .route("/status", post(status))
                .route("/slow", post(slow));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind mock");
            tx.send(listener.local_addr().expect("mock addr"))
                .expect("report mock addr");
            axum::serve(listener, app).await.expect("mock server");
        });
    });
    let addr = rx.recv().expect("mock started");
    format!("http://{}", addr)
}

async fn status(Json(body): Json<Value>) -> Response {
    let gstin = body["gstin"].as_str().unwrap_or_default();
    if gstin.starts_with("33") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response();
    }
    Json(json!({
        "gstn": gstin,
        "businessUnit": "Head Office",
        "status": "Success",
        "filingStatus": [[
            {
                "fy": "2024-2025",
                "taxp": "April",
                "mof": "ONLINE",
                "dof": "11-05-2024",
                "rtntype": "GSTR1",
                "arn": "AA290424123456X",
                "status": "Filed"
            },
            {
                "fy": "2024-2025",
                "taxp": "March",
                "mof": "ONLINE",
                "dof": "20-04-2024",
                "rtntype": "GSTR3B",
                "arn": "AA290324654321Y",
                "status": "Filed"
            }
        ]]
    }))
    .into_response()
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(10)).await;
    Json(json!({"filingStatus": []})).into_response()
}
