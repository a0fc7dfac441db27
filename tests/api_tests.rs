//! HTTP API tests using axum-test

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::mocks::{
    plan_json, report_json, trends_json, Script, ScriptedRunner, PLANNER, SEARCH, TRENDS_WRITER,
    WRITER,
};
use delve::api::routes::create_router;
use delve::research::{ResearchManager, ResearchSettings};
use delve::{AppState, ConfigManager, DelveConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const API_KEY: &str = "integration-key";

fn create_test_server(runner: ScriptedRunner) -> TestServer {
    let state = AppState {
        config_manager: Arc::new(ConfigManager::from_config(DelveConfig::default())),
        manager: Arc::new(ResearchManager::new(
            Arc::new(runner),
            ResearchSettings::default(),
        )),
        api_key: Arc::from(API_KEY),
    };
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn scripted() -> ScriptedRunner {
    ScriptedRunner::new()
        .on(PLANNER, Script::ok(plan_json(&["a", "b"])))
        .on(SEARCH, Script::text("found"))
        .on(WRITER, Script::ok(report_json("API summary")))
        .on(TRENDS_WRITER, Script::ok(trends_json("api", 10)))
}

async fn wait_completed(server: &TestServer, id: &str) -> Value {
    for _ in 0..500 {
        let response = server
            .get(&format!("/research/{}", id))
            .add_header("x-api-key", API_KEY)
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        if body["status"] == "completed" || body["status"] == "error" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("research {} did not finish", id);
}

#[tokio::test]
async fn test_root_and_health_are_public() {
    let server = create_test_server(scripted());

    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["modes"], json!(["report", "trends"]));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_openapi_document_lists_research_routes() {
    let server = create_test_server(scripted());

    let response = server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert!(body["paths"]["/research"]["post"].is_object());
    assert!(body["paths"]["/research/{id}/trends"]["get"].is_object());
}

#[tokio::test]
async fn test_missing_api_key_is_unauthorized() {
    let server = create_test_server(scripted());

    let response = server
        .post("/research")
        .json(&json!({"query": "edge AI"}))
        .await;
    response.assert_status_unauthorized();
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_wrong_api_key_is_forbidden() {
    let server = create_test_server(scripted());

    let response = server
        .get("/research/anything")
        .add_header("x-api-key", "wrong-key")
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_legacy_header_is_accepted() {
    let server = create_test_server(scripted());

    let response = server
        .post("/research")
        .add_header("research_api_key", API_KEY)
        .json(&json!({"query": "edge AI"}))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_submit_report_and_fetch_it() {
    let server = create_test_server(scripted());

    let response = server
        .post("/research")
        .add_header("x-api-key", API_KEY)
        .json(&json!({"query": "edge AI", "callback_url": "http://example.com/hook"}))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "processing");
    assert!(body["trace_id"].as_str().unwrap().starts_with("trace_"));
    let id = body["research_id"].as_str().unwrap().to_string();

    let record = wait_completed(&server, &id).await;
    assert_eq!(record["status"], "completed");
    assert_eq!(record["progress"], 100);
    assert_eq!(record["mode"], "report");
    assert_eq!(record["trace_id"], body["trace_id"]);

    let response = server
        .get(&format!("/research/{}/report", id))
        .add_header("x-api-key", API_KEY)
        .await;
    response.assert_status_ok();
    let report = response.json::<Value>();
    assert_eq!(report["research_id"], id.as_str());
    assert_eq!(report["summary"], "API summary");
    assert!(report["report"].as_str().unwrap().starts_with("# API summary"));
    assert_eq!(report["follow_up_questions"].as_array().unwrap().len(), 2);

    let response = server
        .get(&format!("/research/{}/trends", id))
        .add_header("x-api-key", API_KEY)
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_submit_trends_and_fetch_them() {
    let server = create_test_server(scripted());

    let response = server
        .post("/research")
        .add_header("x-api-key", API_KEY)
        .json(&json!({"query": "api", "mode": "trends"}))
        .await;
    response.assert_status_ok();
    let id = response.json::<Value>()["research_id"]
        .as_str()
        .unwrap()
        .to_string();

    wait_completed(&server, &id).await;

    let response = server
        .get(&format!("/research/{}/trends", id))
        .add_header("x-api-key", API_KEY)
        .await;
    response.assert_status_ok();
    let trends = response.json::<Value>();
    assert_eq!(trends["topic"], "api");
    assert_eq!(trends["trends"].as_array().unwrap().len(), 10);
    assert_eq!(trends["summary"], "api is moving fast");
}

#[tokio::test]
async fn test_invalid_mode_is_bad_request() {
    let server = create_test_server(scripted());

    let response = server
        .post("/research")
        .add_header("x-api-key", API_KEY)
        .json(&json!({"query": "edge AI", "mode": "summary"}))
        .await;
    response.assert_status_bad_request();
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("summary"));
}

#[tokio::test]
async fn test_empty_query_is_bad_request() {
    let server = create_test_server(scripted());

    let response = server
        .post("/research")
        .add_header("x-api-key", API_KEY)
        .json(&json!({"query": ""}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_unknown_research_is_not_found() {
    let server = create_test_server(scripted());

    for path in [
        "/research/missing",
        "/research/missing/report",
        "/research/missing/trends",
    ] {
        let response = server.get(path).add_header("x-api-key", API_KEY).await;
        response.assert_status_not_found();
    }
}

#[tokio::test]
async fn test_report_before_completion_is_bad_request() {
    let runner = ScriptedRunner::new()
        .on(PLANNER, Script::ok(plan_json(&["slow"])))
        .on(SEARCH, Script::text("late").with_delay(500));
    let server = create_test_server(runner);

    let response = server
        .post("/research")
        .add_header("x-api-key", API_KEY)
        .json(&json!({"query": "slow topic"}))
        .await;
    let id = response.json::<Value>()["research_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .get(&format!("/research/{}/report", id))
        .add_header("x-api-key", API_KEY)
        .await;
    response.assert_status_bad_request();
}
