//! Integration tests for the analysis API
//!
//! These tests serve the production router on an ephemeral port and drive
//! it over HTTP, with wiremock standing in for the technology lookup API
//! and the analyzed website.

use serde_json::{json, Value};
use stacksight::analysis::{
    AnalysisService, ApiTechnologyLookup, JobStore, LinkCounter, MockTechnologyLookup,
    TechnologyLookup,
};
use stacksight::server::router;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves the API on an ephemeral port and returns its base URL
async fn spawn_app(lookup: Arc<dyn TechnologyLookup>, pacing: Duration) -> String {
    let service = AnalysisService::new(
        JobStore::new(),
        lookup,
        Arc::new(LinkCounter::new(Duration::from_secs(2)).expect("failed to build link counter")),
        pacing,
    );

    let app = router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server crashed");
    });

    format!("http://{}", addr)
}

/// Serves the API with the mock lookup and a pacing delay long enough that
/// jobs stay in `analyzing` for the duration of the test
async fn spawn_app_with_pending_jobs() -> String {
    spawn_app(Arc::new(MockTechnologyLookup), Duration::from_secs(30)).await
}

/// Polls the fetch-by-id endpoint until the job leaves `analyzing`
async fn wait_for_terminal(client: &reqwest::Client, base: &str, id: &str) -> Value {
    for _ in 0..500 {
        let body: Value = client
            .get(format!("{}/api/analysis/{}", base, id))
            .send()
            .await
            .expect("poll request failed")
            .json()
            .await
            .expect("poll response was not JSON");

        if body["data"]["status"] != "analyzing" {
            return body["data"].clone();
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never reached a terminal state", id);
}

#[tokio::test]
async fn test_health_endpoint() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/health", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Stacksight backend is running");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_submit_valid_url() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["url"], "https://example.com");
    assert_eq!(body["data"]["status"], "analyzing");
    assert_eq!(body["data"]["technologies"], json!([]));
    assert_eq!(body["data"]["linkCount"], 0);
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());
    // Terminal fields are absent on a fresh job
    assert!(body["data"].get("completedAt").is_none());
    assert!(body["data"].get("error").is_none());
}

#[tokio::test]
async fn test_submit_normalizes_url_without_scheme() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({ "url": "example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["url"], "https://example.com");
}

#[tokio::test]
async fn test_submit_rejects_missing_url() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "URL is required");
    assert_eq!(body["code"], "MISSING_URL");
}

#[tokio::test]
async fn test_submit_rejects_non_string_url() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({ "url": 123 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "URL must be a string");
    assert_eq!(body["code"], "INVALID_URL_TYPE");
}

#[tokio::test]
async fn test_submit_rejects_invalid_url_format() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({ "url": "not-a-url" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_URL_FORMAT");
}

#[tokio::test]
async fn test_get_analysis_by_id() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["data"]["id"].as_str().unwrap();

    let response = client
        .get(format!("{}/api/analysis/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["url"], "https://example.com");
    assert_eq!(body["data"]["status"], "analyzing");
}

#[tokio::test]
async fn test_get_unknown_analysis_returns_not_found() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/analysis/non-existent-id", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Analysis not found");
    assert_eq!(body["code"], "ANALYSIS_NOT_FOUND");
}

#[tokio::test]
async fn test_list_empty() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/api/analyses", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["meta"]["stats"]["total"], 0);
    assert_eq!(body["meta"]["stats"]["completed"], 0);
    assert_eq!(body["meta"]["stats"]["analyzing"], 0);
    assert_eq!(body["meta"]["stats"]["failed"], 0);
}

#[tokio::test]
async fn test_list_returns_jobs_newest_first() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    for i in 1..=3 {
        client
            .post(format!("{}/api/analyze", base))
            .json(&json!({ "url": format!("https://example{}.com", i) }))
            .send()
            .await
            .unwrap();
    }

    let body: Value = client
        .get(format!("{}/api/analyses", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["url"], "https://example3.com");
    assert_eq!(data[1]["url"], "https://example2.com");
    assert_eq!(data[2]["url"], "https://example1.com");

    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["stats"]["analyzing"], 3);
}

#[tokio::test]
async fn test_list_pagination() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    for i in 1..=5 {
        client
            .post(format!("{}/api/analyze", base))
            .json(&json!({ "url": format!("https://example{}.com", i) }))
            .send()
            .await
            .unwrap();
    }

    let body: Value = client
        .get(format!("{}/api/analyses?limit=3&offset=1", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    // 2nd through 4th newest
    assert_eq!(data[0]["url"], "https://example4.com");
    assert_eq!(data[1]["url"], "https://example3.com");
    assert_eq!(data[2]["url"], "https://example2.com");

    assert_eq!(body["meta"]["limit"], 3);
    assert_eq!(body["meta"]["offset"], 1);
    assert_eq!(body["meta"]["total"], 5);
}

#[tokio::test]
async fn test_list_rejects_invalid_pagination() {
    let base = spawn_app_with_pending_jobs().await;
    let client = reqwest::Client::new();

    for query in ["limit=-1", "limit=0", "limit=abc"] {
        let response = client
            .get(format!("{}/api/analyses?{}", base, query))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "query {:?}", query);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], "INVALID_LIMIT", "query {:?}", query);
    }

    let response = client
        .get(format!("{}/api/analyses?offset=-1", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_OFFSET");
}

#[tokio::test]
async fn test_analysis_completes_end_to_end() {
    // The analyzed site has three links on its landing page
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="/a">A</a>
                <a href="/b">B</a>
                <a href="/c">C</a>
            </body></html>"#,
        ))
        .mount(&site)
        .await;

    // The lookup API reports two technologies
    let lookup_api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{
                "Result": {
                    "Paths": [{
                        "Technologies": [
                            { "Name": "React", "Tag": "JavaScript Frameworks" },
                            { "Name": "Nginx", "Tag": "Web Servers" }
                        ]
                    }]
                }
            }]
        })))
        .mount(&lookup_api)
        .await;

    let lookup = ApiTechnologyLookup::new(lookup_api.uri(), "test-key".to_string()).unwrap();
    let base = spawn_app(Arc::new(lookup), Duration::from_millis(10)).await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({ "url": site.uri() }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["data"]["id"].as_str().unwrap();

    let job = wait_for_terminal(&client, &base, id).await;

    assert_eq!(job["status"], "completed");
    assert_eq!(job["linkCount"], 3);
    assert_eq!(job["technologies"][0]["name"], "React");
    assert_eq!(job["technologies"][1]["name"], "Nginx");
    assert!(job["completedAt"].is_string());
    assert!(job.get("error").is_none());
}

#[tokio::test]
async fn test_lookup_failure_surfaces_via_polling() {
    let lookup_api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&lookup_api)
        .await;

    let lookup = ApiTechnologyLookup::new(lookup_api.uri(), "test-key".to_string()).unwrap();
    let base = spawn_app(Arc::new(lookup), Duration::from_millis(10)).await;
    let client = reqwest::Client::new();

    // Submission itself succeeds; the failure is only visible later
    let created: Value = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["data"]["status"], "analyzing");

    let id = created["data"]["id"].as_str().unwrap();
    let job = wait_for_terminal(&client, &base, id).await;

    assert_eq!(job["status"], "failed");
    assert!(job["error"].as_str().unwrap().contains("500"));
    assert_eq!(job["technologies"], json!([]));
    assert_eq!(job["linkCount"], 0);
    assert!(job["completedAt"].is_string());
}
