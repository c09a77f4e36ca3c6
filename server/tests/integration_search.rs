use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use search_server::{build_app, AppConfig};
use serde_json::Value;
use std::fs;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const DOCS: &str = r#"{"id": 1, "text": "cat in the city", "ratings": [2, 3, 3]}
{"id": 2, "text": "dog in the city of Moscow", "ratings": [4, 5, 3]}
{"id": 3, "text": "cat and dog in the city with mayor rat", "ratings": [5, 5, 5]}
{"id": 4, "text": "cat in the city of Beijing of China country", "status": "banned", "ratings": [3, 3, 4]}
"#;

fn build_tiny_app(admin_token: Option<&str>) -> (TempDir, Router) {
    build_app_with(DOCS, admin_token)
}

fn build_app_with(docs: &str, admin_token: Option<&str>) -> (TempDir, Router) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("docs.jsonl");
    fs::write(&path, docs).unwrap();
    let config = AppConfig {
        documents: Some(path),
        stop_words: "in the".into(),
        admin_token: admin_token.map(String::from),
    };
    (dir, build_app(config).unwrap())
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn result_ids(json: &Value) -> Vec<i64> {
    json["results"].as_array().unwrap().iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (_dir, app) = build_tiny_app(None);
    let (status, json) = get(app.clone(), "/search?q=fluffy%20cat").await;
    assert_eq!(status, StatusCode::OK);
    // doc 4 is banned, the default filter keeps actual documents only
    assert_eq!(result_ids(&json), vec![1, 3]);

    let (_, json) = get(app.clone(), "/search?q=city&status=banned").await;
    assert_eq!(result_ids(&json), vec![4]);

    let (_, json) = get(app, "/search?q=city&min_rating=5").await;
    assert_eq!(result_ids(&json), vec![3]);
}

#[tokio::test]
async fn total_hits_counts_matches_beyond_top_five() {
    let docs: String = (0..8).map(|i| format!("{{\"id\": {i}, \"text\": \"cat x{i}\"}}\n")).collect();
    let (_dir, app) = build_app_with(&docs, None);
    let (status, json) = get(app, "/search?q=cat").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 8);
    assert_eq!(json["results"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn malformed_query_is_bad_request() {
    let (_dir, app) = build_tiny_app(None);
    let (status, json) = get(app, "/search?q=cat%20--city").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_query");
}

#[tokio::test]
async fn match_endpoint() {
    let (_dir, app) = build_tiny_app(None);
    let (status, json) = get(app.clone(), "/match?q=cat%20dog%20fox&id=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["words"], serde_json::json!(["cat", "dog"]));
    assert_eq!(json["status"], "actual");

    let (_, json) = get(app.clone(), "/match?q=cat%20-rat&id=3").await;
    assert_eq!(json["words"], serde_json::json!([]));

    let (status, json) = get(app, "/match?q=cat&id=99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn document_positions() {
    let (_dir, app) = build_tiny_app(None);
    let (_, json) = get(app.clone(), "/documents/count").await;
    assert_eq!(json["count"], 4);
    let (_, json) = get(app.clone(), "/documents/at/2").await;
    assert_eq!(json["id"], 3);
    let (status, _) = get(app, "/documents/at/4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn post_document(token: Option<&str>, body: &str) -> Request<Body> {
    let mut req = Request::post("/documents").header("content-type", "application/json");
    if let Some(t) = token {
        req = req.header("X-ADMIN-TOKEN", t);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn add_document_requires_token() {
    let (_dir, app) = build_tiny_app(Some("secret"));
    let doc = r#"{"id": 5, "text": "fluffy parrot"}"#;

    let (status, _) = call(app.clone(), post_document(None, doc)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = call(app.clone(), post_document(Some("secret"), doc)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["id"], 5);

    let (status, json) = call(app.clone(), post_document(Some("secret"), doc)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_argument");

    let (_, json) = get(app, "/search?q=parrot").await;
    assert_eq!(result_ids(&json), vec![5]);
}
