// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 用户服务的接口测试：直接调用 `Router::handle`，不经过网络。

use playground::services::users::{self, UserStore};
use playground::{HttpRequestMethod, Request, Response, Router};

use serde_json::{json, Value};

use std::sync::Arc;

fn seeded() -> (Router, Arc<UserStore>) {
    let store = Arc::new(UserStore::new());
    store.seed_samples();
    (users::router(Arc::clone(&store)), store)
}

fn call(router: &Router, request: Request) -> Response {
    router.handle(request, 0)
}

fn get(router: &Router, target: &str) -> Response {
    call(router, Request::new(HttpRequestMethod::Get, target))
}

fn body_json(response: &Response) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

#[test]
fn test_root_and_unknown_paths_say_hello() {
    let (router, _) = seeded();
    for path in ["/", "/does/not/exist", "/api"] {
        let response = get(&router, path);
        assert_eq!(response.status_code(), 200, "path {}", path);
        assert_eq!(response.body_text(), "Hello, World!\n");
    }
    // 任意方法都可以访问根路径
    let response = call(&router, Request::new(HttpRequestMethod::Delete, "/"));
    assert_eq!(response.body_text(), "Hello, World!\n");
}

#[test]
fn test_time_endpoint() {
    let (router, _) = seeded();
    let text = get(&router, "/time").body_text();
    assert!(text.starts_with("Current server time: "));
    assert!(text.ends_with(" GMT\n") || text.ends_with(" UTC\n"), "{}", text);
}

#[test]
fn test_info_reports_request_without_host_header() {
    let (router, _) = seeded();
    let request = Request::new(HttpRequestMethod::Get, "/info?x=1")
        .with_header("Host", "example.com")
        .with_header("User-Agent", "integration-test")
        .with_header("Accept", "text/plain");
    let response = call(&router, request);

    assert_eq!(response.header_value("content-type"), Some("text/plain"));
    let text = response.body_text();
    assert!(text.starts_with("Request Information:\n"));
    assert!(text.contains("  Method:     GET\n"));
    assert!(text.contains("  URL:        /info?x=1\n"));
    assert!(text.contains("  Path:       /info\n"));
    assert!(text.contains("  Host:       example.com\n"));
    assert!(text.contains("  User-Agent: integration-test\n"));
    let headers_line = text.lines().find(|l| l.starts_with("  Headers:")).unwrap();
    assert!(headers_line.contains("Accept:[text/plain]"));
    assert!(!headers_line.to_lowercase().contains("host:"));
}

#[test]
fn test_query_endpoint() {
    let (router, _) = seeded();
    let text = get(&router, "/query?name=John&age=30").body_text();
    assert!(text.starts_with("Query Parameters:\n  name: John\n  age:  30\n"));
    assert!(text.contains("  All params: map[age:[30] name:[John]]\n"));
    assert!(text.ends_with("\nTry: /query?name=John&age=30\n"));

    let text = get(&router, "/query").body_text();
    assert!(text.contains("  name: \n  age:  \n  All params: map[]\n"));
}

#[test]
fn test_list_users() {
    let (router, _) = seeded();
    let response = get(&router, "/api/users");
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header_value("content-type"), Some("application/json"));

    let users = body_json(&response);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], 1);
    assert_eq!(users[0]["name"], "Alice");
    assert_eq!(users[1]["email"], "bob@example.com");
    assert!(users[0]["created_at"].is_string());
}

#[test]
fn test_create_user() {
    let (router, store) = seeded();
    let request = Request::new(HttpRequestMethod::Post, "/api/users")
        .with_json(&json!({ "name": "Carol", "email": "carol@example.com" }));
    let response = call(&router, request);

    assert_eq!(response.status_code(), 201);
    let user = body_json(&response);
    assert_eq!(user["id"], 3);
    assert_eq!(user["name"], "Carol");
    assert_eq!(store.len(), 3);

    let listed = body_json(&get(&router, "/api/users"));
    assert_eq!(listed.as_array().unwrap().len(), 3);
}

#[test]
fn test_create_user_rejects_missing_fields() {
    let (router, store) = seeded();
    for body in [json!({ "name": "Dave" }), json!({ "email": "x@y" }), json!({})] {
        let request = Request::new(HttpRequestMethod::Post, "/api/users").with_json(&body);
        let response = call(&router, request);
        assert_eq!(response.status_code(), 400);
        assert_eq!(body_json(&response), json!({ "error": "Name and email are required" }));
    }
    assert_eq!(store.len(), 2);
}

#[test]
fn test_create_user_rejects_invalid_json() {
    let (router, store) = seeded();
    let request = Request::new(HttpRequestMethod::Post, "/api/users").with_body("{not json");
    let response = call(&router, request);

    assert_eq!(response.status_code(), 400);
    let error = body_json(&response)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Invalid JSON: "), "{}", error);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_method_not_allowed_on_users() {
    let (router, _) = seeded();
    let response = call(&router, Request::new(HttpRequestMethod::Delete, "/api/users"));
    assert_eq!(response.status_code(), 405);
    assert_eq!(body_json(&response), json!({ "error": "Method not allowed" }));
    let allow = response.allow().unwrap();
    assert!(allow.contains(&HttpRequestMethod::Get));
    assert!(allow.contains(&HttpRequestMethod::Post));
}

#[test]
fn test_cors_headers_and_preflight() {
    let (router, _) = seeded();
    let response = get(&router, "/api/users");
    assert_eq!(response.header_value("Access-Control-Allow-Origin"), Some("*"));

    let preflight = call(&router, Request::new(HttpRequestMethod::Options, "/api/users"));
    assert_eq!(preflight.status_code(), 200);
    assert_eq!(
        preflight.header_value("Access-Control-Allow-Methods"),
        Some("GET, POST, PUT, DELETE, OPTIONS")
    );
    assert!(preflight.body().is_empty());
}

#[test]
fn test_concurrent_creates_assign_unique_ids() {
    let store = Arc::new(UserStore::new());
    let router = Arc::new(users::router(Arc::clone(&store)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let router = Arc::clone(&router);
            std::thread::spawn(move || {
                let body = json!({ "name": format!("user{}", i), "email": format!("u{}@x", i) });
                let request = Request::new(HttpRequestMethod::Post, "/api/users").with_json(&body);
                let response = router.handle(request, i);
                assert_eq!(response.status_code(), 201);
                serde_json::from_slice::<Value>(response.body()).unwrap()["id"]
                    .as_u64()
                    .unwrap()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<u64>>());
    assert_eq!(store.len(), 8);
}
