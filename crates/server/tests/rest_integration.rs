use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fleetwatch_server::auth::{create_token, Principal};
use fleetwatch_server::rest::{router, AppState};
use fleetwatch_server::store::InMemoryRuleStore;

const SECRET: &[u8] = b"test-secret";

fn app() -> Router {
    router(AppState::new(Arc::new(InMemoryRuleStore::new()), SECRET.to_vec()))
}

fn bearer(principal: &Principal) -> String {
    format!("Bearer {}", create_token(SECRET, principal, i64::MAX / 2))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    principal: Option<&Principal>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(p) = principal {
        req = req.header("authorization", bearer(p));
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_speed_rule(app: &Router, owner: &Principal) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/alert-rules",
        Some(owner),
        Some(json!({
            "name": "speed",
            "type": "overspeed",
            "threshold": 80,
            "vehicles": ["truck-1", "truck-2"],
            "notifications": { "email": ["ops@example.com"], "sms": false }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_is_public() {
    let (status, body) = call(&app(), "GET", "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn ready_returns_ok() {
    let (status, _) = call(&app(), "GET", "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn alert_rules_require_a_token() {
    let (status, body) = call(&app(), "GET", "/alert-rules", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let token = create_token(b"other-secret", &Principal::admin("a1"), i64::MAX / 2);
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/alert-rules")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_bad_request() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/alert-rules")
                .header("authorization", "Bearer garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_returns_201_and_ignores_owner_and_enabled_in_payload() {
    let app = app();
    let u1 = Principal::user("u1");
    let (status, body) = call(
        &app,
        "POST",
        "/alert-rules",
        Some(&u1),
        Some(json!({
            "name": "fuel",
            "type": "low_fuel",
            "threshold": 12.5,
            "vehicles": ["van-3"],
            "notifications": { "webhook": "https://hooks.example.com/fleet" },
            "createdBy": "someone-else",
            "enabled": false,
            "id": "chosen-by-client"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["createdBy"], "u1");
    assert_eq!(body["enabled"], true);
    assert_ne!(body["id"], "chosen-by-client");
    assert_eq!(body["type"], "low_fuel");
    assert_eq!(body["threshold"], 12.5);
    assert_eq!(body["vehicles"], json!(["van-3"]));
    assert_eq!(
        body["notifications"]["webhook"],
        "https://hooks.example.com/fleet"
    );
}

#[tokio::test]
async fn create_rejects_unparsable_body_with_error_json() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/alert-rules")
                .header("authorization", bearer(&Principal::user("u1")))
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_is_scoped_by_role() {
    let app = app();
    let u1 = Principal::user("u1");
    let u2 = Principal::user("u2");
    create_speed_rule(&app, &u1).await;
    create_speed_rule(&app, &u1).await;
    create_speed_rule(&app, &u2).await;

    let (_, mine) = call(&app, "GET", "/alert-rules", Some(&u1), None).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r["createdBy"] == "u1"));

    for privileged in [Principal::admin("a1"), Principal::superadmin("s1")] {
        let (status, all) = call(&app, "GET", "/alert-rules", Some(&privileged), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn owner_has_full_lifecycle_and_other_users_see_nothing() {
    let app = app();
    let u1 = Principal::user("u1");
    let u2 = Principal::user("u2");
    let id = create_speed_rule(&app, &u1).await;
    let item = format!("/alert-rules/{id}");
    let toggle = format!("/alert-rules/{id}/toggle");

    for (method, uri, body) in [
        ("GET", item.as_str(), None),
        ("PUT", item.as_str(), Some(json!({ "threshold": 1 }))),
        ("PATCH", toggle.as_str(), None),
        ("DELETE", item.as_str(), None),
    ] {
        let (status, resp) = call(&app, method, uri, Some(&u2), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(resp["error"], "Alert rule not found");
    }

    let (status, rule) = call(&app, "GET", &item, Some(&u1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rule["name"], "speed");
    assert_eq!(rule["threshold"], 80.0);

    let (status, rule) = call(
        &app,
        "PUT",
        &item,
        Some(&u1),
        Some(json!({ "threshold": 95 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rule["threshold"], 95.0);

    let (status, rule) = call(&app, "PATCH", &toggle, Some(&u1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rule["enabled"], false);

    let (status, body) = call(&app, "DELETE", &item, Some(&u1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = call(&app, "GET", &item, Some(&u1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// Update and toggle are owner-only even for privileged roles; reads and
// deletes are not. Pinned as-is.
#[tokio::test]
async fn admin_can_read_and_delete_but_not_update_or_toggle_others_rules() {
    let app = app();
    let u1 = Principal::user("u1");
    let a1 = Principal::admin("a1");
    let id = create_speed_rule(&app, &u1).await;
    let item = format!("/alert-rules/{id}");

    let (status, rule) = call(&app, "GET", &item, Some(&a1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rule["createdBy"], "u1");

    let (status, _) = call(&app, "PUT", &item, Some(&a1), Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "PATCH", &format!("{item}/toggle"), Some(&a1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, rule) = call(&app, "GET", &item, Some(&u1), None).await;
    assert_eq!(rule["name"], "speed");
    assert_eq!(rule["enabled"], true);

    let (status, body) = call(&app, "DELETE", &item, Some(&a1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn superadmin_deletes_any_rule() {
    let app = app();
    let id = create_speed_rule(&app, &Principal::user("u1")).await;
    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/alert-rules/{id}"),
        Some(&Principal::superadmin("root")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_missing_rule_is_404_for_every_role() {
    let app = app();
    for p in [
        Principal::user("u1"),
        Principal::admin("a1"),
        Principal::superadmin("s1"),
    ] {
        let (status, body) = call(&app, "DELETE", "/alert-rules/does-not-exist", Some(&p), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Alert rule not found");
    }
}

#[tokio::test]
async fn update_cannot_change_id_or_owner() {
    let app = app();
    let u1 = Principal::user("u1");
    let id = create_speed_rule(&app, &u1).await;

    let (status, rule) = call(
        &app,
        "PUT",
        &format!("/alert-rules/{id}"),
        Some(&u1),
        Some(json!({
            "id": "hijacked",
            "_id": "hijacked",
            "createdBy": "u2",
            "name": "speed-limit"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rule["id"], id.as_str());
    assert_eq!(rule["createdBy"], "u1");
    assert_eq!(rule["name"], "speed-limit");

    let (_, theirs) = call(&app, "GET", "/alert-rules", Some(&Principal::user("u2")), None).await;
    assert!(theirs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_leaves_unspecified_fields_alone() {
    let app = app();
    let u1 = Principal::user("u1");
    let id = create_speed_rule(&app, &u1).await;

    let (_, rule) = call(
        &app,
        "PUT",
        &format!("/alert-rules/{id}"),
        Some(&u1),
        Some(json!({ "vehicles": ["truck-9"], "enabled": false })),
    )
    .await;
    assert_eq!(rule["vehicles"], json!(["truck-9"]));
    assert_eq!(rule["enabled"], false);
    assert_eq!(rule["name"], "speed");
    assert_eq!(rule["type"], "overspeed");
    assert_eq!(rule["notifications"]["sms"], false);
}

#[tokio::test]
async fn toggle_twice_restores_enabled() {
    let app = app();
    let u1 = Principal::user("u1");
    let id = create_speed_rule(&app, &u1).await;
    let toggle = format!("/alert-rules/{id}/toggle");

    let (_, first) = call(&app, "PATCH", &toggle, Some(&u1), None).await;
    let (_, second) = call(&app, "PATCH", &toggle, Some(&u1), None).await;
    assert_eq!(first["enabled"], false);
    assert_eq!(second["enabled"], true);
}

#[tokio::test]
async fn metrics_count_requests_and_outcomes() {
    let app = app();
    let u1 = Principal::user("u1");
    create_speed_rule(&app, &u1).await;
    call(&app, "GET", "/alert-rules/missing", Some(&u1), None).await;

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("fleetwatch_rules_created_total 1"));
    assert!(text.contains("fleetwatch_rule_not_found_total 1"));
    assert!(text.contains("fleetwatch_rest_requests_total 3"));
}

#[tokio::test]
async fn numeric_string_threshold_is_accepted() {
    let app = app();
    let u1 = Principal::user("u1");
    let (status, created) = call(
        &app,
        "POST",
        "/alert-rules",
        Some(&u1),
        Some(json!({ "name": "speed", "type": "overspeed", "threshold": "80" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["threshold"], 80.0);

    let id = created["id"].as_str().unwrap();
    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/alert-rules/{id}"),
        Some(&u1),
        Some(json!({ "threshold": "95.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["threshold"], 95.5);
}

#[tokio::test]
async fn update_without_body_returns_rule_unchanged() {
    let app = app();
    let u1 = Principal::user("u1");
    let id = create_speed_rule(&app, &u1).await;
    let item = format!("/alert-rules/{id}");
    let (_, before) = call(&app, "GET", &item, Some(&u1), None).await;

    let (status, after) = call(&app, "PUT", &item, Some(&u1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, before);

    // still owner-scoped
    let (status, _) = call(&app, "PUT", &item, Some(&Principal::user("u2")), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_unparsable_body_is_client_error() {
    let app = app();
    let u1 = Principal::user("u1");
    let id = create_speed_rule(&app, &u1).await;
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/alert-rules/{id}"))
                .header("authorization", bearer(&u1))
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}
