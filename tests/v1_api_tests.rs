mod common;

use axum::http::StatusCode;
use common::{TestApp, bam, basic, bearer};
use serde_json::json;

#[tokio::test]
async fn test_login_requires_basic_auth() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/Services/REST/v1/login", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Basic authentication required");

    let (status, body) = app
        .send("GET", "/Services/REST/v1/login", Some(&basic("alice", "")), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = app
        .send("GET", "/Services/REST/v1/login", Some("Basic %%%"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication failed");
}

#[tokio::test]
async fn test_login_returns_token_and_expiry() {
    let app = TestApp::new();
    let (status, body) = app
        .send("GET", "/Services/REST/v1/login", Some(&basic("alice", "secret")), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert!(body["expires"].is_string());
    assert_eq!(app.store.sessions.len(), 1);
}

#[tokio::test]
async fn test_protected_endpoints_reject_bad_tokens() {
    let app = TestApp::new();

    let (status, body) = app
        .send("GET", "/Services/REST/v1/getZonesByHint?hint=queue", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid authentication header");

    let (status, body) = app
        .send(
            "GET",
            "/Services/REST/v1/getZonesByHint?hint=queue",
            Some(&bam("not-a-token")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_zones_by_hint_accepts_both_token_schemes() {
    let app = TestApp::new();
    let token = app.login().await;

    for auth in [bam(&token), bearer(&token)] {
        let (status, body) = app
            .send(
                "GET",
                "/Services/REST/v1/getZonesByHint?hint=queue",
                Some(&auth),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": 100001, "name": "queue.core.windows.net"},
                {"id": 100002, "name": "privatelink.queue.core.windows.net"}
            ])
        );
    }
}

#[tokio::test]
async fn test_add_host_record_validation() {
    let app = TestApp::new();
    let auth = bam(&app.login().await);

    let (status, body) = app
        .send(
            "POST",
            "/Services/REST/v1/addHostRecord",
            Some(&auth),
            Some(json!({"name": "srv1", "type": "A", "parentId": 100003})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: rdata");

    let (status, body) = app
        .send(
            "POST",
            "/Services/REST/v1/addHostRecord",
            Some(&auth),
            Some(json!({"name": "srv1", "type": "A", "rdata": "1.2.3.4", "parentId": 999})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid zone ID");

    let (status, body) = app
        .send_raw("POST", "/Services/REST/v1/addHostRecord", Some(&auth), "{not json")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert!(app.store.records.is_empty());
}

#[tokio::test]
async fn test_add_update_and_list_host_records() {
    let app = TestApp::new();
    let auth = bam(&app.login().await);

    let (status, body) = app
        .send(
            "POST",
            "/Services/REST/v1/addHostRecord",
            Some(&auth),
            Some(json!({"name": "srv1", "type": "A", "rdata": "1.2.3.4", "parentId": 100003, "ttl": 600})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Record created successfully");
    let id = body["id"].as_u64().unwrap();
    assert!(id >= 200001);

    let (status, body) = app
        .send(
            "PUT",
            "/Services/REST/v1/update",
            Some(&auth),
            Some(json!({"id": id, "rdata": "5.6.7.8"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Record updated successfully");

    let (status, body) = app
        .send(
            "GET",
            "/Services/REST/v1/getHostRecordsByHint?hint=SRV1.example",
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], id);
    assert_eq!(records[0]["name"], "srv1");
    assert_eq!(records[0]["rdata"], "5.6.7.8");
    assert_eq!(records[0]["ttl"], 600);
    assert_eq!(records[0]["zone"], "example.com");
    assert_eq!(records[0]["parentId"], 100003);
    assert!(records[0]["updated"].is_string());
}

#[tokio::test]
async fn test_update_errors() {
    let app = TestApp::new();
    let auth = bam(&app.login().await);

    let (status, body) = app
        .send("PUT", "/Services/REST/v1/update", Some(&auth), Some(json!({"rdata": "x"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Record ID is required");

    let (status, body) = app
        .send("PUT", "/Services/REST/v1/update", Some(&auth), Some(json!({"id": 123})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Record not found");
}

#[tokio::test]
async fn test_delete_record() {
    let app = TestApp::new();
    let auth = bam(&app.login().await);

    let (status, body) = app
        .send("DELETE", "/Services/REST/v1/delete", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "objectId parameter is required");

    let (status, body) = app
        .send("DELETE", "/Services/REST/v1/delete?objectId=abc", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid objectId");

    // Well-formed integers that address no record are not found, not invalid
    for object_id in ["200001", "-1", "99999999999999999999999"] {
        let (status, body) = app
            .send(
                "DELETE",
                &format!("/Services/REST/v1/delete?objectId={}", object_id),
                Some(&auth),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Record not found");
    }

    let (_, body) = app
        .send(
            "POST",
            "/Services/REST/v1/addHostRecord",
            Some(&auth),
            Some(json!({"name": "gone", "type": "A", "rdata": "1.1.1.1", "parentId": 100003})),
        )
        .await;
    let id = body["id"].as_u64().unwrap();

    let (status, body) = app
        .send(
            "DELETE",
            &format!("/Services/REST/v1/delete?objectId={}", id),
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Record deleted successfully");
    assert!(app.store.records.is_empty());
}

#[tokio::test]
async fn test_quick_deploy() {
    let app = TestApp::new();
    let auth = bam(&app.login().await);

    let (status, body) = app
        .send("POST", "/Services/REST/v1/quickDeploy", Some(&auth), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "entityId is required");

    let (status, body) = app
        .send(
            "POST",
            "/Services/REST/v1/quickDeploy",
            Some(&auth),
            Some(json!({"entityId": 100003})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Configuration deployed successfully");
    assert!(body["deploymentId"].is_string());
}

#[tokio::test]
async fn test_logout_invalidates_token_for_either_scheme() {
    let app = TestApp::new();

    for scheme in [bam as fn(&str) -> String, bearer] {
        let token = app.login().await;
        let (status, body) = app
            .send("GET", "/Services/REST/v1/logout", Some(&scheme(&token)), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Logged out successfully");

        let (status, _) = app
            .send(
                "GET",
                "/Services/REST/v1/getZonesByHint",
                Some(&scheme(&token)),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    assert!(app.store.sessions.is_empty());
}

#[tokio::test]
async fn test_repeated_query_parameter_uses_first_value() {
    let app = TestApp::new();
    let auth = bam(&app.login().await);

    let (status, body) = app
        .send(
            "GET",
            "/Services/REST/v1/getZonesByHint?hint=privatelink&hint=example",
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 100002, "name": "privatelink.queue.core.windows.net"}])
    );

    app.send(
        "POST",
        "/Services/REST/v1/addHostRecord",
        Some(&auth),
        Some(json!({"name": "srv1", "type": "A", "rdata": "1.2.3.4", "parentId": 100003})),
    )
    .await;

    let (status, body) = app
        .send(
            "GET",
            "/Services/REST/v1/getHostRecordsByHint?hint=srv1&hint=nothing",
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(
            "DELETE",
            "/Services/REST/v1/delete?objectId=200001&objectId=abc",
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Record deleted successfully");
}
