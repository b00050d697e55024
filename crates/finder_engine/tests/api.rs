use std::time::Duration;

use finder_core::{SearchItem, StageName, StageOutcome};
use finder_engine::{ApiSettings, FailureKind, PartsApi, ReqwestPartsApi};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer, token: Option<&str>) -> ReqwestPartsApi {
    ReqwestPartsApi::new(ApiSettings {
        base_url: format!("{}/api", server.uri()),
        bearer_token: token.map(str::to_string),
        ..ApiSettings::default()
    })
    .expect("valid settings")
}

fn record_json(id: u64, part: &str) -> serde_json::Value {
    json!({
        "id": id,
        "part_number": part,
        "manufacturer_name": "Texas Instruments",
        "created_at": "2024-05-01T10:00:00",
        "stage_history": null
    })
}

#[tokio::test]
async fn search_posts_items_and_stage_subset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(json!({
            "items": [{"part_number": "LM317T", "manufacturer_hint": "TI"}],
            "stages": ["googlesearch", "openai"],
            "debug": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "part_number": "LM317T",
                "manufacturer_name": "Texas Instruments",
                "confidence": 0.91,
                "search_stage": "openai",
                "stage_history": [
                    {"name": "googlesearch", "status": "low-confidence"},
                    {"name": "openai", "status": "success", "message": "ok"}
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Some("secret"));
    let items = vec![SearchItem::new("LM317T").with_hint("TI")];
    let results = api
        .search(&items, Some(&[StageName::GoogleSearch, StageName::OpenAi]))
        .await
        .expect("search ok");

    assert_eq!(results.len(), 1);
    assert!(results[0].found_manufacturer());
    assert_eq!(results[0].stage_history.len(), 2);
    assert_eq!(results[0].stage_history[1].status, StageOutcome::Success);
}

#[tokio::test]
async fn search_without_subset_omits_stages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, None);
    let results = api
        .search(&[SearchItem::new("X1")], None)
        .await
        .expect("search ok");
    assert!(results.is_empty());

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("stages").is_none());
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn unauthorized_status_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/parts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = api_for(&server, Some("stale"))
        .list_parts()
        .await
        .expect_err("should fail");
    assert_eq!(err.kind, FailureKind::Unauthorized);
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = api_for(&server, None)
        .search(&[SearchItem::new("X1")], None)
        .await
        .expect_err("should fail");
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn malformed_body_maps_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/parts"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let err = api_for(&server, None)
        .list_parts()
        .await
        .expect_err("should fail");
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/parts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let api = ReqwestPartsApi::new(ApiSettings {
        base_url: format!("{}/api", server.uri()),
        request_timeout: Some(Duration::from_millis(50)),
        ..ApiSettings::default()
    })
    .unwrap();
    let err = api.list_parts().await.expect_err("should time out");
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn list_and_create_parts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/parts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([record_json(1, "A1"), record_json(2, "B2")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/parts"))
        .and(body_partial_json(json!({"part_number": "C3"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(record_json(3, "C3")))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, None);
    let records = api.list_parts().await.expect("list ok");
    assert_eq!(records.len(), 2);
    assert!(records[0].stage_history.is_empty());

    let created = api.create_part(&SearchItem::new("C3")).await.expect("create ok");
    assert_eq!(created.id, 3);
}

#[tokio::test]
async fn delete_parts_issues_every_request_and_aggregates_failures() {
    let server = MockServer::start().await;
    for id in [1u64, 3] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/parts/{id}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/api/parts/2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = api_for(&server, None)
        .delete_parts(&[1, 2, 3])
        .await
        .expect_err("one deletion fails");
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert!(err.message.starts_with("1 of 3 deletions failed"));

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn delete_parts_succeeds_when_all_succeed() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    api_for(&server, None)
        .delete_parts(&[7, 8])
        .await
        .expect("all deleted");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestPartsApi::new(ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    })
    .expect_err("invalid");
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
