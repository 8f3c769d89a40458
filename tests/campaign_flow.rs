//! End-to-end campaign tests against a mocked Graph API
//!
//! Drives the real `GraphClient` through `CampaignRunner` and checks the
//! requests made, the counters reported and the events emitted.

use pagepurge::activity::ActivityLog;
use pagepurge::campaign::{
    CampaignError, CampaignEvent, CampaignRequest, CampaignRunner, CampaignStatus, ChannelObserver,
    EngineSettings, NoopObserver,
};
use pagepurge::graph::{AccessToken, GraphClient};
use pagepurge::resource::ResourceKind;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runner(server: &MockServer) -> CampaignRunner<GraphClient> {
    let client = GraphClient::new(&server.uri(), "v18.0", Duration::from_secs(5)).unwrap();
    CampaignRunner::new(
        client,
        EngineSettings {
            delay: Duration::ZERO,
            page_limit: 2,
        },
    )
}

fn request() -> CampaignRequest {
    CampaignRequest::new(ResourceKind::Post, "1234", AccessToken::new("page-token"))
}

async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v18.0/1234/posts"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "a"}, {"id": "b"}],
            "paging": {"cursors": {"after": "C1"}}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v18.0/1234/posts"))
        .and(query_param("after", "C1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "c"}]
        })))
        .mount(server)
        .await;
}

async fn mount_delete(server: &MockServer, id: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("DELETE"))
        .and(path(format!("/v18.0/{}", id)))
        .and(query_param("access_token", "page-token"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_campaign_walks_all_pages() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;
    mount_delete(&server, "a", 200, json!({"success": true})).await;
    mount_delete(
        &server,
        "b",
        400,
        json!({"error": {"message": "Object cannot be deleted", "code": 100}}),
    )
    .await;
    mount_delete(&server, "c", 200, json!({"success": true})).await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut observer = ChannelObserver::new(tx);
    let report = runner(&server)
        .run(request(), &CancellationToken::new(), &mut observer)
        .await
        .expect("campaign should complete");

    assert_eq!(report.status, CampaignStatus::Completed);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.progress.total, 3);
    assert_eq!(report.progress.processed, 3);
    assert_eq!(report.progress.succeeded, 2);
    assert_eq!(report.progress.failed, 1);
    assert_eq!(report.summary_line(), "Done! Deleted 2 posts, 1 failed");

    // The activity log sees the same story
    let mut log = ActivityLog::default();
    while let Ok(event) = rx.try_recv() {
        log.record_event(&event);
    }
    let messages: Vec<String> = log.entries().map(|e| e.message.clone()).collect();
    assert!(messages.contains(&"Deleted post a".to_string()));
    assert!(messages.iter().any(|m| m.contains("Object cannot be deleted")));
    assert_eq!(messages.last().unwrap(), "Finished! Deleted: 2, failed: 1");
}

#[tokio::test]
async fn test_stop_after_first_item() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;
    mount_delete(&server, "a", 200, json!({"success": true})).await;

    Mock::given(method("DELETE"))
        .and(path("/v18.0/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    let mut observer = move |event: &CampaignEvent| {
        if let CampaignEvent::ItemFinished { item_id, .. } = event {
            if item_id == "a" {
                stopper.cancel();
            }
        }
    };

    let report = runner(&server)
        .run(request(), &cancel, &mut observer)
        .await
        .unwrap();

    assert_eq!(report.status, CampaignStatus::Stopped);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.progress.processed, 1);
    assert_eq!(report.progress.total, 2);
    assert!(report.summary_line().starts_with("Stopped by user"));
}

#[tokio::test]
async fn test_listing_rejection_fails_campaign() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v18.0/1234/posts"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "a"}],
            "paging": {"cursors": {"after": "C1"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v18.0/1234/posts"))
        .and(query_param("after", "C1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "(#4) Application request limit reached", "code": 4}
        })))
        .mount(&server)
        .await;
    mount_delete(&server, "a", 200, json!({"success": true})).await;

    let err = runner(&server)
        .run(request(), &CancellationToken::new(), &mut NoopObserver)
        .await
        .unwrap_err();

    match err {
        CampaignError::Failed { source, report } => {
            assert!(source.to_string().contains("request limit"));
            assert_eq!(report.status, CampaignStatus::Failed);
            assert_eq!(report.progress.succeeded, 1);
            assert_eq!(report.pages_fetched, 1);
        },
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_page_without_items_completes_immediately() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v18.0/1234/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = runner(&server)
        .run(request(), &CancellationToken::new(), &mut NoopObserver)
        .await
        .unwrap();

    assert_eq!(report.status, CampaignStatus::Completed);
    assert_eq!(report.progress.total, 0);
    assert_eq!(report.summary_line(), "Done! No posts left to delete");
}
