//! Integration tests for webhook dispatch through the HTTP surface
//!
//! Each test builds a fresh registry and router and drives it with
//! `tower::ServiceExt::oneshot`.

mod common;

use axum::http::{HeaderValue, StatusCode};
use common::{
    body_json, create_test_app, create_test_app_with_config, fixture_name, load_fixture,
    webhook_request, RecordingHandler,
};
use hook_keeper_api::{create_router, AppState, ServiceConfig};
use hook_keeper_core::{BitbucketEvent, EventKind, EventRegistry};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Fixtures
// ============================================================================

/// Verify that every fixture dispatches to its handler exactly once
#[tokio::test]
async fn test_every_fixture_dispatches_with_200() {
    for kind in EventKind::ALL {
        // Arrange
        let handler = RecordingHandler::new();
        let app = create_test_app(&[kind], handler.clone()).await;

        // Act
        let response = app
            .oneshot(webhook_request(Some(kind.as_str()), load_fixture(kind)))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "{} ({})",
            kind,
            fixture_name(kind)
        );
        assert_eq!(handler.call_count(), 1, "{kind}");

        let event = handler.last_event().unwrap();
        assert_eq!(event.kind(), kind);
        assert_eq!(event.repository().name, "spike-bb-hook-source-repo");
        assert_eq!(event.actor().username, "skyec");
    }
}

/// Verify that the handler sees every transport header
#[tokio::test]
async fn test_handler_receives_all_headers() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&[EventKind::RepoFork], handler.clone()).await;

    let response = app
        .oneshot(webhook_request(
            Some("repo:fork"),
            load_fixture(EventKind::RepoFork),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (headers, event) = handler.calls().remove(0);
    assert_eq!(headers.event_key(), Some("repo:fork"));
    assert_eq!(headers.attempt_number(), Some(1));
    assert!(headers.hook_uuid().is_some());
    assert_eq!(headers.user_agent(), Some("Bitbucket-Webhooks/2.0"));
    assert_eq!(headers.get("Content-Type"), Some("application/json"));

    let BitbucketEvent::RepoFork(fork) = event else {
        panic!("expected a fork event");
    };
    assert_eq!(fork.fork.name, "spike-bb-hook-source-repo-forked");
}

/// Verify that UTF-8 header values reach the handler unchanged
#[tokio::test]
async fn test_handler_receives_utf8_header_values() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&[EventKind::RepoFork], handler.clone()).await;

    let mut request = webhook_request(Some("repo:fork"), load_fixture(EventKind::RepoFork));
    request
        .headers_mut()
        .insert("x-note", HeaderValue::from_bytes("café".as_bytes()).unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (headers, _) = handler.calls().remove(0);
    assert_eq!(headers.get("X-Note"), Some("café"));
}

#[tokio::test]
async fn test_commit_comment_fixture_fields() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&[EventKind::RepoCommitCommentCreated], handler.clone()).await;

    app.oneshot(webhook_request(
        Some("repo:commit_comment_created"),
        load_fixture(EventKind::RepoCommitCommentCreated),
    ))
    .await
    .unwrap();

    let comment = handler.last_event().unwrap().comment().cloned().unwrap();
    assert_eq!(comment.content.raw, "This is a comment");
    assert_eq!(comment.content.markup, "markdown");
}

#[tokio::test]
async fn test_merged_pull_request_carries_merge_commit() {
    let handler = RecordingHandler::new();
    let app = create_test_app(
        &[EventKind::PullRequestFulfilled, EventKind::PullRequestCreated],
        handler.clone(),
    )
    .await;

    for kind in [EventKind::PullRequestFulfilled, EventKind::PullRequestCreated] {
        let response = app
            .clone()
            .oneshot(webhook_request(Some(kind.as_str()), load_fixture(kind)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let calls = handler.calls();
    let merged = calls[0].1.pull_request().unwrap();
    let open = calls[1].1.pull_request().unwrap();
    assert_eq!(merged.state, "MERGED");
    assert_eq!(merged.merge_commit_hash(), "9f8e7d6c5b4a");
    assert_eq!(open.merge_commit_hash(), "");
    assert_eq!(open.reviewers[0].username, "bobw");
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[tokio::test]
async fn test_push_scenario_exposes_first_change() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&[EventKind::RepoPush], handler.clone()).await;
    let body = json!({
        "actor": {"username": "skyec"},
        "repository": {"name": "demo-repo", "full_name": "team/demo-repo"},
        "push": {"changes": [{
            "new": {
                "type": "branch",
                "name": "main",
                "target": {"hash": "abc123"},
                "repository": {"name": "demo-repo"}
            }
        }]}
    });

    let response = app
        .oneshot(webhook_request(Some("repo:push"), body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let Some(BitbucketEvent::RepoPush(push)) = handler.last_event() else {
        panic!("expected a push event");
    };
    let new = push.push.changes[0].new.as_ref().unwrap();
    assert_eq!(new.repository.name, "demo-repo");
    assert_eq!(new.name, "main");
}

#[tokio::test]
async fn test_issue_updated_scenario_exposes_status_change() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&[EventKind::IssueUpdated], handler.clone()).await;
    let body = json!({
        "actor": {"username": "skyec"},
        "repository": {"name": "demo-repo"},
        "issue": {"id": 1, "title": "Crash on start"},
        "changes": {"status": {"old": "new", "new": "open"}}
    });

    let response = app
        .oneshot(webhook_request(Some("issue:updated"), body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let Some(BitbucketEvent::IssueUpdated(updated)) = handler.last_event() else {
        panic!("expected an issue update");
    };
    let status = updated.changes.status.unwrap();
    assert_eq!(status.old, "new");
    assert_eq!(status.new, "open");
    assert!(updated.comment.is_none());
}

#[tokio::test]
async fn test_bogus_key_is_unrecognized() {
    let registry = Arc::new(EventRegistry::new());
    let handler = RecordingHandler::new();
    registry
        .register_all(EventKind::ALL, handler.clone())
        .await;
    let app = create_router(AppState::new(ServiceConfig::default(), registry.clone()));

    let response = app
        .oneshot(webhook_request(Some("bogus:key"), "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["category"], "unrecognized_event");
    assert!(registry.lookup("bogus:key").await.is_none());
    assert_eq!(handler.call_count(), 0);
}

/// Verify that a key with non-ASCII characters is unknown, not missing
#[tokio::test]
async fn test_non_ascii_key_is_unrecognized() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&EventKind::ALL, handler.clone()).await;

    let mut request = webhook_request(None, load_fixture(EventKind::RepoFork));
    request
        .headers_mut()
        .insert("x-event-key", HeaderValue::from_bytes("repo:forké".as_bytes()).unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["category"], "unrecognized_event");
    assert_eq!(handler.call_count(), 0);
}

/// Verify that only the `pullrequest:` spelling of comment deletion is routed
#[tokio::test]
async fn test_comment_deleted_requires_pullrequest_spelling() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&EventKind::ALL, handler.clone()).await;
    let body = load_fixture(EventKind::PullRequestCommentDeleted);

    let response = app
        .clone()
        .oneshot(webhook_request(Some("pull_request:comment_deleted"), body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["category"], "unrecognized_event");
    assert_eq!(handler.call_count(), 0);

    let response = app
        .oneshot(webhook_request(Some("pullrequest:comment_deleted"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        handler.last_event().unwrap().kind(),
        EventKind::PullRequestCommentDeleted
    );
}

// ============================================================================
// Rejections
// ============================================================================

/// Verify that a missing key is rejected whatever the body
#[tokio::test]
async fn test_missing_event_key_never_reaches_handler() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&EventKind::ALL, handler.clone()).await;

    for body in [
        String::new(),
        "not json".to_string(),
        String::from_utf8(load_fixture(EventKind::RepoPush)).unwrap(),
    ] {
        let response = app
            .clone()
            .oneshot(webhook_request(None, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .oneshot(webhook_request(Some(""), "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["category"], "unidentified_request");
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_bodies_return_400() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&[EventKind::RepoPush], handler.clone()).await;

    let bodies = [
        "{\"push\": ".to_string(),
        "[]".to_string(),
        "\"repo:push\"".to_string(),
        // Envelope without a repository
        json!({"actor": {}, "push": {}}).to_string(),
        // Envelope without an actor
        json!({"repository": {"name": "demo-repo"}, "push": {}}).to_string(),
        // Repository that names nothing
        json!({"actor": {}, "repository": {}, "push": {}}).to_string(),
        // Missing the push object itself
        json!({"actor": {}, "repository": {"name": "demo-repo"}}).to_string(),
    ];

    for body in bodies {
        let response = app
            .clone()
            .oneshot(webhook_request(Some("repo:push"), body.clone()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(body_json(response).await["category"], "malformed_payload");
    }
    assert_eq!(handler.call_count(), 0);
}

/// Verify that a fixture for one key does not decode under another
#[tokio::test]
async fn test_payload_for_wrong_key_is_malformed() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&[EventKind::IssueCreated], handler.clone()).await;

    let response = app
        .oneshot(webhook_request(
            Some("issue:created"),
            load_fixture(EventKind::RepoPush),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_handler_failure_returns_500_after_one_call() {
    let handler = RecordingHandler::failing("database unavailable");
    let app = create_test_app(&[EventKind::IssueCreated], handler.clone()).await;

    let response = app
        .oneshot(webhook_request(
            Some("issue:created"),
            load_fixture(EventKind::IssueCreated),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["category"], "handler_failure");
    assert!(!body["error"]
        .as_str()
        .unwrap()
        .contains("database unavailable"));
    assert_eq!(handler.call_count(), 1);
}

#[tokio::test]
async fn test_oversized_body_returns_413() {
    let mut config = ServiceConfig::default();
    config.server.max_body_size = 1024;
    let handler = RecordingHandler::new();
    let app = create_test_app_with_config(config, &[EventKind::RepoPush], handler.clone()).await;

    let response = app
        .oneshot(webhook_request(
            Some("repo:push"),
            load_fixture(EventKind::RepoPush),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(handler.call_count(), 0);
}

// ============================================================================
// Registry Behaviour
// ============================================================================

/// Verify that redelivery invokes the handler again and leaves the registry unchanged
#[tokio::test]
async fn test_repeated_delivery_invokes_handler_each_time() {
    let registry = Arc::new(EventRegistry::new());
    let handler = RecordingHandler::new();
    registry.register(EventKind::RepoPush, handler.clone()).await;
    let app = create_router(AppState::new(ServiceConfig::default(), registry.clone()));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(webhook_request(
                Some("repo:push"),
                load_fixture(EventKind::RepoPush),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(handler.call_count(), 2);
    assert_eq!(registry.keys().await, vec!["repo:push".to_string()]);
}

/// Verify that the last registration for a key wins, including while serving
#[tokio::test]
async fn test_reregistration_replaces_handler() {
    let registry = Arc::new(EventRegistry::new());
    let first = RecordingHandler::new();
    let second = RecordingHandler::new();
    registry.register(EventKind::RepoFork, first.clone()).await;
    let app = create_router(AppState::new(ServiceConfig::default(), registry.clone()));

    registry.register(EventKind::RepoFork, second.clone()).await;

    let response = app
        .oneshot(webhook_request(
            Some("repo:fork"),
            load_fixture(EventKind::RepoFork),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(first.call_count(), 0);
    assert_eq!(second.call_count(), 1);
}

/// Verify that concurrent deliveries are all dispatched
#[tokio::test]
async fn test_concurrent_deliveries() {
    let handler = RecordingHandler::new();
    let app = create_test_app(&EventKind::ALL, handler.clone()).await;

    let tasks: Vec<_> = EventKind::ALL
        .into_iter()
        .map(|kind| {
            let app = app.clone();
            tokio::spawn(async move {
                app.oneshot(webhook_request(Some(kind.as_str()), load_fixture(kind)))
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(handler.call_count(), EventKind::ALL.len());
}
