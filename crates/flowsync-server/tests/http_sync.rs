//! The canvas HTTP client against a live server on a local port.

use std::net::SocketAddr;

use uuid::Uuid;

use flowsync_canvas::{CanvasSession, GraphApi, HttpGraphApi, PendingConnection, SyncError};
use flowsync_core::{GraphOperation, Position, SourceHandle, Viewport, WorkspaceId};
use flowsync_server::router::build_router;
use flowsync_server::state::AppState;

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let app = build_router(AppState::in_memory());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn stale_apply_over_http_is_a_version_conflict() {
    let base = spawn_server().await;
    let (api, graph) = HttpGraphApi::create_graph(&base, WorkspaceId(Uuid::new_v4()), Some("Remote"))
        .await
        .unwrap();
    assert_eq!(graph.version, 1);

    let ops = [GraphOperation::update_viewport(Viewport::default())];
    let graph = api.apply_graph_operations(1, &ops).await.unwrap();
    assert_eq!(graph.version, 2);

    match api.apply_graph_operations(1, &ops).await.unwrap_err() {
        SyncError::VersionConflict {
            base_version,
            current_version,
        } => {
            assert_eq!(base_version, 1);
            assert_eq!(current_version, Some(2));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_operation_over_http_is_rejected() {
    let base = spawn_server().await;
    let (api, _) = HttpGraphApi::create_graph(&base, WorkspaceId(Uuid::new_v4()), None)
        .await
        .unwrap();
    let ops = [GraphOperation::delete_node("missing".into())];
    let err = api.apply_graph_operations(1, &ops).await.unwrap_err();
    assert!(matches!(err, SyncError::Rejected { status: 400, .. }), "{err:?}");
}

#[tokio::test]
async fn two_sessions_converge_through_the_retry() {
    let base = spawn_server().await;
    let workspace = WorkspaceId(Uuid::new_v4());
    let (api, _) = HttpGraphApi::create_graph(&base, workspace, Some("Shared"))
        .await
        .unwrap();
    let other = HttpGraphApi::new(base.clone(), api.key());

    let mut alice = CanvasSession::new(api);
    let mut bob = CanvasSession::new(other);
    assert!(alice.open().await);
    assert!(bob.open().await);

    let first = alice
        .add_action("http_request", "Fetch", Position::new(0.0, 150.0))
        .await
        .unwrap();
    assert_eq!(alice.version(), Some(2));

    // Bob is still at v1: his edit conflicts once, then lands on v3.
    assert!(bob
        .settle_viewport(Viewport {
            x: 5.0,
            y: 5.0,
            zoom: 1.5
        })
        .await);
    assert_eq!(bob.version(), Some(3));
    assert!(bob.node(&first).is_some());
    assert!(bob.notifications().is_empty());

    // Alice is now stale too; her connection also goes through.
    let trigger = alice.graph().unwrap().trigger().unwrap().id.clone();
    let second = alice
        .add_action("send_email", "Alert", Position::new(0.0, 300.0))
        .await
        .unwrap();
    assert!(alice.connect(trigger, first.clone(), None).await);
    assert!(alice
        .connect(first.clone(), second.clone(), Some(SourceHandle::Error))
        .await);
    assert_eq!(alice.version(), Some(6));
    assert_eq!(alice.viewport().zoom, 1.5);

    assert!(bob.refresh().await);
    assert_eq!(bob.version(), Some(6));
    assert_eq!(bob.edges().len(), 2);
}

#[tokio::test]
async fn fractional_drop_point_resolves_over_http() {
    let base = spawn_server().await;
    let (api, _) = HttpGraphApi::create_graph(&base, WorkspaceId(Uuid::new_v4()), None)
        .await
        .unwrap();
    let mut session = CanvasSession::new(api);
    assert!(session.open().await);
    let trigger = session.graph().unwrap().trigger().unwrap().id.clone();

    let selector = session.drop_connection_on_pane(
        PendingConnection::new(trigger.clone(), None),
        Position::new(-14915.238095238077, 250.0),
    );
    let created = session
        .resolve_selector(selector, "send_email", "Notify")
        .await
        .expect("node should be created");

    assert!(session.node(&created).is_some());
    assert!(session
        .edges()
        .iter()
        .any(|e| e.source == trigger && e.target == created));
    assert!(session.notifications().is_empty(), "{:?}", session.notifications());
    assert_eq!(session.version(), Some(3));
}
