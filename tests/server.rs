//! Integration tests for router assembly and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use waypoint::config::model::{ClientSettings, Rule};
use waypoint::proxy::routing::RouteTable;
use waypoint::server::{self, AppState};

fn test_table() -> RouteTable {
    RouteTable::new(vec![Rule::new("/test/*", "http://127.0.0.1:9/unused")])
}

async fn start_test_server() -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let state = Arc::new(AppState::new(&ClientSettings {
        connect_timeout_ms: Some(500),
        ..ClientSettings::default()
    }));
    let router = server::build_router(state, &test_table()).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    (addr, shutdown_tx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn conflicting_rules_fail_router_build() {
    let state = Arc::new(AppState::new(&ClientSettings::default()));
    let table = RouteTable::new(vec![
        Rule::new("/a/:x", "http://one:1"),
        Rule::new("/a/:y", "http://two:1"),
    ]);
    assert!(server::build_router(state, &table).is_err());
}

#[tokio::test]
async fn no_builtin_endpoints_are_exposed() {
    let (addr, shutdown) = start_test_server().await;

    let resp = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let (addr, shutdown) = start_test_server().await;
    let first = client();

    // Verify server is running
    let url = format!("http://{addr}/nothing-here");
    assert!(first.get(&url).send().await.is_ok());

    let _ = shutdown.send(());

    // Give it a moment to shut down
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    // Server should no longer accept connections (fresh client, no pooled connection)
    let result = client().get(&url).send().await;
    assert!(result.is_err());
}
