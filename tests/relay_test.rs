//! End-to-end tests for the relay server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_relay::config::RelayConfig;
use http_relay::http::RelayServer;
use http_relay::lifecycle::Shutdown;
use http_relay::traffic::TrafficLog;
use http_relay::transport::HyperTransport;

mod common;

/// Start a relay on `relay_addr` and return its shutdown coordinator.
async fn start_relay(relay_addr: SocketAddr, traffic: TrafficLog) -> Shutdown {
    let mut config = RelayConfig::default();
    config.listener.bind_address = relay_addr.to_string();

    let transport = Arc::new(HyperTransport::new(Duration::from_secs(2)));
    let server = RelayServer::new(config, transport, traffic);
    let listener = tokio::net::TcpListener::bind(relay_addr).await.unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_relay_success_and_traffic_capture() {
    let upstream_addr: SocketAddr = "127.0.0.1:28481".parse().unwrap();
    let relay_addr: SocketAddr = "127.0.0.1:28482".parse().unwrap();

    common::start_mock_upstream(
        upstream_addr,
        "201 Created",
        &[("X-Data", "Test")],
        "Test me now",
    )
    .await;

    let traffic = TrafficLog::new();
    let shutdown = start_relay(relay_addr, traffic.clone()).await;

    let res = client()
        .post(format!("http://{}/", relay_addr))
        .json(&serde_json::json!({
            "method": "GET",
            "url": format!("http://{}/", upstream_addr),
            "headers": {"X-Data": "Test"}
        }))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], 201);
    assert_eq!(body["length"], 11);
    assert_eq!(body["headers"]["X-Data"], "Test");
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 32);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // The server has drained; the log holds exactly this exchange.
    assert_eq!(traffic.len(), 1);
    let record = traffic.get(&id).expect("record for trace id");
    assert_eq!(record.response.status, 201);
    assert_eq!(record.response.length, 11);
    assert_eq!(record.request.method, "GET");
}

#[tokio::test]
async fn test_trace_id_reaches_the_target() {
    let upstream_addr: SocketAddr = "127.0.0.1:28483".parse().unwrap();
    let relay_addr: SocketAddr = "127.0.0.1:28484".parse().unwrap();

    common::start_trace_echo_upstream(upstream_addr).await;

    let shutdown = start_relay(relay_addr, TrafficLog::new()).await;

    let res = client()
        .post(format!("http://{}/", relay_addr))
        .json(&serde_json::json!({
            "method": "GET",
            "url": format!("http://{}/", upstream_addr),
            "headers": {}
        }))
        .send()
        .await
        .expect("Relay unreachable");

    let body: serde_json::Value = res.json().await.unwrap();
    let id = body["id"].as_str().unwrap();
    assert_eq!(id.len(), 32);
    assert_eq!(body["headers"]["X-Echo-Trace"], *id);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let relay_addr: SocketAddr = "127.0.0.1:28485".parse().unwrap();

    let traffic = TrafficLog::new();
    let shutdown = start_relay(relay_addr, traffic.clone()).await;

    // Nothing listens on this port.
    let res = client()
        .post(format!("http://{}/", relay_addr))
        .json(&serde_json::json!({
            "method": "GET",
            "url": "http://127.0.0.1:28499/",
            "headers": {}
        }))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 502);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"], serde_json::json!(["request failed"]));
    assert!(traffic.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_validation_errors_end_to_end() {
    let relay_addr: SocketAddr = "127.0.0.1:28486".parse().unwrap();

    let shutdown = start_relay(relay_addr, TrafficLog::new()).await;

    let res = client()
        .post(format!("http://{}/", relay_addr))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 400);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["errors"],
        serde_json::json!(["method is empty", "url is empty"])
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let relay_addr: SocketAddr = "127.0.0.1:28487".parse().unwrap();

    let shutdown = start_relay(relay_addr, TrafficLog::new()).await;

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let res = client()
        .post(format!("http://{}/", relay_addr))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await;
    assert!(res.is_err(), "listener should be closed after shutdown");
}
