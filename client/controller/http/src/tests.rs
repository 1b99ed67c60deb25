use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use serde_json::Value;
use tokio::net::TcpListener;

use sdnac_controller_client::AttachmentPoint;
use sdnac_controller_client::Client;
use sdnac_controller_client::ControllerRejected;
use sdnac_controller_client::ControllerUnreachable;
use sdnac_controller_client::FlowAction;
use sdnac_controller_client::FlowDescriptor;

use super::ClientOptions;
use super::HttpClient;

/// Request as seen by the canned controller.
#[derive(Debug)]
struct Received {
    body: Option<Value>,
    method: Method,
    path: String,
}

/// Canned controller answering every request with the same response.
#[derive(Clone)]
struct Canned {
    body: &'static str,
    received: Arc<Mutex<Vec<Received>>>,
    status: StatusCode,
}

impl Canned {
    fn received(&self) -> Vec<Received> {
        std::mem::take(&mut *self.received.lock().unwrap())
    }
}

async fn answer(
    State(canned): State<Canned>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    let received = Received {
        body: serde_json::from_slice(&body).ok(),
        method,
        path: uri.path().to_string(),
    };
    canned.received.lock().unwrap().push(received);
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
}

async fn serve_router(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    address
}

/// Serve a canned response on any path and record the requests received.
async fn serve(status: StatusCode, body: &'static str) -> (SocketAddr, Canned) {
    let canned = Canned {
        body,
        received: Default::default(),
        status,
    };
    let app = Router::new().fallback(answer).with_state(canned.clone());
    let address = serve_router(app).await;
    (address, canned)
}

fn client(address: SocketAddr) -> Client {
    let options = ClientOptions::url(format!("http://{}", address));
    Client::from(HttpClient::with(options).unwrap())
}

fn flow() -> FlowDescriptor {
    FlowDescriptor {
        actions: FlowAction::Output(2),
        active: true,
        cookie: 0,
        matches: Default::default(),
        name: "1_inbound".into(),
        priority: 32768,
        switch: "00:00:00:00:00:00:00:01".into(),
    }
}

#[tokio::test]
async fn devices_bare_list() {
    let body = r#"[{"mac": ["aa:bb:cc:dd:ee:ff"], "attachmentPoint": [{"switchDPID": "s1", "port": 1}]}]"#;
    let (address, canned) = serve(StatusCode::OK, body).await;
    let devices = client(address).devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].attachment_points[0], AttachmentPoint::new("s1", 1));

    let received = canned.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].method, Method::GET);
    assert_eq!(received[0].path, "/wm/device/");
}

#[tokio::test]
async fn devices_wrapped_list() {
    let body = r#"{"devices": [{"mac": ["aa:bb:cc:dd:ee:ff"], "attachmentPoint": []}]}"#;
    let (address, _canned) = serve(StatusCode::OK, body).await;
    let devices = client(address).devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert!(devices[0].attachment_points.is_empty());
}

#[tokio::test]
async fn malformed_payload_is_unreachable() {
    let (address, _canned) = serve(StatusCode::OK, "this is not json").await;
    let error = client(address).switches().await.unwrap_err();
    assert!(error.downcast_ref::<ControllerUnreachable>().is_some());
}

#[tokio::test]
async fn push_flow_posts_document() {
    let (address, canned) = serve(StatusCode::OK, r#"{"status": "Entry pushed"}"#).await;
    client(address).push_flow(&flow()).await.unwrap();

    let received = canned.received();
    assert_eq!(received[0].method, Method::POST);
    assert_eq!(received[0].path, "/wm/staticflowpusher/json");
    let body = received[0].body.as_ref().unwrap();
    assert_eq!(body["name"], json!("1_inbound"));
    assert_eq!(body["actions"], json!("output=2"));
}

#[tokio::test]
async fn push_flow_error_ack_is_rejected() {
    let body = r#"{"status": "Error! Could not parse flow mod"}"#;
    let (address, _canned) = serve(StatusCode::OK, body).await;
    let error = client(address).push_flow(&flow()).await.unwrap_err();
    let rejected = error.downcast_ref::<ControllerRejected>().unwrap();
    assert_eq!(rejected.operation, "push static flow");
}

#[tokio::test]
async fn push_flow_discarded_ack_is_rejected() {
    let body = r#"{"status": "Warning! Must specify eth_type of IPv4/IPv6 to match on IPv4/IPv6 fields! The flow has been discarded."}"#;
    let (address, _canned) = serve(StatusCode::OK, body).await;
    let error = client(address).push_flow(&flow()).await.unwrap_err();
    let rejected = error.downcast_ref::<ControllerRejected>().unwrap();
    assert_eq!(rejected.operation, "push static flow");
    assert!(rejected.reason.contains("discarded"));
}

#[tokio::test]
async fn delete_flow_sends_switch_and_name() {
    let (address, canned) = serve(StatusCode::OK, r#"{"status": "Entry 1_inbound deleted"}"#).await;
    client(address)
        .delete_flow("00:00:00:00:00:00:00:01", "1_inbound")
        .await
        .unwrap();

    let received = canned.received();
    assert_eq!(received[0].method, Method::DELETE);
    assert_eq!(received[0].path, "/wm/staticflowpusher/json");
    assert_eq!(
        received[0].body,
        Some(json!({"name": "1_inbound", "switch": "00:00:00:00:00:00:00:01"})),
    );
}

#[tokio::test]
async fn error_status_is_rejected() {
    let (address, _canned) = serve(StatusCode::INTERNAL_SERVER_ERROR, r#"{"status": "boom"}"#).await;
    let error = client(address)
        .delete_flow("s1", "1_inbound")
        .await
        .unwrap_err();
    assert!(error.downcast_ref::<ControllerRejected>().is_some());
    assert!(error.downcast_ref::<ControllerUnreachable>().is_none());
}

#[tokio::test]
async fn route_path() {
    let body = r#"[{"switch": "s1", "port": 1}, {"switch": "s1", "port": 3}]"#;
    let (address, canned) = serve(StatusCode::OK, body).await;
    let src = AttachmentPoint::new("s1", 1);
    let dst = AttachmentPoint::new("s2", 4);
    let hops = client(address).route(&src, &dst).await.unwrap();
    assert_eq!(hops.len(), 2);

    let received = canned.received();
    assert_eq!(received[0].method, Method::GET);
    assert_eq!(received[0].path, "/wm/topology/route/s1/1/s2/4/json");
}

#[tokio::test]
async fn connection_refused_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let error = client(address).switches().await.unwrap_err();
    let unreachable = error.downcast_ref::<ControllerUnreachable>().unwrap();
    assert_eq!(unreachable.operation, "list switches");
}

#[tokio::test]
async fn timeout_is_unreachable() {
    let app = Router::new().route(
        "/wm/core/controller/switches/json",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "[]"
        }),
    );
    let address = serve_router(app).await;
    let options = ClientOptions::url(format!("http://{}", address))
        .timeout(Duration::from_millis(200))
        .client();
    let client = Client::from(HttpClient::with(options).unwrap());

    let error = client.switches().await.unwrap_err();
    let unreachable = error.downcast_ref::<ControllerUnreachable>().unwrap();
    assert_eq!(unreachable.operation, "list switches");
}
