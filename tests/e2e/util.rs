use std::net::SocketAddr;
use std::time::Duration;

use async_compression::tokio::write::GzipEncoder;
use dav_multiget::{Session, SessionConfig};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const XML: &str = "application/xml; charset=utf-8";
pub const BASIC_AUTH: &str = "Basic dXNlcjAxOnNlY3JldA==";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 207 carrying `body` as-is.
pub fn multistatus(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(207).set_body_raw(body, XML)
}

/// A 207 carrying `body` gzip-encoded, with the matching `Content-Encoding`.
pub async fn gzipped_multistatus(body: &str) -> ResponseTemplate {
    let mut encoder = GzipEncoder::new(Vec::new());
    encoder.write_all(body.as_bytes()).await.unwrap();
    encoder.shutdown().await.unwrap();

    ResponseTemplate::new(207)
        .insert_header("Content-Type", XML)
        .insert_header("Content-Encoding", "gzip")
        .set_body_bytes(encoder.into_inner())
}

/// Start a server answering exactly one authenticated `REPORT` on `collection` with `reply`.
pub async fn serve_report(collection: &str, reply: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("REPORT"))
        .and(path(collection))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(reply)
        .expect(1)
        .mount(&server)
        .await;
    server
}

/// Body of the single request `server` received.
pub async fn only_request_body(server: &MockServer) -> Vec<u8> {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests.remove(0).body
}

/// A port nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn loopback_config(addr: &SocketAddr) -> SessionConfig {
    SessionConfig::new("127.0.0.1")
        .with_port(addr.port())
        .with_tls(false)
        .with_basic_auth("user01", "secret")
        .with_timeout(Duration::from_secs(5))
}

pub fn loopback_session(addr: &SocketAddr) -> Session {
    Session::new(loopback_config(addr)).unwrap()
}
