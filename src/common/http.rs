use bytes::Bytes;
use http_body_util::Full;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;

/// Hyper client type behind [`HyperTransport`](crate::HyperTransport).
pub type HyperClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Build a Hyper client speaking HTTP/1.1 and HTTP/2 over plain TCP or rustls.
///
/// Native roots are preferred; the bundled WebPKI store is used when the platform store
/// cannot be loaded.
///
/// Pool size and HTTP/2 flow-control windows stay at hyper's defaults. A multiget is a single
/// exchange per request with no fan-out, and sessions promise nothing about connection reuse,
/// so a large idle pool or adaptive windows would only hold sockets open.
pub fn build_hyper_client() -> HyperClient {
    let https_builder = HttpsConnectorBuilder::new()
        .with_native_roots()
        .unwrap_or_else(|err| {
            log::warn!("native TLS roots unavailable, using webpki roots: {err}");
            HttpsConnectorBuilder::new().with_webpki_roots()
        });

    let https = https_builder
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Client::builder(TokioExecutor::new()).build::<_, Full<Bytes>>(https)
}
