use std::future::Future;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Request, Response};

use crate::common::compression::{decompress_body, detect_encodings, normalize_decoded_headers};
use crate::common::http::{HyperClient, build_hyper_client};

/// One blocking-until-done HTTP exchange.
///
/// The session hands over a fully built request (absolute URI, method, headers, body) and
/// expects the aggregated, decoded response back. How the connection is established, kept
/// alive or pooled is up to the implementation. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn exchange(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// Default transport: hyper 1.x + rustls with automatic response decompression.
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self {
            client: build_hyper_client(),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn exchange(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let resp = self.client.request(request.map(Full::new)).await?;

        let (mut parts, body) = resp.into_parts();
        let encodings = detect_encodings(&parts.headers)?;
        let decoded = decompress_body(body, &encodings).await?;
        if !encodings.is_empty() {
            normalize_decoded_headers(&mut parts.headers, decoded.len());
        }

        Ok(Response::from_parts(parts, decoded))
    }
}
