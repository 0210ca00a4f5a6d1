//! Transparent decoding of compressed multistatus bodies.
//!
//! The transport advertises `br, zstd, gzip` and undoes whatever `Content-Encoding`
//! chain the server applied before the body reaches the response model.

use anyhow::{Result, bail};
use async_compression::tokio::bufread::{BrotliDecoder, GzipDecoder, ZstdDecoder};
use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::BodyStream;
use hyper::body::Incoming;
use hyper::{HeaderMap, header};
use tokio::io::{AsyncBufRead, AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

pub const ACCEPT_ENCODING: &str = "br, zstd, gzip";

/// A single `Content-Encoding` coding we know how to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Br,
    Gzip,
    Zstd,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Identity => "identity",
            ContentEncoding::Br => "br",
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Zstd => "zstd",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "identity" | "" => Some(ContentEncoding::Identity),
            "br" => Some(ContentEncoding::Br),
            "gzip" | "x-gzip" => Some(ContentEncoding::Gzip),
            "zstd" | "zst" => Some(ContentEncoding::Zstd),
            _ => None,
        }
    }
}

/// Read the `Content-Encoding` chain in the order the codings were applied, identity dropped.
///
/// # Errors
///
/// Fails on a coding we cannot decode, so garbage never reaches the XML parser.
pub fn detect_encodings(headers: &HeaderMap) -> Result<Vec<ContentEncoding>> {
    let Some(value) = headers.get(header::CONTENT_ENCODING) else {
        return Ok(Vec::new());
    };
    let raw = value.to_str()?;

    let mut chain = Vec::new();
    for token in raw.split(',') {
        match ContentEncoding::from_token(token) {
            Some(ContentEncoding::Identity) => {}
            Some(encoding) => chain.push(encoding),
            None => bail!("unsupported content encoding {:?}", token.trim()),
        }
    }
    Ok(chain)
}

/// Insert `Accept-Encoding` unless the caller already chose one.
pub fn add_accept_encoding(headers: &mut HeaderMap) {
    if !headers.contains_key(header::ACCEPT_ENCODING) {
        headers.insert(
            header::ACCEPT_ENCODING,
            header::HeaderValue::from_static(ACCEPT_ENCODING),
        );
    }
}

/// Aggregate a response body and undo `encodings`, the last-applied coding first.
pub async fn decompress_body(body: Incoming, encodings: &[ContentEncoding]) -> Result<Bytes> {
    let frames = BodyStream::new(body)
        .map_ok(|frame| frame.into_data().unwrap_or_default())
        .map_err(std::io::Error::other);
    let mut reader: Box<dyn AsyncBufRead + Unpin + Send> =
        Box::new(BufReader::new(StreamReader::new(frames)));

    // Codings are listed in the order they were applied, so undo them last-first.
    for encoding in encodings.iter().rev() {
        reader = match encoding {
            ContentEncoding::Identity => reader,
            ContentEncoding::Br => Box::new(BufReader::new(BrotliDecoder::new(reader))),
            ContentEncoding::Gzip => Box::new(BufReader::new(GzipDecoder::new(reader))),
            ContentEncoding::Zstd => Box::new(BufReader::new(ZstdDecoder::new(reader))),
        };
    }

    let mut out = Vec::with_capacity(16 * 1024);
    reader.read_to_end(&mut out).await?;
    Ok(Bytes::from(out))
}

/// Make the headers describe the decoded body rather than the wire body.
pub fn normalize_decoded_headers(headers: &mut HeaderMap, decoded_len: usize) {
    headers.remove(header::CONTENT_ENCODING);
    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(decoded_len));
}
