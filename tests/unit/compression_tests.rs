use dav_multiget::common::compression::{ACCEPT_ENCODING, normalize_decoded_headers};
use dav_multiget::common::{ContentEncoding, add_accept_encoding, detect_encodings};
use hyper::HeaderMap;
use hyper::http::header;

fn encoded(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_ENCODING, value.parse().unwrap());
    headers
}

#[test]
fn test_content_encoding_as_str() {
    assert_eq!(ContentEncoding::Identity.as_str(), "identity");
    assert_eq!(ContentEncoding::Br.as_str(), "br");
    assert_eq!(ContentEncoding::Gzip.as_str(), "gzip");
    assert_eq!(ContentEncoding::Zstd.as_str(), "zstd");
}

#[test]
fn test_no_content_encoding_is_empty_chain() {
    assert!(detect_encodings(&HeaderMap::new()).unwrap().is_empty());
    assert!(detect_encodings(&encoded("identity")).unwrap().is_empty());
}

#[test]
fn test_single_codings_and_aliases() {
    assert_eq!(detect_encodings(&encoded("gzip")).unwrap(), [ContentEncoding::Gzip]);
    assert_eq!(detect_encodings(&encoded("x-gzip")).unwrap(), [ContentEncoding::Gzip]);
    assert_eq!(detect_encodings(&encoded("br")).unwrap(), [ContentEncoding::Br]);
    assert_eq!(detect_encodings(&encoded("zst")).unwrap(), [ContentEncoding::Zstd]);
    assert_eq!(detect_encodings(&encoded("ZSTD")).unwrap(), [ContentEncoding::Zstd]);
}

#[test]
fn test_unsupported_coding_is_an_error() {
    let err = detect_encodings(&encoded("gzip, deflate")).unwrap_err();
    assert!(err.to_string().contains("deflate"));
}

#[test]
fn test_accept_encoding_default() {
    let mut headers = HeaderMap::new();
    add_accept_encoding(&mut headers);
    assert_eq!(headers[header::ACCEPT_ENCODING], ACCEPT_ENCODING);
    assert_eq!(ACCEPT_ENCODING, "br, zstd, gzip");
}

#[test]
fn test_decoded_headers_drop_content_encoding() {
    let mut headers = encoded("gzip");
    headers.insert(header::CONTENT_LENGTH, "12".parse().unwrap());
    normalize_decoded_headers(&mut headers, 345);
    assert!(!headers.contains_key(header::CONTENT_ENCODING));
    assert_eq!(headers[header::CONTENT_LENGTH], "345");
}
