//! CardDAV/CalDAV multiget client for Rust.
//!
//! Fetch the properties of many named resources in a single round trip with the
//! `addressbook-multiget` (RFC 6352) and `calendar-multiget` (RFC 4791) REPORTs, instead of
//! issuing one request per resource.
//!
//! # Features
//!
//! - One request builder shared by both reports, parameterized by a [`MultigetKind`]
//! - Byte-stable request bodies (CRLF, two-space indentation, locally declared namespaces)
//! - A multistatus response model that survives malformed blocks and keeps per-property
//!   failures as data
//! - hyper 1.x + rustls transport with automatic response decompression (br/zstd/gzip)
//! - A [`Transport`] trait to plug in any other HTTP stack
//!
//! # Examples
//!
//! ## Fetching contacts
//!
//! ```no_run
//! use dav_multiget::{MultigetRequest, Session, SessionConfig};
//! use dav_multiget::carddav::names::ADDRESS_DATA;
//! use dav_multiget::webdav::names::GETETAG;
//!
//! #[tokio::main]
//! async fn main() -> dav_multiget::Result<()> {
//!     let session = Session::new(
//!         SessionConfig::from_url("https://contacts.example.com/")?
//!             .with_basic_auth("user01", "secret"),
//!     )?;
//!
//!     let mut request = MultigetRequest::addressbook(
//!         &session,
//!         "/dav/user01/contacts/",
//!         ["/dav/user01/contacts/alice.vcf", "/dav/user01/contacts/bob.vcf"],
//!         [GETETAG, ADDRESS_DATA],
//!     )?;
//!
//!     let response = request.execute().await?;
//!     for entry in response.entries() {
//!         if entry.is_success() {
//!             println!("{}: {:?}", entry.href, entry.address_data());
//!         } else {
//!             println!("{}: {}", entry.href, entry.status);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Inspecting a request body without sending it
//!
//! ```
//! use dav_multiget::{MultigetKind, build_multiget_body};
//! use dav_multiget::webdav::names::{DISPLAYNAME, GETETAG};
//!
//! let body = build_multiget_body(MultigetKind::ADDRESSBOOK, &["/a", "/b"], &[GETETAG, DISPLAYNAME]);
//! assert!(body.starts_with("<?xml version='1.0' encoding='utf-8'?>\r\n"));
//! assert!(body.contains("  <ns1:prop xmlns:ns1=\"DAV:\">\r\n    <ns1:getetag />\r\n"));
//! ```
//!
//! ## Calendar objects and per-resource failures
//!
//! ```no_run
//! use dav_multiget::{MultigetRequest, PropertyResult, Session, SessionConfig};
//! use dav_multiget::caldav::names::CALENDAR_DATA;
//! use dav_multiget::webdav::names::GETETAG;
//!
//! # async fn example() -> dav_multiget::Result<()> {
//! let session = Session::new(SessionConfig::new("cal.example.com"))?;
//! let mut request = MultigetRequest::calendar(
//!     &session,
//!     "/calendars/user01/work/",
//!     ["/calendars/user01/work/standup.ics"],
//!     [GETETAG, CALENDAR_DATA],
//! )?;
//! let response = request.execute().await?;
//! for entry in response.entries() {
//!     for (name, result) in &entry.properties {
//!         match result {
//!             PropertyResult::Value(value) => println!("{name} = {value:?}"),
//!             PropertyResult::Failed(status) => println!("{name} failed with {status}"),
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod caldav;
pub mod carddav;
pub mod common;
pub mod error;
pub mod webdav;

pub use error::{Error, NetworkError, ProtocolError, Result, UsageError};
pub use webdav::{
    HyperTransport, MalformedBlock, MultigetKind, MultigetRequest, MultigetResponse,
    PropertyResult, PropertySet, PropertyValue, QualifiedName, ResponseEntry, Session,
    SessionConfig, Transport, XmlElement, build_multiget_body,
};
