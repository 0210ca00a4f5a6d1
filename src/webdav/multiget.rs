//! Generic multiget REPORT: one serialization skeleton shared by `addressbook-multiget` and
//! `calendar-multiget`, selected through a [`MultigetKind`].

use std::io;

use hyper::{HeaderMap, StatusCode};

use crate::caldav::names as caldav;
use crate::carddav::names as carddav;
use crate::error::{Error, ProtocolError, Result, UsageError};
use crate::webdav::multistatus::MultigetResponse;
use crate::webdav::names;
use crate::webdav::session::{REPORT, Session};
use crate::webdav::transport::{HyperTransport, Transport};
use crate::webdav::types::{Href, PropertySet, QualifiedName};
use crate::webdav::xml::XmlWriter;

/// Which multiget report to issue: the namespace and local name of its root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultigetKind {
    pub namespace: &'static str,
    pub root: &'static str,
}

impl MultigetKind {
    /// `addressbook-multiget` (RFC 6352 §8.7).
    pub const ADDRESSBOOK: MultigetKind = MultigetKind {
        namespace: carddav::NAMESPACE,
        root: carddav::ADDRESSBOOK_MULTIGET,
    };

    /// `calendar-multiget` (RFC 4791 §7.9).
    pub const CALENDAR: MultigetKind = MultigetKind {
        namespace: caldav::NAMESPACE,
        root: caldav::CALENDAR_MULTIGET,
    };

    pub const fn root_name(&self) -> QualifiedName {
        QualifiedName::from_static(self.namespace, self.root)
    }
}

/// Serialize a multiget body.
///
/// Properties come first, in a single `prop` container, then one `href` per reference. Both
/// keep the caller's order; nothing is deduplicated.
pub fn build_multiget_body<S: AsRef<str>>(
    kind: MultigetKind,
    hrefs: &[S],
    properties: &[QualifiedName],
) -> String {
    let root = kind.root_name();
    let mut w = XmlWriter::new();

    if hrefs.is_empty() && properties.is_empty() {
        w.empty(&root);
        return w.finish();
    }

    w.start(&root);
    if !properties.is_empty() {
        w.start(&names::PROP);
        for property in properties {
            w.empty(property);
        }
        w.end();
    }
    for href in hrefs {
        w.text_element(&names::HREF, href.as_ref());
    }
    w.end();
    w.finish()
}

#[derive(Debug)]
enum RequestState {
    Unsent,
    Sent,
    Received(Received),
}

/// What came back from the server. Headers live inside the parsed response when there is one.
#[derive(Debug)]
enum Received {
    Parsed(MultigetResponse),
    ParseFailed {
        status: StatusCode,
        headers: HeaderMap,
        error: ProtocolError,
    },
}

impl Received {
    fn status(&self) -> StatusCode {
        match self {
            Received::Parsed(response) => response.status(),
            Received::ParseFailed { status, .. } => *status,
        }
    }

    fn headers(&self) -> &HeaderMap {
        match self {
            Received::Parsed(response) => response.headers(),
            Received::ParseFailed { headers, .. } => headers,
        }
    }
}

impl RequestState {
    fn label(&self) -> &'static str {
        match self {
            RequestState::Unsent => "unsent",
            RequestState::Sent => "sent",
            RequestState::Received(_) => "received",
        }
    }

    fn no_response(&self) -> Error {
        UsageError::NoResponse {
            state: self.label(),
        }
        .into()
    }
}

/// A single-use multiget REPORT bound to one [`Session`].
///
/// Lifecycle: `Unsent → Sent → Received`. The body can be inspected at any time; the status,
/// headers and parsed entries only once a response has been received.
///
/// # Example
///
/// ```no_run
/// use dav_multiget::{MultigetRequest, Session, SessionConfig};
/// use dav_multiget::webdav::names::{DISPLAYNAME, GETETAG};
/// use dav_multiget::carddav::names::ADDRESS_DATA;
///
/// # async fn example() -> dav_multiget::Result<()> {
/// let session = Session::new(
///     SessionConfig::new("contacts.example.com").with_basic_auth("user01", "secret"),
/// )?;
/// let mut request = MultigetRequest::addressbook(
///     &session,
///     "/addressbooks/user01/personal/",
///     ["/addressbooks/user01/personal/a.vcf", "/addressbooks/user01/personal/b.vcf"],
///     [GETETAG, DISPLAYNAME, ADDRESS_DATA],
/// )?;
/// let response = request.execute().await?;
/// for entry in response.entries() {
///     println!("{} {:?} {:?}", entry.href, entry.status, entry.etag());
/// }
/// # Ok(())
/// # }
/// ```
pub struct MultigetRequest<'s, T: Transport = HyperTransport> {
    session: &'s Session<T>,
    url: String,
    hrefs: Vec<Href>,
    properties: PropertySet,
    kind: MultigetKind,
    state: RequestState,
}

impl<'s, T: Transport> MultigetRequest<'s, T> {
    /// Create a request against the collection at `url`.
    ///
    /// An empty `properties` list means no property filter; an empty `hrefs` list is allowed.
    ///
    /// # Errors
    ///
    /// [`UsageError::InvalidProperty`] if a property lacks a namespace or a local name.
    pub fn new<H, S, P>(
        session: &'s Session<T>,
        url: impl Into<String>,
        kind: MultigetKind,
        hrefs: H,
        properties: P,
    ) -> Result<Self>
    where
        H: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: IntoIterator<Item = QualifiedName>,
    {
        let properties: PropertySet = properties.into_iter().collect();
        for property in &properties {
            property.validate()?;
        }

        Ok(Self {
            session,
            url: url.into(),
            hrefs: hrefs.into_iter().map(|h| h.as_ref().to_owned()).collect(),
            properties,
            kind,
            state: RequestState::Unsent,
        })
    }

    /// Shorthand for an `addressbook-multiget`.
    pub fn addressbook<H, S, P>(
        session: &'s Session<T>,
        url: impl Into<String>,
        hrefs: H,
        properties: P,
    ) -> Result<Self>
    where
        H: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: IntoIterator<Item = QualifiedName>,
    {
        Self::new(session, url, MultigetKind::ADDRESSBOOK, hrefs, properties)
    }

    /// Shorthand for a `calendar-multiget`.
    pub fn calendar<H, S, P>(
        session: &'s Session<T>,
        url: impl Into<String>,
        hrefs: H,
        properties: P,
    ) -> Result<Self>
    where
        H: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: IntoIterator<Item = QualifiedName>,
    {
        Self::new(session, url, MultigetKind::CALENDAR, hrefs, properties)
    }

    /// Always `"REPORT"`, whatever the state of the request.
    pub fn method(&self) -> &'static str {
        REPORT
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> MultigetKind {
        self.kind
    }

    pub fn hrefs(&self) -> &[Href] {
        &self.hrefs
    }

    pub fn properties(&self) -> &[QualifiedName] {
        &self.properties
    }

    /// The request body. Identical input always yields identical bytes.
    pub fn body(&self) -> String {
        build_multiget_body(self.kind, &self.hrefs, &self.properties)
    }

    /// Write the request body to `out`.
    pub fn generate_xml<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.body().as_bytes())
    }

    pub fn is_sent(&self) -> bool {
        !matches!(self.state, RequestState::Unsent)
    }

    /// Send the request and parse the answer. Can only be called once.
    ///
    /// # Errors
    ///
    /// - [`UsageError::AlreadyExecuted`] on a second call.
    /// - [`Error::Network`] if the exchange fails; the request stays `Sent`.
    /// - [`ProtocolError::UnexpectedStatus`] for a non-2xx status. Whatever could be parsed
    ///   from the body is still available through [`response`](Self::response).
    /// - [`ProtocolError::MalformedXml`] / [`ProtocolError::NotMultistatus`] if the body
    ///   cannot be parsed.
    pub async fn execute(&mut self) -> Result<&MultigetResponse> {
        if self.is_sent() {
            return Err(UsageError::AlreadyExecuted.into());
        }

        let body = self.body();
        log::trace!("{} body:\n{body}", self.kind.root);
        self.state = RequestState::Sent;

        let resp = self.session.report(&self.url, body).await?;
        let (parts, raw_body) = resp.into_parts();
        let status = parts.status;
        let received =
            match MultigetResponse::parse_or_return_headers(status, parts.headers, raw_body) {
                Ok(response) => Received::Parsed(response),
                Err((error, headers)) => Received::ParseFailed {
                    status,
                    headers,
                    error,
                },
            };
        self.state = RequestState::Received(received);

        if !status.is_success() {
            log::warn!("{} {} answered {status}", self.kind.root, self.url);
            return Err(ProtocolError::UnexpectedStatus { status }.into());
        }
        self.response()
    }

    /// Overall HTTP status of the exchange.
    ///
    /// # Errors
    ///
    /// [`UsageError::NoResponse`] before a response has been received.
    pub fn status_code(&self) -> Result<StatusCode> {
        match &self.state {
            RequestState::Received(received) => Ok(received.status()),
            other => Err(other.no_response()),
        }
    }

    /// Raw response headers.
    ///
    /// # Errors
    ///
    /// [`UsageError::NoResponse`] before a response has been received.
    pub fn response_headers(&self) -> Result<&HeaderMap> {
        match &self.state {
            RequestState::Received(received) => Ok(received.headers()),
            other => Err(other.no_response()),
        }
    }

    /// The parsed response.
    ///
    /// # Errors
    ///
    /// - [`UsageError::NoResponse`] before a response has been received.
    /// - The stored [`ProtocolError`] if the body could not be parsed.
    pub fn response(&self) -> Result<&MultigetResponse> {
        match &self.state {
            RequestState::Received(Received::Parsed(response)) => Ok(response),
            RequestState::Received(Received::ParseFailed { error, .. }) => {
                Err(Error::Protocol(error.clone()))
            }
            other => Err(other.no_response()),
        }
    }

    /// Consume the request, keeping only the parsed response.
    ///
    /// # Errors
    ///
    /// Same as [`response`](Self::response).
    pub fn into_response(self) -> Result<MultigetResponse> {
        match self.state {
            RequestState::Received(Received::Parsed(response)) => Ok(response),
            RequestState::Received(Received::ParseFailed { error, .. }) => {
                Err(Error::Protocol(error))
            }
            other => Err(other.no_response()),
        }
    }
}
