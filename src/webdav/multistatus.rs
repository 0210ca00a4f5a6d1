//! Response model for `207 Multi-Status` bodies.
//!
//! The parser is event driven: a stack of structural elements tracks where we are in the
//! `multistatus/response/propstat/prop` skeleton, and everything below `prop` is captured into
//! a small tree so nested values (e.g. `resourcetype`) survive intact.
//!
//! One malformed `response` block never aborts the document. It is reported through
//! [`MultigetResponse::malformed`] and parsing carries on with the next block.

use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::caldav::names as caldav;
use crate::carddav::names as carddav;
use crate::error::ProtocolError;
use crate::webdav::names;
use crate::webdav::types::QualifiedName;

/// Value of a property the server reported successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// The element was present but had no content, e.g. `<getetag/>`.
    Empty,
    /// Character data, kept exactly as received (CDATA included).
    Text(String),
    /// Child elements, e.g. the members of `resourcetype`.
    Elements(Vec<XmlElement>),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn elements(&self) -> &[XmlElement] {
        match self {
            PropertyValue::Elements(elements) => elements,
            _ => &[],
        }
    }

    /// Whether a direct child element named `name` is present.
    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.elements().iter().any(|e| &e.name == name)
    }
}

/// Element nested inside a property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: QualifiedName,
    /// Attributes other than namespace declarations, as `(raw key, unescaped value)`.
    pub attributes: Vec<(String, String)>,
    pub value: PropertyValue,
}

impl XmlElement {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Outcome for one property of one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyResult {
    Value(PropertyValue),
    /// The property sat in a `propstat` with a non-2xx status (e.g. 404 for an unknown property).
    Failed(StatusCode),
}

impl PropertyResult {
    pub fn value(&self) -> Option<&PropertyValue> {
        match self {
            PropertyResult::Value(value) => Some(value),
            PropertyResult::Failed(_) => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, PropertyResult::Value(_))
    }
}

/// Result for a single resource of a multiget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEntry {
    pub href: String,
    /// The block-level `status` when the server sent one; otherwise 200 if any property
    /// succeeded, or the first failing `propstat` status.
    pub status: StatusCode,
    /// Properties in document order.
    pub properties: Vec<(QualifiedName, PropertyResult)>,
}

impl ResponseEntry {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn property(&self, name: &QualifiedName) -> Option<&PropertyResult> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, result)| result)
    }

    pub fn value(&self, name: &QualifiedName) -> Option<&PropertyValue> {
        self.property(name).and_then(PropertyResult::value)
    }

    pub fn text(&self, name: &QualifiedName) -> Option<&str> {
        self.value(name).and_then(PropertyValue::as_text)
    }

    pub fn etag(&self) -> Option<&str> {
        self.text(&names::GETETAG)
    }

    pub fn displayname(&self) -> Option<&str> {
        self.text(&names::DISPLAYNAME)
    }

    pub fn address_data(&self) -> Option<&str> {
        self.text(&carddav::ADDRESS_DATA)
    }

    pub fn calendar_data(&self) -> Option<&str> {
        self.text(&caldav::CALENDAR_DATA)
    }

    /// Properties the server refused, with their status.
    pub fn failed_properties(&self) -> impl Iterator<Item = (&QualifiedName, StatusCode)> {
        self.properties.iter().filter_map(|(name, result)| match result {
            PropertyResult::Failed(status) => Some((name, *status)),
            PropertyResult::Value(_) => None,
        })
    }
}

/// A `response` block that could not be turned into a [`ResponseEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedBlock {
    /// Zero-based position of the block among all `response` elements.
    pub index: usize,
    pub href: Option<String>,
    pub reason: String,
}

/// Parsed outcome of a multiget exchange.
#[derive(Debug, Clone)]
pub struct MultigetResponse {
    status: StatusCode,
    headers: HeaderMap,
    entries: Vec<ResponseEntry>,
    malformed: Vec<MalformedBlock>,
    raw_body: Bytes,
}

impl MultigetResponse {
    /// Build the model from the pieces of an HTTP response.
    ///
    /// Any status is accepted here; deciding whether the status is acceptable is up to the
    /// caller. An empty body yields no entries.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::MalformedXml`] if the body is not well-formed.
    /// - [`ProtocolError::NotMultistatus`] if the root element is not `DAV:multistatus`.
    pub fn parse(
        status: StatusCode,
        headers: HeaderMap,
        raw_body: Bytes,
    ) -> Result<Self, ProtocolError> {
        Self::parse_or_return_headers(status, headers, raw_body).map_err(|(err, _)| err)
    }

    /// Like [`parse`](Self::parse), but hands the headers back when the body is unusable.
    pub(crate) fn parse_or_return_headers(
        status: StatusCode,
        headers: HeaderMap,
        raw_body: Bytes,
    ) -> Result<Self, (ProtocolError, HeaderMap)> {
        let parsed = if raw_body.iter().all(u8::is_ascii_whitespace) {
            Ok((Vec::new(), Vec::new()))
        } else {
            parse_multistatus(&raw_body)
        };
        let (entries, malformed) = match parsed {
            Ok(parsed) => parsed,
            Err(err) => return Err((err, headers)),
        };

        for block in &malformed {
            log::warn!(
                "skipping malformed response block #{} ({}): {}",
                block.index,
                block.href.as_deref().unwrap_or("no href"),
                block.reason
            );
        }

        Ok(Self {
            status,
            headers,
            entries,
            malformed,
            raw_body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Entries in document order.
    pub fn entries(&self) -> &[ResponseEntry] {
        &self.entries
    }

    pub fn entry(&self, href: &str) -> Option<&ResponseEntry> {
        self.entries.iter().find(|e| e.href == href)
    }

    pub fn malformed(&self) -> &[MalformedBlock] {
        &self.malformed
    }

    /// The body exactly as received (after content decoding), for diagnostics.
    pub fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    pub fn into_entries(self) -> Vec<ResponseEntry> {
        self.entries
    }
}

/// Parse `HTTP/1.1 404 Not Found` into its status code.
pub(crate) fn parse_status_line(line: &str) -> Option<StatusCode> {
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    let code = parts.next()?.parse::<u16>().ok()?;
    StatusCode::from_u16(code).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementName {
    Multistatus,
    Response,
    Href,
    Status,
    Propstat,
    Prop,
    Other,
}

fn path_ends_with<T: PartialEq>(stack: &[T], needle: &[T]) -> bool {
    stack.len() >= needle.len() && stack[stack.len() - needle.len()..] == needle[..]
}

#[derive(Default)]
struct PropstatBuilder {
    status: Option<StatusCode>,
    props: Vec<(QualifiedName, PropertyValue)>,
}

#[derive(Default)]
struct BlockBuilder {
    hrefs: Vec<String>,
    status: Option<StatusCode>,
    propstats: Vec<PropstatBuilder>,
    problem: Option<String>,
}

impl BlockBuilder {
    fn flag(&mut self, reason: String) {
        // The first problem is the most useful one to report.
        self.problem.get_or_insert(reason);
    }

    /// Turn a finished `response` block into entries, or into diagnostics.
    ///
    /// The `href, href*, status` form yields one entry per href, all sharing the block status.
    /// The propstat form allows a single href: the first one gets the entry and every extra
    /// href is reported as malformed.
    fn finish(
        self,
        index: usize,
        entries: &mut Vec<ResponseEntry>,
        bad: &mut Vec<MalformedBlock>,
    ) {
        let malformed = |href: Option<String>, reason: &str| MalformedBlock {
            index,
            href,
            reason: reason.to_string(),
        };

        let mut hrefs = self.hrefs.into_iter();
        let first = hrefs.next();
        if let Some(problem) = self.problem {
            bad.push(malformed(first, &problem));
            bad.extend(hrefs.map(|href| malformed(Some(href), &problem)));
            return;
        }
        let Some(href) = first else {
            bad.push(malformed(None, "response without href"));
            return;
        };

        if self.propstats.is_empty() {
            let Some(status) = self.status else {
                bad.push(malformed(Some(href), "response without status or propstat"));
                return;
            };
            for href in std::iter::once(href).chain(hrefs) {
                entries.push(ResponseEntry {
                    href,
                    status,
                    properties: Vec::new(),
                });
            }
            return;
        }

        let mut statuses = Vec::with_capacity(self.propstats.len());
        for propstat in &self.propstats {
            match propstat.status {
                Some(status) => statuses.push(status),
                None => {
                    bad.push(malformed(Some(href), "propstat without status"));
                    return;
                }
            }
        }
        bad.extend(
            hrefs.map(|extra| malformed(Some(extra), "additional href in propstat response")),
        );

        let status = match self.status {
            Some(status) => status,
            None if statuses.iter().any(StatusCode::is_success) => StatusCode::OK,
            None => statuses[0],
        };

        let mut properties = Vec::new();
        for (propstat, status) in self.propstats.into_iter().zip(statuses) {
            for (name, value) in propstat.props {
                let result = if status.is_success() {
                    PropertyResult::Value(value)
                } else {
                    PropertyResult::Failed(status)
                };
                properties.push((name, result));
            }
        }

        entries.push(ResponseEntry {
            href,
            status,
            properties,
        });
    }
}

struct NodeBuilder {
    name: QualifiedName,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl NodeBuilder {
    fn finish(self) -> XmlElement {
        let value = if !self.children.is_empty() {
            PropertyValue::Elements(self.children)
        } else if self.text.trim().is_empty() {
            PropertyValue::Empty
        } else {
            PropertyValue::Text(self.text)
        };
        XmlElement {
            name: self.name,
            attributes: self.attributes,
            value,
        }
    }
}

struct MultistatusParser {
    stack: Vec<ElementName>,
    /// Open elements below a `prop`; non-empty while a property value is being captured.
    capture: Vec<NodeBuilder>,
    text: String,
    block: BlockBuilder,
    blocks_seen: usize,
    entries: Vec<ResponseEntry>,
    malformed: Vec<MalformedBlock>,
}

impl MultistatusParser {
    fn new() -> Self {
        Self {
            stack: Vec::with_capacity(16),
            capture: Vec::new(),
            text: String::new(),
            block: BlockBuilder::default(),
            blocks_seen: 0,
            entries: Vec::new(),
            malformed: Vec::new(),
        }
    }

    fn path_ends_with(&self, needle: &[ElementName]) -> bool {
        path_ends_with(&self.stack, needle)
    }

    fn on_start(
        &mut self,
        name: QualifiedName,
        attributes: Vec<(String, String)>,
    ) -> Result<(), ProtocolError> {
        if !self.capture.is_empty() || self.stack.last() == Some(&ElementName::Prop) {
            self.capture.push(NodeBuilder {
                name,
                attributes,
                text: String::new(),
                children: Vec::new(),
            });
            return Ok(());
        }

        let element = match self.stack.last() {
            None if name == names::MULTISTATUS => ElementName::Multistatus,
            None => {
                return Err(ProtocolError::NotMultistatus {
                    found: name.to_string(),
                });
            }
            Some(ElementName::Multistatus) if name == names::RESPONSE => {
                self.block = BlockBuilder::default();
                ElementName::Response
            }
            Some(ElementName::Response) if name == names::HREF => ElementName::Href,
            Some(ElementName::Response) if name == names::STATUS => ElementName::Status,
            Some(ElementName::Response) if name == names::PROPSTAT => {
                self.block.propstats.push(PropstatBuilder::default());
                ElementName::Propstat
            }
            Some(ElementName::Propstat) if name == names::PROP => ElementName::Prop,
            Some(ElementName::Propstat) if name == names::STATUS => ElementName::Status,
            _ => ElementName::Other,
        };
        self.text.clear();
        self.stack.push(element);
        Ok(())
    }

    fn on_end(&mut self) {
        if let Some(node) = self.capture.pop() {
            let element = node.finish();
            match self.capture.last_mut() {
                Some(parent) => parent.children.push(element),
                None => {
                    if let Some(propstat) = self.block.propstats.last_mut() {
                        propstat.props.push((element.name, element.value));
                    }
                }
            }
            return;
        }

        let in_propstat = self.path_ends_with(&[ElementName::Propstat, ElementName::Status]);
        let Some(element) = self.stack.pop() else {
            return;
        };

        match element {
            ElementName::Href if self.stack.last() == Some(&ElementName::Response) => {
                let href = self.text.trim();
                if href.is_empty() {
                    self.block.flag("empty href".to_string());
                } else {
                    self.block.hrefs.push(href.to_string());
                }
            }
            ElementName::Status => match parse_status_line(&self.text) {
                Some(status) if in_propstat => {
                    if let Some(propstat) = self.block.propstats.last_mut() {
                        propstat.status = Some(status);
                    }
                }
                Some(status) => self.block.status = Some(status),
                None => self
                    .block
                    .flag(format!("unparsable status line {:?}", self.text.trim())),
            },
            ElementName::Response => {
                let index = self.blocks_seen;
                self.blocks_seen += 1;
                std::mem::take(&mut self.block).finish(
                    index,
                    &mut self.entries,
                    &mut self.malformed,
                );
            }
            _ => {}
        }
        self.text.clear();
    }

    fn on_text(&mut self, text: &str) {
        if let Some(node) = self.capture.last_mut() {
            node.text.push_str(text);
        } else if matches!(
            self.stack.last(),
            Some(ElementName::Href) | Some(ElementName::Status)
        ) {
            self.text.push_str(text);
        }
    }

    fn is_done(&self) -> bool {
        self.stack.is_empty() && self.capture.is_empty()
    }
}

fn malformed_xml(position: u64, message: impl ToString) -> ProtocolError {
    ProtocolError::MalformedXml {
        position,
        message: message.to_string(),
    }
}

fn qualified(namespace: ResolveResult<'_>, local: &[u8]) -> Result<QualifiedName, String> {
    let namespace = match namespace {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).into_owned(),
        ResolveResult::Unbound => String::new(),
        ResolveResult::Unknown(prefix) => {
            return Err(format!(
                "undeclared namespace prefix {:?}",
                String::from_utf8_lossy(&prefix)
            ));
        }
    };
    Ok(QualifiedName::from_parts(
        namespace,
        String::from_utf8_lossy(local).into_owned(),
    ))
}

fn attributes(element: &BytesStart<'_>) -> Result<Vec<(String, String)>, String> {
    let mut out = Vec::new();
    for attr in element.attributes().with_checks(false) {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| format!("invalid attribute {key}: {e}"))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn decode_text(raw: &[u8]) -> Result<String, String> {
    match std::str::from_utf8(raw) {
        Ok(s) => Ok(unescape(s).map_err(|e| e.to_string())?.into_owned()),
        Err(_) => Ok(String::from_utf8_lossy(raw).into_owned()),
    }
}

fn parse_multistatus(
    body: &[u8],
) -> Result<(Vec<ResponseEntry>, Vec<MalformedBlock>), ProtocolError> {
    let mut reader = NsReader::from_reader(body);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(8 * 1024);
    let mut parser = MultistatusParser::new();

    loop {
        buf.clear();
        let position = reader.buffer_position() as u64;
        let (namespace, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| malformed_xml(position, e))?;

        match event {
            Event::Start(e) => {
                let name = qualified(namespace, e.local_name().as_ref())
                    .map_err(|m| malformed_xml(position, m))?;
                let attrs = attributes(&e).map_err(|m| malformed_xml(position, m))?;
                parser.on_start(name, attrs)?;
            }
            Event::Empty(e) => {
                let name = qualified(namespace, e.local_name().as_ref())
                    .map_err(|m| malformed_xml(position, m))?;
                let attrs = attributes(&e).map_err(|m| malformed_xml(position, m))?;
                parser.on_start(name, attrs)?;
                parser.on_end();
            }
            Event::End(_) => parser.on_end(),
            Event::Text(e) => {
                let text = decode_text(e.as_ref()).map_err(|m| malformed_xml(position, m))?;
                parser.on_text(&text);
            }
            Event::CData(e) => parser.on_text(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                let reference = format!("&{};", String::from_utf8_lossy(e.as_ref()));
                let text = decode_text(reference.as_bytes())
                    .map_err(|m| malformed_xml(position, m))?;
                parser.on_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !parser.is_done() {
        return Err(malformed_xml(
            reader.buffer_position() as u64,
            "unexpected end of document",
        ));
    }
    Ok((parser.entries, parser.malformed))
}
