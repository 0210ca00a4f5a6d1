use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use hyper::http::uri::Authority;
use hyper::{HeaderMap, Method, Response, Uri, header};
use tokio::time::{Duration, timeout};

use crate::common::compression::add_accept_encoding;
use crate::error::{Error, NetworkError, Result, UsageError};
use crate::webdav::transport::{HyperTransport, Transport};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// HTTP method of every multiget request.
pub const REPORT: &str = "REPORT";

/// Everything needed to reach one DAV server: where, how, and as whom.
///
/// Produced by whatever bootstraps the account (discovery, credential prompts); this crate
/// only consumes it.
#[derive(Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: Option<u16>,
    pub tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Deadline for a single exchange, connection setup included.
    pub timeout: Duration,
}

impl SessionConfig {
    /// TLS on, default port, no credentials, 20 second deadline.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            tls: true,
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Derive host, port and TLS flag from a URL such as `https://dav.example.com:8443/`.
    ///
    /// The path of the URL is ignored; collections are addressed per request.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::InvalidAuthority`] if the URL does not parse, has no host, or uses a
    /// scheme other than `http`/`https`.
    pub fn from_url(url: &str) -> Result<Self, UsageError> {
        let uri: Uri = url
            .parse()
            .map_err(|_| UsageError::InvalidAuthority(url.to_string()))?;
        let host = uri
            .host()
            .ok_or_else(|| UsageError::InvalidAuthority(url.to_string()))?;
        let tls = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            _ => return Err(UsageError::InvalidAuthority(url.to_string())),
        };

        let mut config = Self::new(host);
        config.port = uri.port_u16();
        config.tls = tls;
        Ok(config)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// One logical connection context to a DAV server.
///
/// A session performs exactly one exchange per [`send`](Session::send) call and never retries.
/// It may be shared by reference, but it makes no promise about how concurrent exchanges map
/// onto connections; callers that need ordering serialize their calls themselves.
pub struct Session<T = HyperTransport> {
    authority: Authority,
    tls: bool,
    auth_header: Option<header::HeaderValue>,
    default_timeout: Duration,
    transport: T,
}

impl Session<HyperTransport> {
    /// Create a session backed by the default hyper transport.
    ///
    /// # Errors
    ///
    /// Returns a usage violation if the host/port do not form a valid authority, or if the
    /// credentials cannot be encoded into a header.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_transport(config, HyperTransport::new())
    }
}

impl<T: Transport> Session<T> {
    /// Create a session that delegates exchanges to `transport`.
    ///
    /// # Errors
    ///
    /// See [`Session::new`].
    pub fn with_transport(config: SessionConfig, transport: T) -> Result<Self> {
        let raw = match config.port {
            Some(port) => format!("{}:{port}", config.host),
            None => config.host.clone(),
        };
        let authority: Authority = raw
            .parse()
            .map_err(|_| UsageError::InvalidAuthority(raw.clone()))?;

        let auth_header = if let (Some(u), Some(p)) = (&config.username, &config.password) {
            let token = format!("{u}:{p}");
            let val = format!("Basic {}", B64.encode(token));
            let mut val = header::HeaderValue::from_str(&val)
                .map_err(|_| UsageError::InvalidAuthority(raw.clone()))?;
            val.set_sensitive(true);
            Some(val)
        } else {
            None
        };

        Ok(Self {
            authority,
            tls: config.tls,
            auth_header,
            default_timeout: config.timeout,
            transport,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    pub fn timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve `path` against this session's scheme and authority.
    ///
    /// Absolute `http(s)://` URLs are accepted as-is; anything else is treated as a path on
    /// this server, with a leading `/` added when missing.
    pub fn build_uri(&self, path: &str) -> Result<Uri> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path
                .parse()
                .map_err(|_| UsageError::InvalidAuthority(path.to_string()).into());
        }

        let path_and_query = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Uri::builder()
            .scheme(if self.tls { "https" } else { "http" })
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|_| UsageError::InvalidAuthority(format!("{}{path}", self.authority)).into())
    }

    /// Perform one exchange and return the aggregated (decoded) response.
    ///
    /// Any transport error, and an expired deadline, is reported as [`Error::Network`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        mut headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Response<Bytes>> {
        let uri = self.build_uri(path)?;
        add_accept_encoding(&mut headers);
        if let Some(auth) = &self.auth_header {
            headers.insert(header::AUTHORIZATION, auth.clone());
        }
        if body.is_some() && !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static(XML_CONTENT_TYPE),
            );
        }

        let body = body.unwrap_or_default();
        log::debug!("{method} {uri} ({} bytes)", body.len());

        let mut req = hyper::Request::new(body);
        *req.method_mut() = method.clone();
        *req.uri_mut() = uri.clone();
        *req.headers_mut() = headers;

        let resp = timeout(self.default_timeout, self.transport.exchange(req))
            .await
            .map_err(|_| NetworkError::Timeout(self.default_timeout))?
            .map_err(Error::network)?;

        log::debug!(
            "{method} {uri} -> {} ({} bytes)",
            resp.status(),
            resp.body().len()
        );
        Ok(resp)
    }

    /// Send a WebDAV `REPORT` with an XML body.
    pub async fn report(&self, path: &str, xml_body: String) -> Result<Response<Bytes>> {
        let mut h = HeaderMap::new();
        h.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(XML_CONTENT_TYPE),
        );
        let method = Method::from_bytes(REPORT.as_bytes()).map_err(Error::network)?;
        self.send(method, path, h, Some(Bytes::from(xml_body)))
            .await
    }
}
