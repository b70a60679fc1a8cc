//! The request/response context capability
//!
//! [`ContextAccessor`] is the single seam between renderers and a host web
//! framework. Every lookup is optional: an accessor with no active request
//! simply reports nothing, and renderers turn that into an empty string.
//!
//! Only the session and response lookups can fail, since those host objects
//! may be torn down while a log write is still in flight.

use crate::error::ContextResult;
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::time::Duration;

/// Ordered key/value pairs as read from the host
///
/// Keys are not unique. A multi-valued key appears once per value.
pub type Pairs = Vec<(String, String)>;

/// Decomposed request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    /// Scheme such as `http` or `https`
    pub scheme: String,
    /// Host name, if known
    pub host: Option<String>,
    /// Explicit port, if one was given
    pub port: Option<u16>,
    /// Path component, always starting with `/`
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
}

impl RequestUrl {
    /// Create a URL from a scheme and path
    pub fn new(scheme: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: None,
            port: None,
            path: path.into(),
            query: None,
        }
    }

    /// Set the host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the explicit port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the raw query string
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Whether the explicit port is the default one for the scheme
    pub fn is_default_port(&self) -> bool {
        matches!(
            (self.scheme.as_str(), self.port),
            (_, None) | ("http", Some(80)) | ("https", Some(443))
        )
    }
}

/// A single claim about the current user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Claim type, e.g. `email` or `role`
    pub claim_type: String,
    /// Claim value
    pub value: String,
}

impl Claim {
    /// Create a claim
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// The authenticated (or anonymous) user behind a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// User name
    pub name: Option<String>,
    /// Authentication scheme that produced this identity
    pub authentication_type: Option<String>,
    /// Whether the user is authenticated
    pub is_authenticated: bool,
    /// Claims in the order the host issued them
    pub claims: Vec<Claim>,
}

impl Identity {
    /// Create an anonymous identity
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create an authenticated identity with the given name and scheme
    pub fn authenticated(name: impl Into<String>, authentication_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            authentication_type: Some(authentication_type.into()),
            is_authenticated: true,
            claims: Vec::new(),
        }
    }

    /// Add a claim
    pub fn claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(claim_type, value));
        self
    }

    /// First claim of the given type
    pub fn find_claim(&self, claim_type: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.claim_type == claim_type)
    }
}

/// Client certificate presented during the TLS handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    /// Subject distinguished name
    pub subject: String,
    /// Issuer distinguished name
    pub issuer: String,
    /// Hex thumbprint
    pub thumbprint: String,
    /// Serial number
    pub serial_number: String,
    /// Start of the validity period
    pub not_before: Option<DateTime<Utc>>,
    /// End of the validity period
    pub not_after: Option<DateTime<Utc>>,
}

impl ClientCertificate {
    /// Fields as ordered pairs, timestamps in RFC 3339
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("subject", self.subject.clone()),
            ("issuer", self.issuer.clone()),
            ("thumbprint", self.thumbprint.clone()),
            ("serialNumber", self.serial_number.clone()),
        ];
        if let Some(not_before) = self.not_before {
            pairs.push(("notBefore", not_before.to_rfc3339()));
        }
        if let Some(not_after) = self.not_after {
            pairs.push(("notAfter", not_after.to_rfc3339()));
        }
        pairs
    }
}

/// Read access to the current request/response
///
/// All methods default to "absent", so an implementation only overrides the
/// categories its host can provide. Implementations must never panic.
pub trait ContextAccessor: Send + Sync {
    /// HTTP method
    fn method(&self) -> Option<String> {
        None
    }

    /// Request URL
    fn url(&self) -> Option<RequestUrl> {
        None
    }

    /// Protocol version, e.g. `HTTP/1.1`
    fn protocol(&self) -> Option<String> {
        None
    }

    /// All request headers in arrival order
    fn request_headers(&self) -> Option<Pairs> {
        None
    }

    /// First value of a request header, matched case-insensitively
    fn request_header(&self, name: &str) -> Option<String> {
        self.request_headers()?
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Request cookies
    fn cookies(&self) -> Option<Pairs> {
        None
    }

    /// Decoded query string parameters
    fn query(&self) -> Option<Pairs> {
        None
    }

    /// Decoded form fields
    fn form(&self) -> Option<Pairs> {
        None
    }

    /// Values captured by the router
    fn route_values(&self) -> Option<Pairs> {
        None
    }

    /// Request-scoped items
    fn items(&self) -> Option<Pairs> {
        None
    }

    /// Address of the remote peer
    fn remote_addr(&self) -> Option<SocketAddr> {
        None
    }

    /// Local address the request arrived on
    fn local_addr(&self) -> Option<SocketAddr> {
        None
    }

    /// Time elapsed since the request started
    fn elapsed(&self) -> Option<Duration> {
        None
    }

    /// Identifier used to correlate log lines of one request
    fn trace_identifier(&self) -> Option<String> {
        None
    }

    /// Current user
    fn identity(&self) -> Option<Identity> {
        None
    }

    /// Session identifier
    fn session_id(&self) -> ContextResult<Option<String>> {
        Ok(None)
    }

    /// Session value stored under `key`
    fn session_value(&self, _key: &str) -> ContextResult<Option<String>> {
        Ok(None)
    }

    /// Client certificate
    fn client_certificate(&self) -> Option<ClientCertificate> {
        None
    }

    /// Response status code
    fn response_status(&self) -> ContextResult<Option<u16>> {
        Ok(None)
    }

    /// Response headers
    fn response_headers(&self) -> ContextResult<Option<Pairs>> {
        Ok(None)
    }
}

/// An accessor with no active request
///
/// Every lookup reports absence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl ContextAccessor for NoContext {}
