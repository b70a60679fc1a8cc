//! Scalar request renderers

use crate::context::ContextAccessor;
use crate::renderer::{FieldRenderer, LayoutRenderer};
use serde::Deserialize;

/// `request-method`: the HTTP method
pub fn request_method() -> FieldRenderer {
    FieldRenderer::new("request-method", |ctx| ctx.method())
}

/// `request-protocol`: the protocol version, e.g. `HTTP/1.1`
pub fn request_protocol() -> FieldRenderer {
    FieldRenderer::new("request-protocol", |ctx| ctx.protocol())
}

/// `request-host`: the host name of the request URL
pub fn request_host() -> FieldRenderer {
    FieldRenderer::new("request-host", |ctx| ctx.url().and_then(|url| url.host))
}

/// `request-local-ip`: the local address the request arrived on
pub fn local_ip() -> FieldRenderer {
    FieldRenderer::new("request-local-ip", |ctx| {
        ctx.local_addr().map(|addr| addr.ip().to_string())
    })
}

/// `request-traceidentifier`: the per-request correlation id
pub fn trace_identifier() -> FieldRenderer {
    FieldRenderer::new("request-traceidentifier", |ctx| ctx.trace_identifier())
}

/// A single request header value
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderRenderer {
    /// Header to render, matched case-insensitively
    pub header_name: String,
}

impl HeaderRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-header";

    /// Render the named header
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
        }
    }

    /// The `User-Agent` header
    pub fn user_agent() -> Self {
        Self::new("user-agent")
    }

    /// The `Referer` header
    pub fn referrer() -> Self {
        Self::new("referer")
    }

    /// The `Content-Type` header
    pub fn content_type() -> Self {
        Self::new("content-type")
    }
}

impl LayoutRenderer for HeaderRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if self.header_name.is_empty() {
            return;
        }
        if let Some(value) = ctx.request_header(&self.header_name) {
            out.push_str(&value);
        }
    }
}

/// A single route parameter value
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteParameterRenderer {
    /// Parameter name
    pub name: String,
}

impl RouteParameterRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-routeparameter";

    /// Render the named parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl LayoutRenderer for RouteParameterRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(value) = lookup(ctx.route_values(), &self.name) {
            out.push_str(&value);
        }
    }
}

/// A single request-scoped item
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemRenderer {
    /// Item key
    pub item: String,
}

impl ItemRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-item";

    /// Render the item stored under `item`
    pub fn new(item: impl Into<String>) -> Self {
        Self { item: item.into() }
    }
}

impl LayoutRenderer for ItemRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(value) = lookup(ctx.items(), &self.item) {
            out.push_str(&value);
        }
    }
}

fn lookup(pairs: Option<Vec<(String, String)>>, key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    pairs?
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value)
}

/// The request URL, assembled from selected components
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UrlRenderer {
    /// Include `scheme://` (only when the host is rendered)
    pub include_scheme: bool,
    /// Include the host name
    pub include_host: bool,
    /// Include a non-default port
    pub include_port: bool,
    /// Include the path
    pub include_path: bool,
    /// Include `?query`
    pub include_query_string: bool,
}

impl Default for UrlRenderer {
    fn default() -> Self {
        Self {
            include_scheme: true,
            include_host: true,
            include_port: true,
            include_path: true,
            include_query_string: false,
        }
    }
}

impl UrlRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-url";

    /// Render scheme, host, port and path
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the scheme is rendered
    pub fn include_scheme(mut self, include: bool) -> Self {
        self.include_scheme = include;
        self
    }

    /// Set whether the host is rendered
    pub fn include_host(mut self, include: bool) -> Self {
        self.include_host = include;
        self
    }

    /// Set whether a non-default port is rendered
    pub fn include_port(mut self, include: bool) -> Self {
        self.include_port = include;
        self
    }

    /// Set whether the path is rendered
    pub fn include_path(mut self, include: bool) -> Self {
        self.include_path = include;
        self
    }

    /// Set whether the query string is rendered
    pub fn include_query_string(mut self, include: bool) -> Self {
        self.include_query_string = include;
        self
    }
}

impl LayoutRenderer for UrlRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        let Some(url) = ctx.url() else {
            return;
        };

        if self.include_host {
            if let Some(host) = url.host.as_deref() {
                if self.include_scheme {
                    out.push_str(&url.scheme);
                    out.push_str("://");
                }
                out.push_str(host);
                if self.include_port && !url.is_default_port() {
                    if let Some(port) = url.port {
                        out.push(':');
                        out.push_str(&port.to_string());
                    }
                }
            }
        }
        if self.include_path {
            out.push_str(&url.path);
        }
        if self.include_query_string {
            if let Some(query) = url.query.as_deref().filter(|q| !q.is_empty()) {
                out.push('?');
                out.push_str(query);
            }
        }
    }
}

/// Client IP address, optionally honoring a forwarding header
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteIpRenderer {
    /// Prefer the first address of the forwarding header when present
    pub check_forwarded_header: bool,
    /// Name of the forwarding header
    pub forwarded_header: String,
}

impl Default for RemoteIpRenderer {
    fn default() -> Self {
        Self {
            check_forwarded_header: true,
            forwarded_header: "X-Forwarded-For".to_string(),
        }
    }
}

impl RemoteIpRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-ip";

    /// Honor `X-Forwarded-For`, fall back to the peer address
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the forwarding header is consulted
    pub fn check_forwarded_header(mut self, check: bool) -> Self {
        self.check_forwarded_header = check;
        self
    }

    /// Set the forwarding header name
    pub fn forwarded_header(mut self, header: impl Into<String>) -> Self {
        self.forwarded_header = header.into();
        self
    }

    fn forwarded_ip(&self, ctx: &dyn ContextAccessor) -> Option<String> {
        if !self.check_forwarded_header || self.forwarded_header.is_empty() {
            return None;
        }
        let value = ctx.request_header(&self.forwarded_header)?;
        value
            .split(',')
            .map(str::trim)
            .find(|addr| !addr.is_empty())
            .map(String::from)
    }
}

impl LayoutRenderer for RemoteIpRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        let ip = self
            .forwarded_ip(ctx)
            .or_else(|| ctx.remote_addr().map(|addr| addr.ip().to_string()));
        if let Some(ip) = ip {
            out.push_str(&ip);
        }
    }
}

/// Unit used by [`DurationRenderer`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Whole milliseconds, e.g. `1234`
    #[default]
    #[serde(alias = "ms")]
    Milliseconds,
    /// Seconds with millisecond precision, e.g. `1.234`
    #[serde(alias = "s")]
    Seconds,
}

/// Time elapsed since the request started
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DurationRenderer {
    /// Output unit
    pub unit: DurationUnit,
}

impl DurationRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-duration";

    /// Render whole milliseconds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output unit
    pub fn unit(mut self, unit: DurationUnit) -> Self {
        self.unit = unit;
        self
    }
}

impl LayoutRenderer for DurationRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        let Some(elapsed) = ctx.elapsed() else {
            return;
        };
        let rendered = match self.unit {
            DurationUnit::Milliseconds => elapsed.as_millis().to_string(),
            DurationUnit::Seconds => format!("{:.3}", elapsed.as_secs_f64()),
        };
        out.push_str(&rendered);
    }
}
