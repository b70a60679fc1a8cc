//! [`ContextAccessor`] over `http` request and response types

use crate::extensions::{
    ClientAddr, LocalAddr, RequestItems, RequestStart, RouteParams, TraceIdentifier,
};
use crate::session::Session;
use cookie::Cookie;
use http::header::{CONTENT_TYPE, COOKIE, HOST};
use http::uri::Authority;
use http::{
    request, response, Extensions, HeaderMap, Method, Request, Response, StatusCode, Uri, Version,
};
use reqlog_core::{
    ClientCertificate, ContextAccessor, ContextError, ContextResult, Identity, Pairs, RequestUrl,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Header consulted for a trace identifier when no [`TraceIdentifier`] extension is set
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone, Copy)]
struct RequestView<'a> {
    method: &'a Method,
    uri: &'a Uri,
    version: Version,
    headers: &'a HeaderMap,
    extensions: &'a Extensions,
    body: Option<&'a [u8]>,
}

#[derive(Clone, Copy)]
struct ResponseView<'a> {
    status: StatusCode,
    headers: &'a HeaderMap,
}

/// Context over a borrowed HTTP request and, once available, its response
///
/// # Example
///
/// ```rust
/// use reqlog_core::{CookieRenderer, LayoutRenderer};
/// use reqlog_http::HttpContext;
///
/// let request = http::Request::builder()
///     .uri("/cart")
///     .header("cookie", "key=TEST; Key1=TEST1")
///     .body(())
///     .unwrap();
///
/// let ctx = HttpContext::from_request(&request);
/// assert_eq!(CookieRenderer::new().render(&ctx), "key=TEST,Key1=TEST1");
/// ```
#[derive(Clone, Copy, Default)]
pub struct HttpContext<'a> {
    request: Option<RequestView<'a>>,
    response: Option<ResponseView<'a>>,
}

impl<'a> HttpContext<'a> {
    /// A context with no active request
    pub fn detached() -> Self {
        Self::default()
    }

    /// Context over a full request
    ///
    /// The body is not read. Use [`with_body`](Self::with_body) to expose form data.
    pub fn from_request<B>(request: &'a Request<B>) -> Self {
        Self {
            request: Some(RequestView {
                method: request.method(),
                uri: request.uri(),
                version: request.version(),
                headers: request.headers(),
                extensions: request.extensions(),
                body: None,
            }),
            response: None,
        }
    }

    /// Context over request parts
    pub fn from_parts(parts: &'a request::Parts) -> Self {
        Self {
            request: Some(RequestView {
                method: &parts.method,
                uri: &parts.uri,
                version: parts.version,
                headers: &parts.headers,
                extensions: &parts.extensions,
                body: None,
            }),
            response: None,
        }
    }

    /// Attach the buffered request body
    pub fn with_body(mut self, body: &'a [u8]) -> Self {
        if let Some(request) = self.request.as_mut() {
            request.body = Some(body);
        }
        self
    }

    /// Attach the response
    pub fn with_response<B>(mut self, response: &'a Response<B>) -> Self {
        self.response = Some(ResponseView {
            status: response.status(),
            headers: response.headers(),
        });
        self
    }

    /// Attach response parts
    pub fn with_response_parts(mut self, parts: &'a response::Parts) -> Self {
        self.response = Some(ResponseView {
            status: parts.status,
            headers: &parts.headers,
        });
        self
    }

    /// Check if a request is attached
    pub fn is_active(&self) -> bool {
        self.request.is_some()
    }

    fn extension<T: Send + Sync + 'static>(&self) -> Option<&'a T> {
        self.request.and_then(|request| request.extensions.get::<T>())
    }

    fn session(&self) -> ContextResult<Option<&'a Arc<Session>>> {
        match self.request {
            None => Ok(None),
            Some(request) => request
                .extensions
                .get::<Arc<Session>>()
                .map(Some)
                .ok_or(ContextError::Unavailable("session")),
        }
    }

    fn is_form(&self) -> bool {
        self.request
            .and_then(|request| request.headers.get(CONTENT_TYPE))
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
            .unwrap_or(false)
    }
}

/// UTF-8 headers as owned pairs, in map order
fn header_pairs(headers: &HeaderMap) -> Pairs {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

/// Every cookie of every `Cookie` header, unparseable fragments skipped
fn cookie_pairs(headers: &HeaderMap) -> Pairs {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| {
            Cookie::split_parse(header)
                .filter_map(|cookie| cookie.ok())
                .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn decode_urlencoded(input: &[u8], source: &'static str) -> Option<Pairs> {
    match serde_urlencoded::from_bytes::<Pairs>(input) {
        Ok(pairs) => Some(pairs),
        Err(error) => {
            tracing::debug!(source, error = %error, "unable to decode urlencoded data");
            None
        }
    }
}

impl ContextAccessor for HttpContext<'_> {
    fn method(&self) -> Option<String> {
        self.request.map(|request| request.method.as_str().to_string())
    }

    fn url(&self) -> Option<RequestUrl> {
        let request = self.request?;
        let uri = request.uri;
        let authority = uri.authority().cloned().or_else(|| {
            request
                .headers
                .get(HOST)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<Authority>().ok())
        });

        let mut url = RequestUrl::new(uri.scheme_str().unwrap_or("http"), uri.path());
        if let Some(authority) = authority {
            url = url.host(authority.host());
            if let Some(port) = authority.port_u16() {
                url = url.port(port);
            }
        }
        if let Some(query) = uri.query() {
            url = url.query(query);
        }
        Some(url)
    }

    fn protocol(&self) -> Option<String> {
        self.request.map(|request| format!("{:?}", request.version))
    }

    fn request_headers(&self) -> Option<Pairs> {
        self.request.map(|request| header_pairs(request.headers))
    }

    fn request_header(&self, name: &str) -> Option<String> {
        self.request?
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    }

    fn cookies(&self) -> Option<Pairs> {
        self.request.map(|request| cookie_pairs(request.headers))
    }

    fn query(&self) -> Option<Pairs> {
        let query = self.request?.uri.query()?;
        decode_urlencoded(query.as_bytes(), "query")
    }

    fn form(&self) -> Option<Pairs> {
        if !self.is_form() {
            return None;
        }
        decode_urlencoded(self.request?.body?, "form")
    }

    fn route_values(&self) -> Option<Pairs> {
        self.extension::<RouteParams>().map(RouteParams::to_pairs)
    }

    fn items(&self) -> Option<Pairs> {
        self.extension::<RequestItems>().map(RequestItems::to_pairs)
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.extension::<ClientAddr>().map(|addr| addr.0)
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.extension::<LocalAddr>().map(|addr| addr.0)
    }

    fn elapsed(&self) -> Option<Duration> {
        self.extension::<RequestStart>().map(RequestStart::elapsed)
    }

    fn trace_identifier(&self) -> Option<String> {
        self.extension::<TraceIdentifier>()
            .map(|id| id.as_str().to_string())
            .or_else(|| self.request_header(REQUEST_ID_HEADER))
    }

    fn identity(&self) -> Option<Identity> {
        self.extension::<Identity>().cloned()
    }

    fn session_id(&self) -> ContextResult<Option<String>> {
        match self.session()? {
            Some(session) => session.id().map(|id| Some(id.to_string())),
            None => Ok(None),
        }
    }

    fn session_value(&self, key: &str) -> ContextResult<Option<String>> {
        match self.session()? {
            Some(session) => session.get(key),
            None => Ok(None),
        }
    }

    fn client_certificate(&self) -> Option<ClientCertificate> {
        self.extension::<ClientCertificate>().cloned()
    }

    fn response_status(&self) -> ContextResult<Option<u16>> {
        Ok(self.response.map(|response| response.status.as_u16()))
    }

    fn response_headers(&self) -> ContextResult<Option<Pairs>> {
        Ok(self.response.map(|response| header_pairs(response.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use http::HeaderValue;
    use proptest::prelude::*;
    use reqlog_core::{
        CookieRenderer, LayoutRenderer, OutputFormat, QueryStringRenderer, SerializationOptions,
    };
    use std::net::{IpAddr, Ipv4Addr};

    fn pairs(items: &[(&str, &str)]) -> Pairs {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_detached_reports_absence() {
        let ctx = HttpContext::detached();
        assert!(!ctx.is_active());
        assert!(ctx.method().is_none());
        assert!(ctx.cookies().is_none());
        assert_eq!(ctx.session_id(), Ok(None));
        assert_eq!(ctx.response_status(), Ok(None));
    }

    #[test]
    fn test_method_protocol_and_url() {
        let request = Request::builder()
            .method("POST")
            .uri("https://example.com:8443/api/items?q=1")
            .version(Version::HTTP_2)
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&request);

        assert_eq!(ctx.method(), Some("POST".to_string()));
        assert_eq!(ctx.protocol(), Some("HTTP/2.0".to_string()));
        assert_eq!(
            ctx.url(),
            Some(
                RequestUrl::new("https", "/api/items")
                    .host("example.com")
                    .port(8443)
                    .query("q=1")
            )
        );
    }

    #[test]
    fn test_url_host_falls_back_to_host_header() {
        let request = Request::builder()
            .uri("/index.html")
            .header(HOST, "localhost:3000")
            .body(())
            .unwrap();
        let url = HttpContext::from_request(&request).url().unwrap();

        assert_eq!(url.scheme, "http");
        assert_eq!(url.host.as_deref(), Some("localhost"));
        assert_eq!(url.port, Some(3000));
        assert_eq!(url.path, "/index.html");
    }

    #[test]
    fn test_headers_skip_non_utf8_values() {
        let mut request = Request::builder()
            .uri("/")
            .header("accept", "text/html")
            .body(())
            .unwrap();
        request.headers_mut().insert(
            "x-binary",
            HeaderValue::from_bytes(&[0xfa, 0xfb]).unwrap(),
        );
        let ctx = HttpContext::from_request(&request);

        assert_eq!(ctx.request_headers(), Some(pairs(&[("accept", "text/html")])));
        assert_eq!(ctx.request_header("Accept"), Some("text/html".to_string()));
        assert_eq!(ctx.request_header("x-binary"), None);
        assert_eq!(ctx.request_header("not a header"), None);
    }

    #[test]
    fn test_cookies_from_every_cookie_header() {
        let request = Request::builder()
            .uri("/")
            .header(COOKIE, "a=1; b=2")
            .header(COOKIE, "a=3; =broken")
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&request);

        assert_eq!(ctx.cookies(), Some(pairs(&[("a", "1"), ("b", "2"), ("a", "3")])));
    }

    #[test]
    fn test_query_is_decoded_in_order() {
        let request = Request::builder()
            .uri("/search?q=hello+world&tag=a&tag=b")
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&request);

        assert_eq!(
            ctx.query(),
            Some(pairs(&[("q", "hello world"), ("tag", "a"), ("tag", "b")]))
        );
    }

    #[test]
    fn test_query_absent_without_query_string() {
        let request = Request::builder().uri("/").body(()).unwrap();
        assert!(HttpContext::from_request(&request).query().is_none());
    }

    #[test]
    fn test_form_requires_urlencoded_content_type() {
        let body = b"name=Ann&city=Oslo%20Sentrum";
        let request = Request::builder()
            .method("POST")
            .uri("/submit")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&request).with_body(body);
        assert_eq!(ctx.form(), Some(pairs(&[("name", "Ann"), ("city", "Oslo Sentrum")])));

        let json = Request::builder()
            .method("POST")
            .uri("/submit")
            .header(CONTENT_TYPE, "application/json")
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&json).with_body(br#"{"name":"Ann"}"#);
        assert!(ctx.form().is_none());
    }

    #[test]
    fn test_form_from_buffered_bytes_body() {
        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Bytes::from_static(b"a=1&a=2"))
            .unwrap();
        let ctx = HttpContext::from_request(&request).with_body(request.body());
        assert_eq!(ctx.form(), Some(pairs(&[("a", "1"), ("a", "2")])));
    }

    #[test]
    fn test_form_absent_without_body() {
        let request = Request::builder()
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(())
            .unwrap();
        assert!(HttpContext::from_request(&request).form().is_none());
    }

    #[test]
    fn test_extensions_are_exposed() {
        let peer = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 51000);
        let local = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);
        let mut items = RequestItems::new();
        items.insert("tenant", "acme");

        let request = Request::builder()
            .uri("/orders/42")
            .extension(RouteParams::from_iter([("id", "42")]))
            .extension(items)
            .extension(ClientAddr(peer))
            .extension(LocalAddr(local))
            .extension(RequestStart::now())
            .extension(TraceIdentifier::new("trace-1"))
            .extension(Identity::authenticated("alice", "Bearer"))
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&request);

        assert_eq!(ctx.route_values(), Some(pairs(&[("id", "42")])));
        assert_eq!(ctx.items(), Some(pairs(&[("tenant", "acme")])));
        assert_eq!(ctx.remote_addr(), Some(peer));
        assert_eq!(ctx.local_addr(), Some(local));
        assert!(ctx.elapsed().is_some());
        assert_eq!(ctx.trace_identifier(), Some("trace-1".to_string()));
        assert_eq!(ctx.identity().and_then(|i| i.name), Some("alice".to_string()));
    }

    #[test]
    fn test_trace_identifier_falls_back_to_request_id_header() {
        let request = Request::builder()
            .uri("/")
            .header("X-Request-Id", "req-77")
            .body(())
            .unwrap();
        assert_eq!(
            HttpContext::from_request(&request).trace_identifier(),
            Some("req-77".to_string())
        );
    }

    #[test]
    fn test_session_lookups() {
        let session = Arc::new(Session::with_id("s-1"));
        session.insert("cart", "3").unwrap();
        let request = Request::builder()
            .uri("/")
            .extension(Arc::clone(&session))
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&request);

        assert_eq!(ctx.session_id(), Ok(Some("s-1".to_string())));
        assert_eq!(ctx.session_value("cart"), Ok(Some("3".to_string())));

        session.close();
        assert_eq!(ctx.session_value("cart"), Err(ContextError::Disposed("session")));
    }

    #[test]
    fn test_session_unavailable_without_extension() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let ctx = HttpContext::from_request(&request);
        assert_eq!(ctx.session_id(), Err(ContextError::Unavailable("session")));
    }

    #[test]
    fn test_response_status_and_headers() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let response = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("content-type", "text/plain")
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&request).with_response(&response);

        assert_eq!(ctx.response_status(), Ok(Some(404)));
        assert_eq!(
            ctx.response_headers(),
            Ok(Some(pairs(&[("content-type", "text/plain")])))
        );
    }

    #[test]
    fn test_from_parts_matches_from_request() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/items/1?force=true")
            .body(())
            .unwrap();
        let (parts, _) = request.into_parts();
        let ctx = HttpContext::from_parts(&parts);

        assert_eq!(ctx.method(), Some("DELETE".to_string()));
        assert_eq!(ctx.query(), Some(pairs(&[("force", "true")])));
    }

    #[test]
    fn test_response_parts() {
        let (parts, _) = Response::builder()
            .status(StatusCode::CREATED)
            .body(())
            .unwrap()
            .into_parts();
        let ctx = HttpContext::detached().with_response_parts(&parts);
        assert_eq!(ctx.response_status(), Ok(Some(201)));
    }

    #[test]
    fn test_client_certificate_extension() {
        let not_before = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single();
        let request = Request::builder()
            .extension(ClientCertificate {
                subject: "CN=client".to_string(),
                issuer: "CN=ca".to_string(),
                thumbprint: "FF00".to_string(),
                serial_number: "2A".to_string(),
                not_before,
                not_after: None,
            })
            .body(())
            .unwrap();
        let ctx = HttpContext::from_request(&request);

        let certificate = ctx.client_certificate().unwrap();
        assert_eq!(certificate.subject, "CN=client");
        assert_eq!(certificate.not_before, not_before);
        assert!(HttpContext::detached().client_certificate().is_none());
    }

    fn as_pairs(parsed: &serde_json::Value) -> Vec<(String, String)> {
        parsed
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|item| item.as_object().unwrap().clone())
            .map(|(k, v)| (k, v.as_str().unwrap().to_string()))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Cookies come back from the request header in order as JSON objects
        #[test]
        fn prop_cookies_render_as_json_in_order(
            cookies in prop::collection::vec(("[a-zA-Z][a-zA-Z0-9_]{0,8}", "[a-zA-Z0-9_.-]{0,12}"), 1..6)
        ) {
            let header = cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            let request = Request::builder().header(COOKIE, header).body(()).unwrap();
            let ctx = HttpContext::from_request(&request);

            let rendered = CookieRenderer::new()
                .with_options(SerializationOptions::new(OutputFormat::JsonArray))
                .render(&ctx);
            let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
            prop_assert_eq!(as_pairs(&parsed), cookies);
        }

        /// Query parameters come back decoded in order, repeated keys included
        #[test]
        fn prop_query_renders_as_json_in_order(
            params in prop::collection::vec(("[a-z]{1,6}", "[a-zA-Z0-9]{0,8}"), 1..6)
        ) {
            let query = params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            let request = Request::builder()
                .uri(format!("/search?{query}"))
                .body(())
                .unwrap();
            let ctx = HttpContext::from_request(&request);

            let rendered = QueryStringRenderer::new()
                .with_options(SerializationOptions::new(OutputFormat::JsonArray))
                .render(&ctx);
            let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
            prop_assert_eq!(as_pairs(&parsed), params);
        }
    }
}
