//! Owned request/response snapshot
//!
//! [`SnapshotContext`] is a [`ContextAccessor`] backed by plain owned values.
//! It serves contexts that outlive the host's request object (values captured
//! before teardown) and hosts that hand over data rather than objects.

use crate::context::{ClientCertificate, ContextAccessor, Identity, Pairs, RequestUrl};
use crate::error::{ContextError, ContextResult};
use std::net::SocketAddr;
use std::time::Duration;

/// A [`ContextAccessor`] over owned values
///
/// Collections start out absent and become present on the first value added.
///
/// # Example
///
/// ```rust
/// use reqlog_core::{CookieRenderer, LayoutRenderer, SnapshotContext};
///
/// let ctx = SnapshotContext::new()
///     .with_cookie("key", "TEST")
///     .with_cookie("Key1", "TEST1");
///
/// assert_eq!(CookieRenderer::new().render(&ctx), "key=TEST,Key1=TEST1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotContext {
    method: Option<String>,
    url: Option<RequestUrl>,
    protocol: Option<String>,
    request_headers: Option<Pairs>,
    cookies: Option<Pairs>,
    query: Option<Pairs>,
    form: Option<Pairs>,
    route_values: Option<Pairs>,
    items: Option<Pairs>,
    remote_addr: Option<SocketAddr>,
    local_addr: Option<SocketAddr>,
    elapsed: Option<Duration>,
    trace_identifier: Option<String>,
    identity: Option<Identity>,
    session_id: Option<String>,
    session: Option<Pairs>,
    session_error: Option<ContextError>,
    client_certificate: Option<ClientCertificate>,
    response_status: Option<u16>,
    response_headers: Option<Pairs>,
    response_error: Option<ContextError>,
}

fn push(target: &mut Option<Pairs>, key: impl Into<String>, value: impl Into<String>) {
    target
        .get_or_insert_with(Vec::new)
        .push((key.into(), value.into()));
}

impl SnapshotContext {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every enumerable value out of another accessor
    ///
    /// Session values cannot be enumerated, only the session id is kept.
    /// Failed lookups are stored as absent.
    pub fn capture(ctx: &dyn ContextAccessor) -> Self {
        Self {
            method: ctx.method(),
            url: ctx.url(),
            protocol: ctx.protocol(),
            request_headers: ctx.request_headers(),
            cookies: ctx.cookies(),
            query: ctx.query(),
            form: ctx.form(),
            route_values: ctx.route_values(),
            items: ctx.items(),
            remote_addr: ctx.remote_addr(),
            local_addr: ctx.local_addr(),
            elapsed: ctx.elapsed(),
            trace_identifier: ctx.trace_identifier(),
            identity: ctx.identity(),
            session_id: ctx.session_id().ok().flatten(),
            session: None,
            session_error: None,
            client_certificate: ctx.client_certificate(),
            response_status: ctx.response_status().ok().flatten(),
            response_headers: ctx.response_headers().ok().flatten(),
            response_error: None,
        }
    }

    /// Set the HTTP method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the request URL
    pub fn with_url(mut self, url: RequestUrl) -> Self {
        self.url = Some(url);
        self
    }

    /// Set the protocol version
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Add a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        push(&mut self.request_headers, name, value);
        self
    }

    /// Add a cookie
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        push(&mut self.cookies, name, value);
        self
    }

    /// Add a query string parameter
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        push(&mut self.query, key, value);
        self
    }

    /// Add a form field
    pub fn with_form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        push(&mut self.form, key, value);
        self
    }

    /// Add a route value
    pub fn with_route_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        push(&mut self.route_values, key, value);
        self
    }

    /// Add a request-scoped item
    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        push(&mut self.items, key, value);
        self
    }

    /// Set the remote peer address
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Set the local address
    pub fn with_local_addr(mut self, addr: SocketAddr) -> Self {
        self.local_addr = Some(addr);
        self
    }

    /// Set the elapsed request time
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Set the trace identifier
    pub fn with_trace_identifier(mut self, id: impl Into<String>) -> Self {
        self.trace_identifier = Some(id.into());
        self
    }

    /// Set the user identity
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set the session id
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Add a session value
    pub fn with_session_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        push(&mut self.session, key, value);
        self
    }

    /// Make every session lookup fail with `error`
    pub fn with_session_error(mut self, error: ContextError) -> Self {
        self.session_error = Some(error);
        self
    }

    /// Set the client certificate
    pub fn with_client_certificate(mut self, certificate: ClientCertificate) -> Self {
        self.client_certificate = Some(certificate);
        self
    }

    /// Set the response status code
    pub fn with_response_status(mut self, status: u16) -> Self {
        self.response_status = Some(status);
        self
    }

    /// Add a response header
    pub fn with_response_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        push(&mut self.response_headers, name, value);
        self
    }

    /// Make every response lookup fail with `error`
    pub fn with_response_error(mut self, error: ContextError) -> Self {
        self.response_error = Some(error);
        self
    }

    fn session_guard(&self) -> ContextResult<()> {
        match &self.session_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn response_guard(&self) -> ContextResult<()> {
        match &self.response_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl ContextAccessor for SnapshotContext {
    fn method(&self) -> Option<String> {
        self.method.clone()
    }

    fn url(&self) -> Option<RequestUrl> {
        self.url.clone()
    }

    fn protocol(&self) -> Option<String> {
        self.protocol.clone()
    }

    fn request_headers(&self) -> Option<Pairs> {
        self.request_headers.clone()
    }

    fn cookies(&self) -> Option<Pairs> {
        self.cookies.clone()
    }

    fn query(&self) -> Option<Pairs> {
        self.query.clone()
    }

    fn form(&self) -> Option<Pairs> {
        self.form.clone()
    }

    fn route_values(&self) -> Option<Pairs> {
        self.route_values.clone()
    }

    fn items(&self) -> Option<Pairs> {
        self.items.clone()
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    fn trace_identifier(&self) -> Option<String> {
        self.trace_identifier.clone()
    }

    fn identity(&self) -> Option<Identity> {
        self.identity.clone()
    }

    fn session_id(&self) -> ContextResult<Option<String>> {
        self.session_guard()?;
        Ok(self.session_id.clone())
    }

    fn session_value(&self, key: &str) -> ContextResult<Option<String>> {
        self.session_guard()?;
        Ok(self.session.as_ref().and_then(|values| {
            values
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }))
    }

    fn client_certificate(&self) -> Option<ClientCertificate> {
        self.client_certificate.clone()
    }

    fn response_status(&self) -> ContextResult<Option<u16>> {
        self.response_guard()?;
        Ok(self.response_status)
    }

    fn response_headers(&self) -> ContextResult<Option<Pairs>> {
        self.response_guard()?;
        Ok(self.response_headers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_start_absent() {
        let ctx = SnapshotContext::new();
        assert!(ctx.cookies().is_none());
        assert!(ctx.request_headers().is_none());

        let ctx = ctx.with_cookie("a", "1");
        assert_eq!(ctx.cookies(), Some(vec![("a".to_string(), "1".to_string())]));
    }

    #[test]
    fn test_session_error_applies_to_all_session_lookups() {
        let ctx = SnapshotContext::new()
            .with_session_id("s")
            .with_session_error(ContextError::Unavailable("session"));
        assert_eq!(ctx.session_id(), Err(ContextError::Unavailable("session")));
        assert_eq!(
            ctx.session_value("x"),
            Err(ContextError::Unavailable("session"))
        );
    }

    #[test]
    fn test_capture_copies_values_and_drops_failures() {
        let source = SnapshotContext::new()
            .with_method("GET")
            .with_header("Accept", "*/*")
            .with_session_id("s-9")
            .with_response_status(201)
            .with_response_error(ContextError::Disposed("response"));

        let captured = SnapshotContext::capture(&source);
        assert_eq!(captured.method(), Some("GET".to_string()));
        assert_eq!(captured.request_header("accept"), Some("*/*".to_string()));
        assert_eq!(captured.session_id(), Ok(Some("s-9".to_string())));
        assert_eq!(captured.response_status(), Ok(None));
    }
}
