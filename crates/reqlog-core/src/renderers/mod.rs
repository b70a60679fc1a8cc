//! Built-in layout renderers
//!
//! Scalar fields without options are [`FieldRenderer`]s built by the
//! functions in this module. Everything with options is its own struct that
//! can be deserialized from renderer properties.

mod app;
mod certificate;
mod collections;
mod request;
mod response;
mod session;
mod user;

pub use app::{app_basepath, EnvironmentRenderer};
pub use certificate::ClientCertificateRenderer;
pub use collections::{
    CookieRenderer, FormRenderer, QueryStringRenderer, RequestHeadersRenderer,
    RouteParametersRenderer,
};
pub use request::{
    local_ip, request_host, request_method, request_protocol, trace_identifier,
    DurationRenderer, DurationUnit, HeaderRenderer, ItemRenderer, RemoteIpRenderer,
    RouteParameterRenderer, UrlRenderer,
};
pub use response::{
    ParseStatusCodeFormatError, ResponseHeadersRenderer, StatusCodeFormat, StatusCodeRenderer,
};
pub use session::{session_id, SessionRenderer};
pub use user::{user_auth_type, user_identity, user_is_authenticated, ClaimRenderer};

use crate::registry::RendererRegistry;
use crate::renderer::FieldRenderer;

/// Register every built-in renderer under its token
pub(crate) fn register_defaults(registry: &mut RendererRegistry) {
    registry
        .register::<CookieRenderer>(CookieRenderer::NAME)
        .register::<RequestHeadersRenderer>(RequestHeadersRenderer::NAME)
        .register::<HeaderRenderer>(HeaderRenderer::NAME)
        .register::<QueryStringRenderer>(QueryStringRenderer::NAME)
        .register::<FormRenderer>(FormRenderer::NAME)
        .register::<RouteParametersRenderer>(RouteParametersRenderer::NAME)
        .register::<RouteParameterRenderer>(RouteParameterRenderer::NAME)
        .register::<UrlRenderer>(UrlRenderer::NAME)
        .register::<RemoteIpRenderer>(RemoteIpRenderer::NAME)
        .register::<DurationRenderer>(DurationRenderer::NAME)
        .register::<ItemRenderer>(ItemRenderer::NAME)
        .register::<ClientCertificateRenderer>(ClientCertificateRenderer::NAME)
        .register::<StatusCodeRenderer>(StatusCodeRenderer::NAME)
        .register::<ResponseHeadersRenderer>(ResponseHeadersRenderer::NAME)
        .register::<ClaimRenderer>(ClaimRenderer::NAME)
        .register::<SessionRenderer>(SessionRenderer::NAME)
        .register::<EnvironmentRenderer>(EnvironmentRenderer::NAME)
        .register_preset("request-useragent", HeaderRenderer::user_agent)
        .register_preset("request-referrer", HeaderRenderer::referrer)
        .register_preset("request-contenttype", HeaderRenderer::content_type)
        .register_field(request_method)
        .register_field(request_protocol)
        .register_field(request_host)
        .register_field(local_ip)
        .register_field(trace_identifier)
        .register_field(user_identity)
        .register_field(user_is_authenticated)
        .register_field(user_auth_type)
        .register_field(session_id)
        .register_field(app_basepath);
}

/// Constructor of an option-less field renderer
pub(crate) type FieldConstructor = fn() -> FieldRenderer;

/// Whether `key` appears in `list`
fn listed(list: &[String], key: &str, ignore_case: bool) -> bool {
    list.iter().any(|candidate| {
        if ignore_case {
            candidate.eq_ignore_ascii_case(key)
        } else {
            candidate == key
        }
    })
}

/// Pairs whose key is in `include` (or all, when `include` is empty) and not in `exclude`
///
/// Source order is preserved.
pub(crate) fn select_pairs<'a>(
    pairs: &'a [(String, String)],
    include: &'a [String],
    exclude: &'a [String],
    ignore_case: bool,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    pairs
        .iter()
        .filter(move |(key, _)| {
            (include.is_empty() || listed(include, key, ignore_case))
                && !listed(exclude, key, ignore_case)
        })
        .map(|(key, value)| (key.as_str(), value.as_str()))
}

/// Deserialize a list of names from either an array or a comma-separated string
pub(crate) mod string_list {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Joined(String),
        List(Vec<String>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
            Repr::List(list) => list,
        })
    }
}
