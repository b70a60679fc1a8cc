//! Renderers for multi-valued request collections
//!
//! Cookies, headers, query string, form fields and route parameters all
//! select a subset of the source pairs and hand them to the pair serializer.

use super::{select_pairs, string_list};
use crate::context::ContextAccessor;
use crate::pairs::{append_pairs, SerializationOptions};
use crate::renderer::LayoutRenderer;
use serde::Deserialize;

/// Request cookies
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CookieRenderer {
    /// Cookies to render, all when empty
    #[serde(deserialize_with = "string_list::deserialize")]
    pub cookie_names: Vec<String>,
    /// Cookies never rendered
    #[serde(deserialize_with = "string_list::deserialize")]
    pub exclude: Vec<String>,
    /// Output formatting
    #[serde(flatten)]
    pub options: SerializationOptions,
}

impl CookieRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-cookie";

    /// Render all cookies as flat pairs
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit output to the given cookie names
    pub fn cookie_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cookie_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Never render the given cookie
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.exclude.push(name.into());
        self
    }

    /// Set output formatting
    pub fn with_options(mut self, options: SerializationOptions) -> Self {
        self.options = options;
        self
    }
}

impl LayoutRenderer for CookieRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(cookies) = ctx.cookies() {
            let selected = select_pairs(&cookies, &self.cookie_names, &self.exclude, false);
            append_pairs(out, selected, &self.options);
        }
    }
}

/// Request headers
///
/// Header names match case-insensitively. `Authorization` and `Cookie` are
/// excluded unless the exclusion list is replaced.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestHeadersRenderer {
    /// Headers to render, all when empty
    #[serde(deserialize_with = "string_list::deserialize")]
    pub header_names: Vec<String>,
    /// Headers never rendered
    #[serde(deserialize_with = "string_list::deserialize")]
    pub exclude: Vec<String>,
    /// Output formatting
    #[serde(flatten)]
    pub options: SerializationOptions,
}

impl Default for RequestHeadersRenderer {
    fn default() -> Self {
        Self {
            header_names: Vec::new(),
            exclude: vec!["authorization".to_string(), "cookie".to_string()],
            options: SerializationOptions::default(),
        }
    }
}

impl RequestHeadersRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-headers";

    /// Render all headers except credentials as flat pairs
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit output to the given header names
    pub fn header_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the exclusion list
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set output formatting
    pub fn with_options(mut self, options: SerializationOptions) -> Self {
        self.options = options;
        self
    }
}

impl LayoutRenderer for RequestHeadersRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(headers) = ctx.request_headers() {
            let selected = select_pairs(&headers, &self.header_names, &self.exclude, true);
            append_pairs(out, selected, &self.options);
        }
    }
}

/// Query string parameters
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryStringRenderer {
    /// Parameters to render, all when empty
    #[serde(deserialize_with = "string_list::deserialize")]
    pub query_string_keys: Vec<String>,
    /// Output formatting
    #[serde(flatten)]
    pub options: SerializationOptions,
}

impl QueryStringRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-querystring";

    /// Render all parameters as flat pairs
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit output to the given keys
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_string_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set output formatting
    pub fn with_options(mut self, options: SerializationOptions) -> Self {
        self.options = options;
        self
    }
}

impl LayoutRenderer for QueryStringRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(query) = ctx.query() {
            let selected = select_pairs(&query, &self.query_string_keys, &[], false);
            append_pairs(out, selected, &self.options);
        }
    }
}

/// Posted form fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormRenderer {
    /// Fields to render, all when empty
    #[serde(deserialize_with = "string_list::deserialize")]
    pub include: Vec<String>,
    /// Fields never rendered
    #[serde(deserialize_with = "string_list::deserialize")]
    pub exclude: Vec<String>,
    /// Output formatting
    #[serde(flatten)]
    pub options: SerializationOptions,
}

impl FormRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-form";

    /// Render all fields as flat pairs
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit output to the given fields
    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = names.into_iter().map(Into::into).collect();
        self
    }

    /// Never render the given field
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.exclude.push(name.into());
        self
    }

    /// Set output formatting
    pub fn with_options(mut self, options: SerializationOptions) -> Self {
        self.options = options;
        self
    }
}

impl LayoutRenderer for FormRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(form) = ctx.form() {
            let selected = select_pairs(&form, &self.include, &self.exclude, false);
            append_pairs(out, selected, &self.options);
        }
    }
}

/// Route parameters captured by the router
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteParametersRenderer {
    /// Parameters to render, all when empty
    #[serde(deserialize_with = "string_list::deserialize")]
    pub route_parameter_keys: Vec<String>,
    /// Output formatting
    #[serde(flatten)]
    pub options: SerializationOptions,
}

impl RouteParametersRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-routeparameters";

    /// Render all parameters as flat pairs
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit output to the given keys
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_parameter_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set output formatting
    pub fn with_options(mut self, options: SerializationOptions) -> Self {
        self.options = options;
        self
    }
}

impl LayoutRenderer for RouteParametersRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(values) = ctx.route_values() {
            let selected = select_pairs(&values, &self.route_parameter_keys, &[], false);
            append_pairs(out, selected, &self.options);
        }
    }
}
