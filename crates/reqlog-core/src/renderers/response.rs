//! Response renderers

use super::{select_pairs, string_list};
use crate::context::ContextAccessor;
use crate::pairs::{append_pairs, SerializationOptions};
use crate::renderer::{absorb, LayoutRenderer};
use http::StatusCode;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use thiserror::Error;

/// How [`StatusCodeRenderer`] formats the status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusCodeFormat {
    /// Numeric code, `200` (format `d`)
    #[default]
    Numeric,
    /// Canonical reason phrase, `OK`
    Reason,
    /// Code and reason phrase, `200 OK`
    Full,
}

/// Error returned when a status code format name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status code format `{0}`, expected one of: d, reason, full")]
pub struct ParseStatusCodeFormatError(String);

impl FromStr for StatusCodeFormat {
    type Err = ParseStatusCodeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "d" | "numeric" => Ok(Self::Numeric),
            "reason" | "name" => Ok(Self::Reason),
            "full" | "f" => Ok(Self::Full),
            other => Err(ParseStatusCodeFormatError(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for StatusCodeFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Response status code
///
/// Renders nothing until a status in `100..=999` has been set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusCodeRenderer {
    /// Output format
    pub format: StatusCodeFormat,
}

impl StatusCodeRenderer {
    /// Registration token
    pub const NAME: &'static str = "response-statuscode";

    /// Render the numeric code
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn format(mut self, format: StatusCodeFormat) -> Self {
        self.format = format;
        self
    }
}

impl LayoutRenderer for StatusCodeRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        let Some(code) = absorb(Self::NAME, ctx.response_status()) else {
            return;
        };
        let Ok(status) = StatusCode::from_u16(code) else {
            return;
        };
        let reason = status.canonical_reason();

        match (self.format, reason) {
            (StatusCodeFormat::Numeric, _) | (StatusCodeFormat::Full, None) => {
                out.push_str(status.as_str());
            }
            (StatusCodeFormat::Reason, reason) => {
                out.push_str(reason.unwrap_or_default());
            }
            (StatusCodeFormat::Full, Some(reason)) => {
                out.push_str(status.as_str());
                out.push(' ');
                out.push_str(reason);
            }
        }
    }
}

/// Response headers
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseHeadersRenderer {
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

impl ResponseHeadersRenderer {
    /// Registration token
    pub const NAME: &'static str = "response-headers";

    /// Render all response headers as flat pairs
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

    /// Never render the given header
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

impl LayoutRenderer for ResponseHeadersRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(headers) = absorb(Self::NAME, ctx.response_headers()) {
            let selected = select_pairs(&headers, &self.header_names, &self.exclude, true);
            append_pairs(out, selected, &self.options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NoContext;
    use crate::error::ContextError;
    use crate::pairs::OutputFormat;
    use crate::snapshot::SnapshotContext;

    #[test]
    fn test_status_code_formats() {
        let ctx = SnapshotContext::new().with_response_status(404);
        assert_eq!(StatusCodeRenderer::new().render(&ctx), "404");
        assert_eq!(
            StatusCodeRenderer::new()
                .format(StatusCodeFormat::Reason)
                .render(&ctx),
            "Not Found"
        );
        assert_eq!(
            StatusCodeRenderer::new()
                .format(StatusCodeFormat::Full)
                .render(&ctx),
            "404 Not Found"
        );
    }

    #[test]
    fn test_status_code_without_reason() {
        let ctx = SnapshotContext::new().with_response_status(599);
        let full = StatusCodeRenderer::new().format(StatusCodeFormat::Full);
        assert_eq!(full.render(&ctx), "599");
        let reason = StatusCodeRenderer::new().format(StatusCodeFormat::Reason);
        assert_eq!(reason.render(&ctx), "");
    }

    #[test]
    fn test_status_code_unset_or_invalid_is_empty() {
        assert_eq!(StatusCodeRenderer::new().render(&NoContext), "");
        let zero = SnapshotContext::new().with_response_status(0);
        assert_eq!(StatusCodeRenderer::new().render(&zero), "");
        let too_big = SnapshotContext::new().with_response_status(1000);
        assert_eq!(StatusCodeRenderer::new().render(&too_big), "");
    }

    #[test]
    fn test_status_code_disposed_response_is_empty() {
        let ctx = SnapshotContext::new()
            .with_response_status(200)
            .with_response_error(ContextError::Disposed("response"));
        assert_eq!(StatusCodeRenderer::new().render(&ctx), "");
    }

    #[test]
    fn test_status_code_format_parse() {
        assert_eq!("D".parse::<StatusCodeFormat>(), Ok(StatusCodeFormat::Numeric));
        assert_eq!("reason".parse::<StatusCodeFormat>(), Ok(StatusCodeFormat::Reason));
        assert_eq!("Full".parse::<StatusCodeFormat>(), Ok(StatusCodeFormat::Full));
        assert_eq!(
            "x".parse::<StatusCodeFormat>(),
            Err(ParseStatusCodeFormatError("x".to_string()))
        );
    }

    #[test]
    fn test_status_code_format_error_in_config() {
        let config = serde_json::json!({ "format": "hex" });
        let err = serde_json::from_value::<StatusCodeRenderer>(config).unwrap_err();
        assert!(err
            .to_string()
            .contains("unknown status code format `hex`, expected one of: d, reason, full"));
    }

    #[test]
    fn test_response_headers() {
        let ctx = SnapshotContext::new()
            .with_response_header("Content-Type", "application/json")
            .with_response_header("Set-Cookie", "sid=1")
            .with_response_header("Cache-Control", "no-store");

        let renderer = ResponseHeadersRenderer::new()
            .exclude("set-cookie")
            .with_options(SerializationOptions::new(OutputFormat::JsonDictionary));
        assert_eq!(
            renderer.render(&ctx),
            r#"{"Content-Type":"application/json","Cache-Control":"no-store"}"#
        );

        let only = ResponseHeadersRenderer::new().header_names(["content-type"]);
        assert_eq!(only.render(&ctx), "Content-Type=application/json");
    }

    #[test]
    fn test_response_headers_absent() {
        assert_eq!(ResponseHeadersRenderer::new().render(&NoContext), "");
    }
}
