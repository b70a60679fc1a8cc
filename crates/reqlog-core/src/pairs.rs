//! Key/value pair serialization shared by the multi-value renderers
//!
//! Headers, cookies, query strings, form fields, route parameters and claims
//! all render through [`append_pairs`]. Three output shapes are supported:
//!
//! - [`OutputFormat::Flat`]: `key=value,key2=value2`
//! - [`OutputFormat::JsonArray`]: `[{"key":"value"},{"key2":"value2"}]`
//! - [`OutputFormat::JsonDictionary`]: `{"key":"value","key2":"value2"}`
//!
//! An empty sequence always renders as an empty string, never `[]` or `{}`,
//! so absent data adds nothing to the log line.
//!
//! # Example
//!
//! ```rust
//! use reqlog_core::pairs::{serialize_pairs, OutputFormat, SerializationOptions};
//!
//! let pairs = [("key", "TEST"), ("Key1", "TEST1")];
//!
//! let flat = serialize_pairs(pairs, &SerializationOptions::default());
//! assert_eq!(flat, "key=TEST,Key1=TEST1");
//!
//! let json = serialize_pairs(pairs, &SerializationOptions::new(OutputFormat::JsonDictionary));
//! assert_eq!(json, r#"{"key":"TEST","Key1":"TEST1"}"#);
//! ```

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default separator between pairs in flat output
pub const DEFAULT_ITEM_SEPARATOR: &str = ",";

/// Default separator between key and value in flat output
pub const DEFAULT_VALUE_SEPARATOR: &str = "=";

/// Output shape for a sequence of key/value pairs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Delimiter-joined `key=value` text (default)
    #[default]
    Flat,
    /// JSON array of single-entry objects
    JsonArray,
    /// Single JSON object
    JsonDictionary,
}

impl OutputFormat {
    /// Canonical name of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::JsonArray => "jsonarray",
            Self::JsonDictionary => "jsondictionary",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an output format name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output format `{0}`, expected one of: flat, jsonarray, jsondictionary")]
pub struct ParseOutputFormatError(String);

impl FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "flat" => Ok(Self::Flat),
            "json" | "jsonarray" | "array" => Ok(Self::JsonArray),
            "jsondictionary" | "jsondict" | "dictionary" => Ok(Self::JsonDictionary),
            _ => Err(ParseOutputFormatError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Formatting options for [`serialize_pairs`]
///
/// Renderers embed this struct (flattened) so that `outputFormat`,
/// `itemSeparator`, `valueSeparator` and `valuesOnly` can be set directly
/// on the renderer's configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializationOptions {
    /// Output shape
    pub output_format: OutputFormat,
    /// Separator between pairs (flat output only)
    pub item_separator: String,
    /// Separator between key and value (flat output only)
    pub value_separator: String,
    /// Omit keys and render values only
    pub values_only: bool,
}

impl Default for SerializationOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Flat,
            item_separator: DEFAULT_ITEM_SEPARATOR.to_string(),
            value_separator: DEFAULT_VALUE_SEPARATOR.to_string(),
            values_only: false,
        }
    }
}

impl SerializationOptions {
    /// Create options for the given format with default separators
    pub fn new(output_format: OutputFormat) -> Self {
        Self {
            output_format,
            ..Default::default()
        }
    }

    /// Set the output format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the separator placed between pairs
    pub fn item_separator(mut self, separator: impl Into<String>) -> Self {
        self.item_separator = separator.into();
        self
    }

    /// Set the separator placed between a key and its value
    pub fn value_separator(mut self, separator: impl Into<String>) -> Self {
        self.value_separator = separator.into();
        self
    }

    /// Set whether keys are omitted
    pub fn values_only(mut self, values_only: bool) -> Self {
        self.values_only = values_only;
        self
    }
}

/// Render `pairs` into a new string.
///
/// Returns an empty string when `pairs` yields nothing.
pub fn serialize_pairs<I, K, V>(pairs: I, options: &SerializationOptions) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::new();
    append_pairs(&mut out, pairs, options);
    out
}

/// Append the rendering of `pairs` to `out`.
///
/// The iterator is consumed lazily and at most once. Nothing is written when
/// it is empty.
pub fn append_pairs<I, K, V>(out: &mut String, pairs: I, options: &SerializationOptions)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs = pairs.into_iter().peekable();
    if pairs.peek().is_none() {
        return;
    }

    match options.output_format {
        OutputFormat::Flat => {
            for (index, (key, value)) in pairs.enumerate() {
                if index > 0 {
                    out.push_str(&options.item_separator);
                }
                if !options.values_only {
                    out.push_str(key.as_ref());
                    out.push_str(&options.value_separator);
                }
                out.push_str(value.as_ref());
            }
        }
        // Without keys both JSON shapes render a plain array of values.
        OutputFormat::JsonArray | OutputFormat::JsonDictionary if options.values_only => {
            out.push('[');
            for (index, (_, value)) in pairs.enumerate() {
                if index > 0 {
                    out.push(',');
                }
                append_quoted(out, value.as_ref());
            }
            out.push(']');
        }
        OutputFormat::JsonArray => {
            out.push('[');
            for (index, (key, value)) in pairs.enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push('{');
                append_quoted(out, key.as_ref());
                out.push(':');
                append_quoted(out, value.as_ref());
                out.push('}');
            }
            out.push(']');
        }
        OutputFormat::JsonDictionary => {
            out.push('{');
            for (index, (key, value)) in pairs.enumerate() {
                if index > 0 {
                    out.push(',');
                }
                append_quoted(out, key.as_ref());
                out.push(':');
                append_quoted(out, value.as_ref());
            }
            out.push('}');
        }
    }
}

/// Append `value` wrapped in double quotes, escaping embedded `"` as `\"`.
///
/// No other characters are escaped.
pub fn append_quoted(out: &mut String, value: &str) {
    out.reserve(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\\\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}
