//! Token-based renderer registry
//!
//! A logging pipeline refers to renderers by short tokens such as
//! `request-cookie` and configures them with a property bag. The registry maps
//! each token to a factory that deserializes those properties into a renderer.
//!
//! # Example
//!
//! ```rust
//! use reqlog_core::{LayoutRenderer, NoContext, RendererRegistry};
//! use serde_json::json;
//!
//! let registry = RendererRegistry::with_defaults();
//! let cookies = registry
//!     .create("request-cookie", json!({ "cookieNames": "session", "outputFormat": "JsonArray" }))
//!     .unwrap();
//!
//! assert_eq!(cookies.name(), "request-cookie");
//! assert_eq!(cookies.render(&NoContext), "");
//! ```

use crate::error::{LayoutError, Result};
use crate::renderer::{FieldRenderer, LayoutRenderer};
use crate::renderers::{self, FieldConstructor};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Factory producing a configured renderer from its properties
pub type RendererFactory =
    Arc<dyn Fn(Value) -> Result<Box<dyn LayoutRenderer>> + Send + Sync>;

/// Maps renderer tokens to factories
///
/// Token lookup is case-insensitive.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    factories: HashMap<String, RendererFactory>,
}

impl RendererRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in renderer
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        renderers::register_defaults(&mut registry);
        registry
    }

    /// Register a renderer configured by deserializing its properties
    pub fn register<T>(&mut self, token: &str) -> &mut Self
    where
        T: LayoutRenderer + DeserializeOwned + 'static,
    {
        let renderer = token.to_ascii_lowercase();
        self.register_fn(token, move |props| {
            let props = match props {
                Value::Null => Value::Object(Map::new()),
                other => other,
            };
            let configured: T =
                serde_json::from_value(props).map_err(|source| LayoutError::InvalidConfig {
                    renderer: renderer.clone(),
                    source,
                })?;
            Ok(Box::new(configured) as Box<dyn LayoutRenderer>)
        })
    }

    /// Register a renderer with a fixed configuration, ignoring properties
    pub fn register_preset<T, F>(&mut self, token: &str, preset: F) -> &mut Self
    where
        T: LayoutRenderer + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_fn(token, move |_| Ok(Box::new(preset()) as Box<dyn LayoutRenderer>))
    }

    /// Register an option-less field renderer under its own name
    pub(crate) fn register_field(&mut self, constructor: FieldConstructor) -> &mut Self {
        let token = constructor().name();
        self.register_preset::<FieldRenderer, _>(token, constructor)
    }

    /// Register a custom factory
    ///
    /// Replaces any factory already registered under `token`.
    pub fn register_fn<F>(&mut self, token: &str, factory: F) -> &mut Self
    where
        F: Fn(Value) -> Result<Box<dyn LayoutRenderer>> + Send + Sync + 'static,
    {
        let token = token.to_ascii_lowercase();
        if self.factories.contains_key(&token) {
            tracing::debug!(renderer = %token, "replacing registered layout renderer");
        }
        self.factories.insert(token, Arc::new(factory));
        self
    }

    /// Build the renderer registered under `token`
    ///
    /// `Value::Null` stands for "no properties".
    pub fn create(&self, token: &str, props: Value) -> Result<Box<dyn LayoutRenderer>> {
        let factory = self
            .factories
            .get(&token.to_ascii_lowercase())
            .ok_or_else(|| LayoutError::UnknownRenderer(token.to_string()))?;
        factory(props)
    }

    /// Check if a token is registered
    pub fn contains(&self, token: &str) -> bool {
        self.factories.contains_key(&token.to_ascii_lowercase())
    }

    /// Registered tokens in sorted order
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    /// Number of registered tokens
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("tokens", &self.tokens())
            .finish()
    }
}
