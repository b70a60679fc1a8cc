//! Layouts: literal text interleaved with renderers
//!
//! A [`Layout`] renders one complete log-line fragment. Renderers that have
//! nothing to say contribute an empty string, literals are always emitted.
//!
//! # Example
//!
//! ```rust
//! use reqlog_core::{Layout, LayoutRenderer, RendererRegistry, SnapshotContext, StatusCodeRenderer};
//! use serde_json::Value;
//!
//! let registry = RendererRegistry::with_defaults();
//! let layout = Layout::builder()
//!     .token(&registry, "request-method", Value::Null)
//!     .unwrap()
//!     .literal(" -> ")
//!     .renderer(StatusCodeRenderer::new())
//!     .build();
//!
//! let ctx = SnapshotContext::new().with_method("GET").with_response_status(204);
//! assert_eq!(layout.render(&ctx), "GET -> 204");
//! ```

use crate::context::ContextAccessor;
use crate::error::Result;
use crate::registry::RendererRegistry;
use crate::renderer::LayoutRenderer;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone, Debug)]
enum LayoutPart {
    Literal(String),
    Renderer(Arc<dyn LayoutRenderer>),
}

/// Ordered literal text and renderers
#[derive(Clone, Debug, Default)]
pub struct Layout {
    parts: Vec<LayoutPart>,
}

impl Layout {
    /// Start building a layout
    pub fn builder() -> LayoutBuilder {
        LayoutBuilder::default()
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the layout has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl LayoutRenderer for Layout {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        for part in &self.parts {
            match part {
                LayoutPart::Literal(text) => out.push_str(text),
                LayoutPart::Renderer(renderer) => renderer.append(out, ctx),
            }
        }
    }
}

/// Builder for [`Layout`]
#[derive(Default)]
pub struct LayoutBuilder {
    parts: Vec<LayoutPart>,
}

impl LayoutBuilder {
    /// Append literal text
    pub fn literal(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        if let Some(LayoutPart::Literal(last)) = self.parts.last_mut() {
            last.push_str(&text);
        } else {
            self.parts.push(LayoutPart::Literal(text));
        }
        self
    }

    /// Append a renderer
    pub fn renderer(self, renderer: impl LayoutRenderer + 'static) -> Self {
        self.boxed(Box::new(renderer))
    }

    /// Append an already boxed renderer
    pub fn boxed(mut self, renderer: Box<dyn LayoutRenderer>) -> Self {
        self.parts.push(LayoutPart::Renderer(Arc::from(renderer)));
        self
    }

    /// Append the renderer registered under `token`, configured with `props`
    pub fn token(self, registry: &RendererRegistry, token: &str, props: Value) -> Result<Self> {
        let renderer = registry.create(token, props)?;
        Ok(self.boxed(renderer))
    }

    /// Finish the layout
    pub fn build(self) -> Layout {
        Layout { parts: self.parts }
    }
}
