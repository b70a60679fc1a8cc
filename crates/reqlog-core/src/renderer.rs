//! The layout renderer contract
//!
//! A renderer extracts one piece of request data and appends it to a log-line
//! buffer. Rendering never fails: missing data renders as nothing.

use crate::context::ContextAccessor;
use crate::error::ContextResult;
use std::fmt;
use std::sync::Arc;

/// Appends one field of request/response context to a log line
pub trait LayoutRenderer: Send + Sync {
    /// Token this renderer is registered under
    fn name(&self) -> &'static str;

    /// Append the rendered value to `out`
    ///
    /// Must leave `out` untouched when the field is absent.
    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor);

    /// Render into a new string
    fn render(&self, ctx: &dyn ContextAccessor) -> String {
        let mut out = String::new();
        self.append(&mut out, ctx);
        out
    }
}

impl fmt::Debug for dyn LayoutRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutRenderer")
            .field("name", &self.name())
            .finish()
    }
}

impl<R: LayoutRenderer + ?Sized> LayoutRenderer for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        (**self).append(out, ctx)
    }
}

/// Turn a failed context lookup into absence
///
/// The failure is reported at debug level under the renderer's name and
/// never reaches the caller.
pub fn absorb<T>(renderer: &'static str, result: ContextResult<Option<T>>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(error) => {
            tracing::debug!(renderer, error = %error, "context lookup failed, rendering empty");
            None
        }
    }
}

type Extractor = dyn Fn(&dyn ContextAccessor) -> Option<String> + Send + Sync;

/// Renderer built from a single extraction closure
///
/// Covers every scalar field that needs no options of its own.
///
/// # Example
///
/// ```rust
/// use reqlog_core::{ContextAccessor, FieldRenderer, LayoutRenderer, NoContext};
///
/// let method = FieldRenderer::new("request-method", |ctx| ctx.method());
/// assert_eq!(method.render(&NoContext), "");
/// ```
#[derive(Clone)]
pub struct FieldRenderer {
    name: &'static str,
    extract: Arc<Extractor>,
}

impl FieldRenderer {
    /// Create a renderer named `name` that appends whatever `extract` yields
    pub fn new<F>(name: &'static str, extract: F) -> Self
    where
        F: Fn(&dyn ContextAccessor) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name,
            extract: Arc::new(extract),
        }
    }
}

impl fmt::Debug for FieldRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRenderer")
            .field("name", &self.name)
            .finish()
    }
}

impl LayoutRenderer for FieldRenderer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if let Some(value) = (self.extract)(ctx) {
            out.push_str(&value);
        }
    }
}
