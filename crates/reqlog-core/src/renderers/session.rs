//! Session renderers

use crate::context::ContextAccessor;
use crate::renderer::{absorb, FieldRenderer, LayoutRenderer};
use serde::Deserialize;

/// `session-id`: the session identifier
pub fn session_id() -> FieldRenderer {
    FieldRenderer::new("session-id", |ctx| absorb("session-id", ctx.session_id()))
}

/// A single session value
///
/// A session that is not configured, or was disposed before the log write,
/// renders nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionRenderer {
    /// Session key
    pub variable: String,
}

impl SessionRenderer {
    /// Registration token
    pub const NAME: &'static str = "session";

    /// Render the value stored under `variable`
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl LayoutRenderer for SessionRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        if self.variable.is_empty() {
            return;
        }
        if let Some(value) = absorb(Self::NAME, ctx.session_value(&self.variable)) {
            out.push_str(&value);
        }
    }
}
