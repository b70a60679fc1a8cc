//! Application-level renderers that need no request

use crate::context::ContextAccessor;
use crate::environment::{app_base_path, HostEnvironment};
use crate::renderer::{FieldRenderer, LayoutRenderer};
use serde::Deserialize;

/// `app-basepath`: directory of the running application
pub fn app_basepath() -> FieldRenderer {
    FieldRenderer::new("app-basepath", |_| app_base_path().map(String::from))
}

/// Name of the host environment
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentRenderer {
    /// Fixed environment, overriding `APP_ENV`
    pub environment: Option<String>,
}

impl EnvironmentRenderer {
    /// Registration token
    pub const NAME: &'static str = "app-environment";

    /// Render the process environment
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutRenderer for EnvironmentRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, _ctx: &dyn ContextAccessor) {
        match self.environment.as_deref() {
            Some(fixed) => out.push_str(HostEnvironment::from_value(Some(fixed)).as_str()),
            None => out.push_str(HostEnvironment::current().as_str()),
        }
    }
}
