//! Client certificate renderer

use crate::context::ContextAccessor;
use crate::pairs::{append_pairs, SerializationOptions};
use crate::renderer::LayoutRenderer;
use serde::Deserialize;

/// Client TLS certificate
///
/// Renders the subject, or every certificate field as pairs when verbose.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientCertificateRenderer {
    /// Render all fields instead of just the subject
    pub verbose: bool,
    /// Output formatting in verbose mode
    #[serde(flatten)]
    pub options: SerializationOptions,
}

impl ClientCertificateRenderer {
    /// Registration token
    pub const NAME: &'static str = "request-client-certificate";

    /// Render the certificate subject
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbose mode
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set output formatting for verbose mode
    pub fn with_options(mut self, options: SerializationOptions) -> Self {
        self.options = options;
        self
    }
}

impl LayoutRenderer for ClientCertificateRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        let Some(certificate) = ctx.client_certificate() else {
            return;
        };
        if self.verbose {
            append_pairs(out, certificate.to_pairs(), &self.options);
        } else {
            out.push_str(&certificate.subject);
        }
    }
}
