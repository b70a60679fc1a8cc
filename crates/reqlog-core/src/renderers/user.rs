//! User identity renderers

use crate::context::ContextAccessor;
use crate::pairs::{append_pairs, SerializationOptions};
use crate::renderer::{FieldRenderer, LayoutRenderer};
use serde::Deserialize;

/// `user-identity`: the user name
pub fn user_identity() -> FieldRenderer {
    FieldRenderer::new("user-identity", |ctx| ctx.identity().and_then(|id| id.name))
}

/// `user-isauthenticated`: `true` or `false`
pub fn user_is_authenticated() -> FieldRenderer {
    FieldRenderer::new("user-isauthenticated", |ctx| {
        ctx.identity().map(|id| id.is_authenticated.to_string())
    })
}

/// `user-authtype`: the authentication scheme
pub fn user_auth_type() -> FieldRenderer {
    FieldRenderer::new("user-authtype", |ctx| {
        ctx.identity().and_then(|id| id.authentication_type)
    })
}

/// User claims
///
/// With a claim type set, renders the first matching claim's value.
/// Without one, renders every claim as `type=value` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClaimRenderer {
    /// Claim type to look up
    pub claim_type: Option<String>,
    /// Output formatting when rendering all claims
    #[serde(flatten)]
    pub options: SerializationOptions,
}

impl ClaimRenderer {
    /// Registration token
    pub const NAME: &'static str = "user-claim";

    /// Render every claim
    pub fn all() -> Self {
        Self::default()
    }

    /// Render the first claim of `claim_type`
    pub fn of_type(claim_type: impl Into<String>) -> Self {
        Self {
            claim_type: Some(claim_type.into()),
            ..Default::default()
        }
    }

    /// Set output formatting
    pub fn with_options(mut self, options: SerializationOptions) -> Self {
        self.options = options;
        self
    }
}

impl LayoutRenderer for ClaimRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn append(&self, out: &mut String, ctx: &dyn ContextAccessor) {
        let Some(identity) = ctx.identity() else {
            return;
        };

        match self.claim_type.as_deref().filter(|t| !t.is_empty()) {
            Some(claim_type) => {
                if let Some(claim) = identity.find_claim(claim_type) {
                    out.push_str(&claim.value);
                }
            }
            None => {
                let claims = identity
                    .claims
                    .iter()
                    .map(|c| (c.claim_type.as_str(), c.value.as_str()));
                append_pairs(out, claims, &self.options);
            }
        }
    }
}
