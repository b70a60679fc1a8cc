//! # reqlog core
//!
//! Layout renderers that turn web request and response data into log-line
//! fragments.
//!
//! The pieces:
//!
//! - [`pairs`]: the key/value serializer shared by every collection renderer
//!   (flat `k=v,k=v`, JSON array of single-entry objects, or JSON object)
//! - [`ContextAccessor`]: read access to the current request, response,
//!   session and user
//! - [`LayoutRenderer`] and the built-in [`renderers`]
//! - [`RendererRegistry`]: token lookup for configuration-driven pipelines
//! - [`Layout`]: literal text interleaved with renderers
//!
//! Renderers never fail. Whenever the context is missing, or the part they
//! read from is missing or unusable, they render nothing.
//!
//! Host framework adapters live in separate crates. Use `reqlog` for the
//! full stack.

pub mod context;
pub mod environment;
pub mod error;
pub mod layout;
pub mod pairs;
pub mod registry;
pub mod renderer;
pub mod renderers;
pub mod snapshot;

// Public API
pub use context::{
    Claim, ClientCertificate, ContextAccessor, Identity, NoContext, Pairs, RequestUrl,
};
pub use environment::{app_base_path, HostEnvironment, ENVIRONMENT_VAR};
pub use error::{ContextError, ContextResult, LayoutError, Result};
pub use layout::{Layout, LayoutBuilder};
pub use pairs::{
    append_pairs, append_quoted, serialize_pairs, OutputFormat, ParseOutputFormatError,
    SerializationOptions,
};
pub use registry::{RendererFactory, RendererRegistry};
pub use renderer::{absorb, FieldRenderer, LayoutRenderer};
pub use renderers::{
    ClaimRenderer, ClientCertificateRenderer, CookieRenderer, DurationRenderer, DurationUnit,
    EnvironmentRenderer, FormRenderer, HeaderRenderer, ItemRenderer, ParseStatusCodeFormatError,
    QueryStringRenderer, RemoteIpRenderer, RequestHeadersRenderer, ResponseHeadersRenderer,
    RouteParameterRenderer, RouteParametersRenderer, SessionRenderer, StatusCodeFormat,
    StatusCodeRenderer, UrlRenderer,
};
pub use snapshot::SnapshotContext;
