//! # reqlog
//!
//! Layout renderers that pull data from an in-flight web request or response
//! (cookies, headers, query string, form, route values, session, user claims,
//! client certificate, status code) into log-line fragments.
//!
//! ## Quick Start
//!
//! ```rust
//! use reqlog::prelude::*;
//!
//! let registry = RendererRegistry::with_defaults();
//! let layout = Layout::builder()
//!     .token(&registry, "request-method", Value::Null)?
//!     .literal(" ")
//!     .token(&registry, "request-url", json!({ "includeQueryString": true }))?
//!     .literal(" cookies=")
//!     .token(&registry, "request-cookie", json!({ "outputFormat": "JsonDictionary" }))?
//!     .build();
//!
//! let request = http::Request::builder()
//!     .method("GET")
//!     .uri("https://shop.example/cart?step=2")
//!     .header("cookie", "lang=en")
//!     .body(())
//!     .unwrap();
//!
//! let line = layout.render(&HttpContext::from_request(&request));
//! assert_eq!(line, r#"GET https://shop.example/cart?step=2 cookies={"lang":"en"}"#);
//! # Ok::<(), reqlog::LayoutError>(())
//! ```
//!
//! ## Features
//!
//! - `http-context` (default) - [`HttpContext`] over the `http` crate's request and response types
//!
//! Without it, contexts are built with [`SnapshotContext`] or a custom
//! [`ContextAccessor`] implementation.

// Re-export core functionality
pub use reqlog_core::*;

#[cfg(feature = "http-context")]
pub use reqlog_http::{
    ClientAddr, HttpContext, LocalAddr, RequestItems, RequestStart, RouteParams, Session,
    TraceIdentifier, REQUEST_ID_HEADER,
};

/// Prelude module - import everything you need with `use reqlog::prelude::*`
pub mod prelude {
    pub use reqlog_core::{
        ContextAccessor, ContextError, ContextResult, Identity, Layout, LayoutBuilder,
        LayoutError, LayoutRenderer, NoContext, OutputFormat, RendererRegistry, Result,
        SerializationOptions, SnapshotContext,
    };

    pub use reqlog_core::renderers::*;

    pub use serde_json::{json, Value};

    #[cfg(feature = "http-context")]
    pub use reqlog_http::{
        ClientAddr, HttpContext, LocalAddr, RequestItems, RequestStart, RouteParams, Session,
        TraceIdentifier,
    };
}
