//! # reqlog http
//!
//! [`ContextAccessor`](reqlog_core::ContextAccessor) implementation over the
//! `http` crate's request and response types.
//!
//! A host builds an [`HttpContext`] around the request it is handling and
//! passes it to a layout. Values the `http` types do not carry themselves
//! (route parameters, peer address, session, user) are read from request
//! extensions the host inserted beforehand.
//!
//! ```rust
//! use reqlog_core::{Layout, LayoutRenderer, RemoteIpRenderer, RouteParametersRenderer};
//! use reqlog_http::{ClientAddr, HttpContext, RouteParams};
//!
//! let request = http::Request::builder()
//!     .uri("/users/7")
//!     .extension(ClientAddr("192.0.2.10:40000".parse().unwrap()))
//!     .extension(RouteParams::from_iter([("id", "7")]))
//!     .body(())
//!     .unwrap();
//!
//! let layout = Layout::builder()
//!     .renderer(RemoteIpRenderer::new())
//!     .literal(" ")
//!     .renderer(RouteParametersRenderer::new())
//!     .build();
//!
//! assert_eq!(layout.render(&HttpContext::from_request(&request)), "192.0.2.10 id=7");
//! ```

mod context;
mod extensions;
mod session;

pub use context::{HttpContext, REQUEST_ID_HEADER};
pub use extensions::{
    ClientAddr, LocalAddr, RequestItems, RequestStart, RouteParams, TraceIdentifier,
    STACK_PARAMS_CAPACITY,
};
pub use session::Session;
