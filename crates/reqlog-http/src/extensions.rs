//! Request extension types
//!
//! A host inserts these into `http::Extensions` as it processes a request.
//! [`HttpContext`](crate::HttpContext) reads them back for the renderers.

use reqlog_core::Pairs;
use smallvec::SmallVec;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Maximum number of route parameters to store on the stack.
pub const STACK_PARAMS_CAPACITY: usize = 4;

/// Values captured by the router, in route-template order.
///
/// Uses `SmallVec` to keep up to 4 pairs on the stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    inner: SmallVec<[(String, String); STACK_PARAMS_CAPACITY]>,
}

impl RouteParams {
    /// Create an empty collection.
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: SmallVec::new(),
        }
    }

    /// Append a parameter.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.push((key.into(), value.into()));
    }

    /// First value captured under `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the parameters spilled onto the heap.
    #[inline]
    pub fn spilled(&self) -> bool {
        self.inner.spilled()
    }

    /// Iterate over key-value pairs.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Owned copy of the pairs.
    pub fn to_pairs(&self) -> Pairs {
        self.inner.to_vec()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Request-scoped key/value items
///
/// Filled by middleware and handlers to carry values into log lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestItems {
    inner: Vec<(String, String)>,
}

impl RequestItems {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.inner.push((key, value)),
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Owned copy of the items in insertion order.
    pub fn to_pairs(&self) -> Pairs {
        self.inner.clone()
    }
}

/// Time the host started handling the request
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

impl RequestStart {
    /// Mark the current instant as the request start.
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Time elapsed since the request started.
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Address of the remote peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub SocketAddr);

/// Local address the connection was accepted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalAddr(pub SocketAddr);

/// Identifier correlating the log lines of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceIdentifier(pub String);

impl TraceIdentifier {
    /// Create a trace identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
