//! Error types for reqlog

use thiserror::Error;

/// Result type alias for renderer construction
pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

/// Result type alias for context lookups that can fail
pub type ContextResult<T> = std::result::Result<T, ContextError>;

/// Failure reported by a [`ContextAccessor`](crate::ContextAccessor)
///
/// Renderers never surface these to the caller. They are absorbed into an
/// empty rendering with a debug-level diagnostic, see
/// [`absorb`](crate::renderer::absorb).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The host object was torn down while the log write was in flight
    #[error("{0} has been disposed")]
    Disposed(&'static str),
    /// The host has not enabled this feature for the current request
    #[error("{0} is not available for this request")]
    Unavailable(&'static str),
}

/// Error raised while building renderers from configuration
#[derive(Debug, Error)]
pub enum LayoutError {
    /// No renderer is registered under this token
    #[error("unknown layout renderer `{0}`")]
    UnknownRenderer(String),
    /// The renderer's properties could not be deserialized
    #[error("invalid configuration for layout renderer `{renderer}`: {source}")]
    InvalidConfig {
        /// Token of the renderer being configured
        renderer: String,
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_error_display() {
        assert_eq!(
            ContextError::Disposed("session").to_string(),
            "session has been disposed"
        );
        assert_eq!(
            ContextError::Unavailable("session").to_string(),
            "session is not available for this request"
        );
    }

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::UnknownRenderer("request-nope".to_string());
        assert_eq!(err.to_string(), "unknown layout renderer `request-nope`");
    }
}
