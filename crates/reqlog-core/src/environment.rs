//! Process-wide host environment values
//!
//! These do not depend on any request and are resolved once per process.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable holding the environment name
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

static CURRENT: OnceLock<HostEnvironment> = OnceLock::new();
static BASE_PATH: OnceLock<Option<String>> = OnceLock::new();

/// Deployment environment of the host application
///
/// Detected from the `APP_ENV` environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEnvironment {
    /// Development environment
    Development,
    /// Production environment
    Production,
    /// Any other environment name
    Custom(String),
}

impl HostEnvironment {
    /// Environment of this process, read from `APP_ENV` on first use
    pub fn current() -> &'static HostEnvironment {
        CURRENT.get_or_init(|| Self::from_value(std::env::var(ENVIRONMENT_VAR).ok().as_deref()))
    }

    /// Interpret a raw environment value
    ///
    /// - `production` or `prod` is [`Production`](Self::Production)
    /// - `development`, `dev` or unset is [`Development`](Self::Development)
    /// - anything else is [`Custom`](Self::Custom)
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("production") | Some("prod") => Self::Production,
            Some("development") | Some("dev") | Some("") | None => Self::Development,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    /// Environment name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directory of the running executable, falling back to the working directory
///
/// Resolved once per process.
pub fn app_base_path() -> Option<&'static str> {
    BASE_PATH
        .get_or_init(|| {
            let dir = std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(PathBuf::from))
                .or_else(|| std::env::current_dir().ok());
            if dir.is_none() {
                tracing::debug!("unable to resolve application base path");
            }
            dir.map(|d| d.to_string_lossy().into_owned())
        })
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(HostEnvironment::from_value(None), HostEnvironment::Development);
        assert_eq!(HostEnvironment::from_value(Some("dev")), HostEnvironment::Development);
        assert_eq!(HostEnvironment::from_value(Some("prod")), HostEnvironment::Production);
        assert_eq!(
            HostEnvironment::from_value(Some("staging")),
            HostEnvironment::Custom("staging".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(HostEnvironment::Production.to_string(), "production");
        assert_eq!(HostEnvironment::Custom("qa".to_string()).to_string(), "qa");
    }

    #[test]
    fn test_current_is_memoized() {
        let first = HostEnvironment::current();
        let second = HostEnvironment::current();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_base_path_is_memoized() {
        assert_eq!(app_base_path(), app_base_path());
        assert!(app_base_path().is_some());
    }
}
