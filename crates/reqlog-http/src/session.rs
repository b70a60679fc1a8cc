//! Request session store
//!
//! Hosts put an `Arc<Session>` into the request extensions. A session is
//! closed when the host tears it down; reads after that fail with
//! [`ContextError::Disposed`].

use reqlog_core::{ContextError, ContextResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Thread-safe session key/value store
#[derive(Debug)]
pub struct Session {
    id: String,
    values: RwLock<HashMap<String, String>>,
    closed: AtomicBool,
}

impl Session {
    /// Create a session with a random v4 UUID as its id
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    /// Create a session with the given id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> ContextResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(ContextError::Disposed("session"))
        } else {
            Ok(())
        }
    }

    /// Session id
    pub fn id(&self) -> ContextResult<&str> {
        self.ensure_open()?;
        Ok(&self.id)
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> ContextResult<Option<String>> {
        self.ensure_open()?;
        let values = self
            .values
            .read()
            .map_err(|_| ContextError::Unavailable("session"))?;
        Ok(values.get(key).cloned())
    }

    /// Store `value` under `key`
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> ContextResult<()> {
        self.ensure_open()?;
        self.values
            .write()
            .map_err(|_| ContextError::Unavailable("session"))?
            .insert(key.into(), value.into());
        Ok(())
    }

    /// Remove the value stored under `key`
    pub fn remove(&self, key: &str) -> ContextResult<Option<String>> {
        self.ensure_open()?;
        let mut values = self
            .values
            .write()
            .map_err(|_| ContextError::Unavailable("session"))?;
        Ok(values.remove(key))
    }

    /// Dispose the session
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!(session_id = %self.id, "session closed");
        }
    }

    /// Check if the session was closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_insert_and_get() {
        let session = Session::with_id("abc");
        session.insert("cart", "3 items").unwrap();

        assert_eq!(session.id(), Ok("abc"));
        assert_eq!(session.get("cart"), Ok(Some("3 items".to_string())));
        assert_eq!(session.get("missing"), Ok(None));
        assert_eq!(session.remove("cart"), Ok(Some("3 items".to_string())));
        assert_eq!(session.get("cart"), Ok(None));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id().unwrap(), b.id().unwrap());
    }

    #[test]
    fn test_closed_session_is_disposed() {
        let session = Session::with_id("abc");
        session.insert("k", "v").unwrap();
        session.close();
        session.close();

        assert!(session.is_closed());
        assert_eq!(session.id(), Err(ContextError::Disposed("session")));
        assert_eq!(session.get("k"), Err(ContextError::Disposed("session")));
        assert_eq!(session.insert("k", "v"), Err(ContextError::Disposed("session")));
    }

    #[test]
    fn test_close_from_another_thread() {
        let session = Arc::new(Session::with_id("abc"));
        let remote = Arc::clone(&session);
        std::thread::spawn(move || remote.close()).join().unwrap();
        assert_eq!(session.get("k"), Err(ContextError::Disposed("session")));
    }
}
