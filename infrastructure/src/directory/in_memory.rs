//! In-memory user directory.
//!
//! Registration is a keyed record with last-write-wins semantics, so a
//! `HashSet` of handles behind a `RwLock` is a faithful stand-in for the
//! remote directory service.

use async_trait::async_trait;
use cadenza_application::ports::user_directory::{DirectoryError, UserDirectory};
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory [`UserDirectory`] implementation.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    handles: RwLock<HashSet<String>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the directory with already-registered handles.
    pub fn with_handles<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            handles: RwLock::new(handles.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn check_user(&self, handle: &str) -> Result<bool, DirectoryError> {
        Ok(self.handles.read().await.contains(handle))
    }

    async fn register_user(&self, handle: &str) -> Result<(), DirectoryError> {
        let inserted = self.handles.write().await.insert(handle.to_string());
        debug!(handle, new = inserted, "Registered user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_check() {
        let directory = InMemoryUserDirectory::new();
        assert!(!directory.check_user("ada").await.unwrap());

        directory.register_user("ada").await.unwrap();
        assert!(directory.check_user("ada").await.unwrap());
        assert!(!directory.check_user("grace").await.unwrap());
    }

    #[tokio::test]
    async fn test_reregistration_is_a_noop() {
        let directory = InMemoryUserDirectory::with_handles(["ada"]);
        directory.register_user("ada").await.unwrap();
        assert!(directory.check_user("ada").await.unwrap());
    }
}
