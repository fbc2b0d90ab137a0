//! User directory port
//!
//! Keyed user registration records. The backing store owns its own
//! concurrency safety (last write wins on a keyed record); the application
//! treats calls as opaque remote operations.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during directory operations
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory backend error: {0}")]
    Backend(String),
}

/// Port for the user directory collaborator
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether a user with this handle is registered.
    async fn check_user(&self, handle: &str) -> Result<bool, DirectoryError>;

    /// Register a user by handle. Registering an existing handle is a no-op.
    async fn register_user(&self, handle: &str) -> Result<(), DirectoryError>;
}
