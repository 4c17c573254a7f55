//! Remote versioned document storage.
//!
//! A store hands out file contents together with an opaque revision token and
//! only accepts a write when the caller presents the token of the version that
//! is currently stored.

pub mod github;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

pub use github::GitHubStore;

/// A file read from the store
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub path: String,
    pub content: String,
    /// Token identifying this version, required to write it back
    pub revision: String,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the current content and revision of `path`
    async fn fetch(&self, path: &str) -> Result<StoredDocument>;

    /// Replace `path` with `content`, provided the stored revision still equals `revision`
    async fn write(&self, path: &str, content: &str, message: &str, revision: &str) -> Result<()>;
}

/// Shared store type
pub type SharedDocumentStore = Arc<dyn DocumentStore>;
