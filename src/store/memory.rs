//! In-process store with the same compare-and-swap semantics as GitHub

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{DocumentStore, StoredDocument};
use crate::error::{BotError, Result};

#[derive(Debug, Clone)]
struct StoredFile {
    content: String,
    revision: String,
}

#[derive(Default)]
pub struct InMemoryStore {
    files: Mutex<HashMap<String, StoredFile>>,
    /// Commit messages of accepted writes, oldest first
    commits: Mutex<Vec<String>>,
    /// Revision to install right after the next fetch, simulating a racing writer
    race_next_fetch: Mutex<Option<String>>,
    reject_credentials: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(path: &str, content: &str) -> Self {
        let store = Self::new();
        store.files.lock().insert(
            path.to_string(),
            StoredFile {
                content: content.to_string(),
                revision: new_revision(),
            },
        );
        store
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files.lock().get(path).map(|f| f.content.clone())
    }

    /// Make the next fetch hand out a revision that is already stale
    pub fn race_next_fetch(&self) {
        *self.race_next_fetch.lock() = Some(new_revision());
    }

    pub fn reject_credentials(&self) {
        self.reject_credentials.store(true, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().clone()
    }

    fn check_credentials(&self) -> Result<()> {
        if self.reject_credentials.load(Ordering::SeqCst) {
            return Err(BotError::AuthFailed {
                message: "bad credentials".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn fetch(&self, path: &str) -> Result<StoredDocument> {
        self.check_credentials()?;

        let mut files = self.files.lock();
        let file = files.get_mut(path).ok_or_else(|| BotError::FetchFailed {
            path: path.to_string(),
            message: "not found".to_string(),
        })?;

        let document = StoredDocument {
            path: path.to_string(),
            content: file.content.clone(),
            revision: file.revision.clone(),
        };

        if let Some(revision) = self.race_next_fetch.lock().take() {
            file.revision = revision;
        }

        Ok(document)
    }

    async fn write(&self, path: &str, content: &str, message: &str, revision: &str) -> Result<()> {
        self.check_credentials()?;

        let mut files = self.files.lock();
        let file = files.get_mut(path).ok_or_else(|| BotError::FetchFailed {
            path: path.to_string(),
            message: "not found".to_string(),
        })?;

        if file.revision != revision {
            return Err(BotError::WriteConflict {
                path: path.to_string(),
            });
        }

        file.content = content.to_string();
        file.revision = new_revision();
        self.commits.lock().push(message.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn new_revision() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
