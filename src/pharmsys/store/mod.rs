//! # Storage Layer
//!
//! Persistence is a key-value blob store: string keys mapping to UTF-8
//! JSON text. The [`BlobStore`] trait keeps the core decoupled from where
//! the bytes actually live.
//!
//! Two keys are in use:
//! - [`DATA_KEY`]: the full record store, one JSON document
//! - [`SESSION_KEY`]: the current user session
//!
//! ## Implementations
//!
//! - [`fs::FileBlobStore`]: production storage, one `<key>.json` file per
//!   key under a data directory
//! - [`memory::MemoryBlobStore`]: in-memory storage for tests
//!
//! A blob store has a single writer within a process. Two processes pointed
//! at the same directory get last-writer-wins with no coordination.

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Key holding the serialized record store.
pub const DATA_KEY: &str = "pharma-data";

/// Key holding the serialized user session.
pub const SESSION_KEY: &str = "pharma-user";

/// Abstract interface for blob persistence.
///
/// `get` must tolerate absent keys (returns `Ok(None)`); interpreting the
/// text, and tolerating malformed content, is the caller's concern.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}
