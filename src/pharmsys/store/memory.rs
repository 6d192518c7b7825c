use super::BlobStore;
use crate::error::Result;
use std::collections::HashMap;

/// In-memory blob store for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.blobs.remove(key);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::error::PharmaError;

    /// Blob store whose writes always fail, standing in for a full or
    /// broken storage medium. Reads behave as if nothing was ever saved.
    #[derive(Default)]
    pub struct FailingBlobStore;

    impl BlobStore for FailingBlobStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn put(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(PharmaError::Storage("quota exceeded".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(PharmaError::Storage("quota exceeded".to_string()))
        }
    }
}
