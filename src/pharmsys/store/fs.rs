use super::BlobStore;
use crate::error::{PharmaError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed blob store: each key is a `<key>.json` file under `root`.
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PharmaError::Io)?;
        }
        Ok(())
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(PharmaError::Io)?;
        Ok(Some(text))
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_root()?;
        fs::write(self.key_path(key), value).map_err(PharmaError::Io)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(PharmaError::Io)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_store(name: &str) -> FileBlobStore {
        let dir = env::temp_dir().join(format!("pharmsys_test_{}", name));
        let _ = fs::remove_dir_all(&dir);
        FileBlobStore::new(dir)
    }

    #[test]
    fn absent_key_reads_as_none() {
        let store = temp_store("absent");
        assert!(store.get("pharma-data").unwrap().is_none());
    }

    #[test]
    fn put_then_get_round_trips() {
        let mut store = temp_store("roundtrip");
        store.put("pharma-data", "{\"medications\":[]}").unwrap();
        assert_eq!(
            store.get("pharma-data").unwrap().as_deref(),
            Some("{\"medications\":[]}")
        );
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn remove_clears_the_key() {
        let mut store = temp_store("remove");
        store.put("pharma-user", "{}").unwrap();
        store.remove("pharma-user").unwrap();
        assert!(store.get("pharma-user").unwrap().is_none());
        // Removing a key that is already gone is not an error
        store.remove("pharma-user").unwrap();
        let _ = fs::remove_dir_all(store.root());
    }
}
