use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::cache::error::StoreError;

/// File-backed key-value document store. One JSON document per key,
/// replaced wholesale: writes go to a temporary file that is renamed over
/// the previous document, so readers never observe a half-written entry.
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        FileStore { base }
    }

    fn doc_path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{}.json", key))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.doc_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&content)?;
        Ok(Some(value))
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.base)?;
        let content = serde_json::to_string_pretty(value)?;
        let tmp = self.base.join(format!("{}.json.tmp", key));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, self.doc_path(key))?;
        Ok(())
    }
}
