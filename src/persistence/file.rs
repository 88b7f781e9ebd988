//! JSON file backend
//!
//! The whole map is rewritten on every `set` through a temp file and rename,
//! so a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::KeyValueStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file is an empty store. A corrupt file is logged and
    /// treated as empty; it is replaced on the next `set`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Ignoring corrupt store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("color_ring_store_{}_{}", std::process::id(), name))
            .join("save.json")
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = scratch("reopen");
        let mut store = FileStore::open(&path);
        store.set("colorRingBestScore", "17").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("colorRingBestScore").as_deref(), Some("17"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let path = scratch("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let mut store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);
        store.set("a", "1").unwrap();
        assert_eq!(FileStore::open(&path).get("a").as_deref(), Some("1"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
