use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use tile_merge_system_leaderboard::{KeyValueStore, StoreError};

/// Key-value store persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file. An unreadable file is logged and
/// replaced on the next write.
#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`; a missing file yields an empty store.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|error| {
                log::warn!("ignoring unreadable store {}: {error}", path.display());
                BTreeMap::new()
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };

        log::debug!("opened store {} with {} keys", path.display(), values.len());
        Ok(Self { path, values })
    }

    /// Location of the backing file.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let _ = self.values.insert(key.to_owned(), value);
        self.flush()
    }
}
