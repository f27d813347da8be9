// src/store.rs
//! Durable per-source seen-sets.
//!
//! One JSON file per source (`seen_{source}.json`, a flat array of links)
//! under the configured state directory. Saves go through a temp file and a
//! rename so a crash mid-write leaves either the old or the new complete set.
//! A missing or unreadable file is an empty set, never an error.
//!
//! An in-memory cache fronts the files: after the first load for a source the
//! cache is authoritative, so a failed save keeps the updated set visible to
//! the next cycle and persistence is simply retried on the next commit.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

#[derive(Debug)]
pub struct SeenStore {
    dir: PathBuf,
    cache: Mutex<HashMap<String, HashSet<String>>>,
}

impl SeenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn file_path(&self, source: &str) -> PathBuf {
        self.dir.join(format!("seen_{source}.json"))
    }

    /// Seen-set for `source`: cached copy if the process already touched it,
    /// otherwise whatever the file holds, otherwise empty.
    pub fn load(&self, source: &str) -> HashSet<String> {
        let mut cache = self.cache.lock().expect("seen cache mutex poisoned");
        if let Some(set) = cache.get(source) {
            return set.clone();
        }
        let set = read_links(&self.file_path(source));
        cache.insert(source.to_string(), set.clone());
        set
    }

    /// Atomically replace the persisted set for `source`.
    ///
    /// The cache is updated before touching the disk, so even when the write
    /// fails the caller's merged set stays visible to later cycles; the error
    /// is returned for logging and the write retried on the next save.
    pub fn save(&self, source: &str, links: HashSet<String>) -> Result<()> {
        {
            let mut cache = self.cache.lock().expect("seen cache mutex poisoned");
            cache.insert(source.to_string(), links.clone());
        }
        self.persist(source, &links)
    }

    fn persist(&self, source: &str, links: &HashSet<String>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating state dir {}", self.dir.display()))?;

        // Stable order keeps the files diffable.
        let mut sorted: Vec<&String> = links.iter().collect();
        sorted.sort();
        let body = serde_json::to_string_pretty(&sorted).context("encoding seen-set")?;

        let path = self.file_path(source);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("renaming {} into place", tmp.display()))?;
        Ok(())
    }
}

fn read_links(path: &Path) -> HashSet<String> {
    let Ok(data) = fs::read_to_string(path) else {
        return HashSet::new();
    };
    match serde_json::from_str::<Vec<String>>(&data) {
        Ok(links) => links.into_iter().collect(),
        Err(e) => {
            // Corrupt state means start fresh, not crash.
            tracing::warn!(path = %path.display(), error = ?e, "unreadable seen file, starting empty");
            HashSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeenStore::new(tmp.path());
        assert!(store.load("amazon").is_empty());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeenStore::new(tmp.path());
        let links = HashSet::from(["https://a/1".to_string(), "https://a/2".to_string()]);
        store.save("amazon", links.clone()).unwrap();

        // Fresh store instance forces a disk read.
        let reopened = SeenStore::new(tmp.path());
        assert_eq!(reopened.load("amazon"), links);
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("seen_google.json"), "{not json").unwrap();
        let store = SeenStore::new(tmp.path());
        assert!(store.load("google").is_empty());
    }

    #[test]
    fn sources_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeenStore::new(tmp.path());
        store
            .save("amazon", HashSet::from(["L1".to_string()]))
            .unwrap();
        assert!(store.load("google").is_empty());
        assert_eq!(store.load("amazon"), HashSet::from(["L1".to_string()]));
    }

    #[test]
    fn failed_save_keeps_set_in_memory() {
        // Point the state dir at a regular file so create_dir_all fails.
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();

        let store = SeenStore::new(&blocker);
        let links = HashSet::from(["L1".to_string()]);
        assert!(store.save("amazon", links.clone()).is_err());
        // Next cycle still diffs against the merged set.
        assert_eq!(store.load("amazon"), links);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeenStore::new(tmp.path());
        store
            .save("amazon", HashSet::from(["L1".to_string()]))
            .unwrap();
        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
