//! Keyword-keyed store of raw result documents.
//!
//! One file per distinct keyword string, no eviction, no TTL. The key is
//! the literal keyword string — case-sensitive, never normalized, and not
//! namespaced by match mode or state filter. Callers that expect cache hits
//! must send byte-identical keyword strings; queries that differ only in
//! mode or filters share an entry. `force` on the query is the escape hatch.

use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use crate::error::PortalError;

/// Keyword bytes that survive into the file name unescaped. Everything else
/// is percent-encoded, keeping the key→file mapping bijective.
const FILE_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.');

pub struct DocumentCache {
    dir: PathBuf,
}

impl DocumentCache {
    /// Opens (and creates if needed) the cache directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PortalError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The cached raw document for `key`, or `None` on miss.
    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    /// Stores `document` under `key`, overwriting any prior entry.
    pub fn put(&self, key: &str, document: &str) -> Result<(), PortalError> {
        let path = self.path_for(key);
        fs::write(&path, document)?;
        debug!(key, path = %path.display(), "cached result document");
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(utf8_percent_encode(key, FILE_SAFE).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache() -> (TempDir, DocumentCache) {
        let dir = TempDir::new().unwrap();
        let cache = DocumentCache::open(dir.path().join("cache")).unwrap();
        (dir, cache)
    }

    #[test]
    fn miss_then_hit_round_trip() {
        let (_dir, cache) = cache();
        assert_eq!(cache.get("Gasag AG"), None);
        cache.put("Gasag AG", "<html>doc</html>").unwrap();
        assert_eq!(cache.get("Gasag AG").as_deref(), Some("<html>doc</html>"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let (_dir, cache) = cache();
        cache.put("Foo GmbH", "upper").unwrap();
        cache.put("foo gmbh", "lower").unwrap();
        assert_eq!(cache.get("Foo GmbH").as_deref(), Some("upper"));
        assert_eq!(cache.get("foo gmbh").as_deref(), Some("lower"));
    }

    #[test]
    fn put_overwrites() {
        let (_dir, cache) = cache();
        cache.put("k", "first").unwrap();
        cache.put("k", "second").unwrap();
        assert_eq!(cache.get("k").as_deref(), Some("second"));
    }

    #[test]
    fn awkward_keys_map_to_distinct_files() {
        let (_dir, cache) = cache();
        cache.put("a/b", "slash").unwrap();
        cache.put("a b", "space").unwrap();
        cache.put("a%2Fb", "literal percent").unwrap();
        assert_eq!(cache.get("a/b").as_deref(), Some("slash"));
        assert_eq!(cache.get("a b").as_deref(), Some("space"));
        assert_eq!(cache.get("a%2Fb").as_deref(), Some("literal percent"));
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/cache");
        let cache = DocumentCache::open(&nested).unwrap();
        cache.put("k", "v").unwrap();
        assert!(nested.exists());
    }
}
