use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Get the platform-appropriate cache directory for profile-audit
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("profile-audit"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/profile-audit",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Key of a finished audit report.
pub fn report_key(handle: &str) -> String {
    handle.to_string()
}

/// Key of the raw profile context kept for pro content.
pub fn context_key(handle: &str) -> String {
    format!("user_data:{}", handle)
}

/// Key of generated pro content.
pub fn pro_key(handle: &str) -> String {
    format!("pro_data:{}", handle)
}

/// On-disk envelope around a cached value
#[derive(Serialize, Deserialize)]
struct CacheEntry<T> {
    expires_at: DateTime<Utc>,
    value: T,
}

/// Disk-backed key/value store with per-entry expiry.
///
/// Every failure is soft: read errors are misses and write errors are
/// logged, so a broken cache directory never fails an audit.
#[derive(Debug, Clone)]
pub struct ResultCache {
    cache_path: PathBuf,
    enabled: bool,
}

impl ResultCache {
    pub fn new(cache_path: PathBuf, enabled: bool) -> Self {
        Self {
            cache_path,
            enabled,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(PathBuf::new(), false)
    }

    pub fn path(&self) -> &Path {
        &self.cache_path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }

        let bytes = match cacache::read_sync(&self.cache_path, key) {
            Ok(bytes) => bytes,
            Err(cacache::Error::EntryNotFound(..)) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable cache entry");
                self.remove(key);
                return None;
            }
        };

        if Utc::now() >= entry.expires_at {
            debug!(key, "cache entry expired");
            self.remove(key);
            return None;
        }

        debug!(key, "cache hit");
        Some(entry.value)
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if !self.enabled {
            return;
        }

        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry { expires_at, value };

        match serde_json::to_vec(&entry) {
            Ok(serialized) => {
                if let Err(e) = cacache::write_sync(&self.cache_path, key, &serialized) {
                    warn!(key, error = %e, "cache write failed");
                }
            }
            Err(e) => warn!(key, error = %e, "cache entry not serializable"),
        }
    }

    pub fn remove(&self, key: &str) {
        if !self.enabled {
            return;
        }
        if let Err(e) = cacache::remove_sync(&self.cache_path, key) {
            debug!(key, error = %e, "cache remove failed");
        }
    }

    /// Delete the whole cache directory
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.cache_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove cache directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        score: u32,
        leaks: Vec<String>,
    }

    fn sample() -> Sample {
        Sample {
            score: 42,
            leaks: vec!["Missing Bio Link.".to_string()],
        }
    }

    #[test]
    fn test_roundtrip_within_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path().to_path_buf(), true);

        cache.set("jane", &sample(), Duration::from_secs(600));
        assert_eq!(cache.get::<Sample>("jane"), Some(sample()));
        assert_eq!(cache.get::<Sample>("other"), None);
    }

    #[test]
    fn test_expired_entry_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path().to_path_buf(), true);

        cache.set("jane", &sample(), Duration::ZERO);
        assert_eq!(cache.get::<Sample>("jane"), None);
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path().to_path_buf(), true);

        cache.set(&report_key("jane"), &1u32, Duration::from_secs(60));
        cache.set(&context_key("jane"), &2u32, Duration::from_secs(60));
        cache.set(&pro_key("jane"), &3u32, Duration::from_secs(60));

        assert_eq!(cache.get::<u32>("jane"), Some(1));
        assert_eq!(cache.get::<u32>("user_data:jane"), Some(2));
        assert_eq!(cache.get::<u32>("pro_data:jane"), Some(3));
    }

    #[test]
    fn test_wrong_shape_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path().to_path_buf(), true);

        cache.set("jane", &"not a sample", Duration::from_secs(60));
        assert_eq!(cache.get::<Sample>("jane"), None);
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path().to_path_buf(), false);

        cache.set("jane", &sample(), Duration::from_secs(600));
        assert_eq!(cache.get::<Sample>("jane"), None);
        assert!(ResultCache::disabled().get::<Sample>("jane").is_none());
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache");
        let cache = ResultCache::new(path.clone(), true);

        cache.set("jane", &sample(), Duration::from_secs(600));
        cache.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(cache.get::<Sample>("jane"), None);

        // Clearing a missing directory is fine
        cache.clear().unwrap();
    }
}
