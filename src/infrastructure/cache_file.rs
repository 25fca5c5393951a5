use std::{io::ErrorKind, path::PathBuf, time::Duration};

use chrono::Utc;
use log::{debug, info, warn};
use tokio::fs;

use crate::{CacheEnvelope, Repository, RepositoryCache, StdResult};

/// A cache that stores the repositories envelope as a JSON file.
pub struct FileRepositoryCache {
    path: PathBuf,
    cache_duration: Duration,
}

impl FileRepositoryCache {
    /// Creates a new `FileRepositoryCache` stored at `path`.
    pub fn new(path: PathBuf, cache_duration: Duration) -> Self {
        Self {
            path,
            cache_duration,
        }
    }

    async fn read_envelope(&self) -> StdResult<CacheEnvelope> {
        let contents = fs::read_to_string(&self.path).await?;

        Ok(serde_json::from_str(&contents)?)
    }

    async fn write_envelope(&self, envelope: &CacheEnvelope) -> StdResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_vec(envelope)?).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RepositoryCache for FileRepositoryCache {
    async fn get(&self) -> Option<Vec<Repository>> {
        let envelope = match self.read_envelope().await {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!("Cache miss at {}: {e}", self.path.display());
                return None;
            }
        };
        if !envelope.is_valid_at(Utc::now().timestamp_millis(), self.cache_duration) {
            debug!("Cache expired at {}", self.path.display());
            return None;
        }
        if envelope.data.is_empty() {
            debug!("Cache holds no repositories at {}", self.path.display());
            return None;
        }
        info!("Loaded {} repositories from cache", envelope.data.len());

        Some(envelope.data)
    }

    async fn set(&self, repositories: &[Repository]) {
        let envelope = CacheEnvelope::new(repositories.to_vec(), Utc::now().timestamp_millis());
        if let Err(e) = self.write_envelope(&envelope).await {
            warn!("Failed to write cache at {}: {e}", self.path.display());
        }
    }

    async fn clear(&self) {
        match fs::remove_file(&self.path).await {
            Ok(()) => info!("Cleared cache at {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear cache at {}: {e}", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn cache_in(dir: &TempDir, cache_duration: Duration) -> FileRepositoryCache {
        FileRepositoryCache::new(
            dir.path().join("nested").join("github_repos_cache.json"),
            cache_duration,
        )
    }

    #[tokio::test]
    async fn get_returns_what_was_set() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, Duration::from_secs(600));
        let repositories = vec![
            Repository::dummy("repository-1").pinned(true),
            Repository::dummy("repository-2"),
        ];

        cache.set(&repositories).await;
        let cached = cache.get().await;

        assert_eq!(cached, Some(repositories));
    }

    #[tokio::test]
    async fn get_is_none_when_empty() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, Duration::from_secs(600));

        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn get_is_none_once_expired() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, Duration::from_secs(600));
        let stale = CacheEnvelope::new(
            vec![Repository::dummy("repository-1")],
            Utc::now().timestamp_millis() - 600_000,
        );
        cache.write_envelope(&stale).await.unwrap();

        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn get_is_none_when_envelope_is_malformed() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, Duration::from_secs(600));
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(&cache.path, "{\"data\": 42}").unwrap();

        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn get_is_none_when_envelope_holds_no_repositories() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, Duration::from_secs(600));
        let empty = CacheEnvelope::new(vec![], Utc::now().timestamp_millis());
        cache.write_envelope(&empty).await.unwrap();

        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn clear_removes_envelope_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, Duration::from_secs(600));
        cache.set(&[Repository::dummy("repository-1")]).await;

        cache.clear().await;
        cache.clear().await;

        assert_eq!(cache.get().await, None);
        assert!(!cache.path.exists());
    }

    #[tokio::test]
    async fn set_swallows_write_failures() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("blocker"), "not a directory").unwrap();
        let cache = FileRepositoryCache::new(
            dir.path().join("blocker").join("github_repos_cache.json"),
            Duration::from_secs(600),
        );

        cache.set(&[Repository::dummy("repository-1")]).await;

        assert_eq!(cache.get().await, None);
    }
}
