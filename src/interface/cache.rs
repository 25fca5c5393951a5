use crate::Repository;

/// A trait for caching the showcased repositories between runs.
///
/// Implementations never fail: unreadable entries are misses and write
/// failures are only logged.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryCache: Sync + Send {
    /// Retrieves the cached repositories if they are still fresh.
    async fn get(&self) -> Option<Vec<Repository>>;

    /// Stores the repositories, replacing any previous entry.
    async fn set(&self, repositories: &[Repository]);

    /// Removes the cached entry.
    async fn clear(&self);
}
