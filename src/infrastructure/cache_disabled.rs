use log::debug;

use crate::{Repository, RepositoryCache};

/// A cache that never holds anything, used when caching is turned off.
#[derive(Debug, Default)]
pub struct DisabledRepositoryCache;

#[async_trait::async_trait]
impl RepositoryCache for DisabledRepositoryCache {
    async fn get(&self) -> Option<Vec<Repository>> {
        debug!("Cache disabled");
        None
    }

    async fn set(&self, _repositories: &[Repository]) {}

    async fn clear(&self) {}
}
