use crate::{Repository, StdResult};

/// A trait for retrieving the repositories to showcase.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryProvider: Sync + Send {
    /// Retrieves the merged list of repositories, pinned first.
    async fn fetch_repositories(&self) -> StdResult<Vec<Repository>>;
}
