use crate::{Request, Response, StdResult};

/// A trait for fetching repository data from the GitHub APIs.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryFetcher: Sync + Send {
    /// Fetches the repositories matching the request.
    async fn fetch(&self, request: &Request) -> StdResult<Response>;
}
